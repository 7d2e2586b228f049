// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Incremental Server-Sent Events decoder.
//!
//! Bytes are fed in whatever chunks the transport delivers. Lines are split
//! on `\n`, `\r\n` or a lone `\r`, and a line is only decoded once it is
//! complete, so chunk boundaries inside a multi-byte character or between
//! the two bytes of a CRLF pair are harmless.

/// Decodes an SSE byte stream into the `data` payloads of its events.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the line being accumulated.
    line: Vec<u8>,
    /// `data` lines of the event being accumulated.
    data: Vec<String>,
    /// The previous chunk ended in `\r`; a leading `\n` belongs to it.
    skip_lf: bool,
}

impl SseDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the payloads of every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut payloads: Vec<String> = Vec::new();
        for &byte in chunk {
            if self.skip_lf {
                self.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => self.end_line(&mut payloads),
                b'\r' => {
                    self.end_line(&mut payloads);
                    self.skip_lf = true;
                }
                other => self.line.push(other),
            }
        }
        payloads
    }

    /// Whether a partially received event is pending.
    #[must_use]
    pub fn has_partial_event(&self) -> bool {
        !self.line.is_empty() || !self.data.is_empty()
    }

    fn end_line(&mut self, payloads: &mut Vec<String>) {
        let line: Vec<u8> = std::mem::take(&mut self.line);
        if line.is_empty() {
            if !self.data.is_empty() {
                payloads.push(self.data.join("\n"));
                self.data.clear();
            }
            return;
        }

        let line: String = String::from_utf8_lossy(&line).into_owned();
        if line.starts_with(':') {
            return;
        }
        let (field, value) = line.split_once(':').unwrap_or((line.as_str(), ""));
        if field == "data" {
            let value: &str = value.strip_prefix(' ').unwrap_or(value);
            self.data.push(value.to_string());
        }
    }
}
