// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover_api::{SwitchCurrentRequest, SwitchCurrentResponse};
use fiscal_rollover_domain::{DirectoryListing, TransitionInfo};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::{debug, info};

use crate::channel::error_message;
use crate::error::ClientError;

/// Read access to the fiscal year directory, as the session needs it.
pub trait Directory: Send + Sync {
    /// Lists the company's fiscal years.
    fn list(&self) -> impl Future<Output = Result<DirectoryListing, ClientError>> + Send;
}

/// Fiscal year directory over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectory {
    /// Creates a directory client for the server at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!(path, "GET");
        let response: reqwest::Response = self.client.get(self.url(path)).send().await?;
        let status: reqwest::StatusCode = response.status();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }
        Ok(response.json().await?)
    }

    /// Fetches the data used to pre-fill a rollover.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server has no company.
    pub async fn transition_info(&self) -> Result<TransitionInfo, ClientError> {
        self.get_json("/fiscal-year/current-transition-info").await
    }

    /// Makes another fiscal year current.
    ///
    /// A refusal comes back as a response with `success` unset, not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or its answer is
    /// not a switch response.
    pub async fn switch_current(
        &self,
        fiscal_year_id: i64,
    ) -> Result<SwitchCurrentResponse, ClientError> {
        let response: reqwest::Response = self
            .client
            .post(self.url("/fiscal-year/switch-current"))
            .json(&SwitchCurrentRequest { fiscal_year_id })
            .send()
            .await?;
        let body: SwitchCurrentResponse = response.json().await?;
        info!(fiscal_year_id, success = body.success, "Switched current fiscal year");
        Ok(body)
    }
}

impl Directory for HttpDirectory {
    async fn list(&self) -> Result<DirectoryListing, ClientError> {
        self.get_json("/fiscal-year/list").await
    }
}
