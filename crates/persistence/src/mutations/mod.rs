// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.

pub mod bootstrap;
pub mod fiscal_years;
pub mod ledger;
pub mod rollover;
pub mod runs;
