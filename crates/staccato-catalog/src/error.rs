// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Faults local to one search attempt. None of these are fatal to the
/// process; callers report them and move on.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("token exchange failed: {status} - {message}")]
    Auth { status: u16, message: String },

    #[error("malformed response from catalog API: {0}")]
    MalformedResponse(String),
}
