//! Error types for the analytics core.
//!
//! Two layers, mirroring how errors travel through the system:
//! - [`AnalyticsError`] is the rich internal type the client and services
//!   return.
//! - [`ViewError`] is the serializable form handed to view state. Every
//!   failure folds into one of two presentation kinds: data unavailable
//!   (upstream/network trouble) or invalid query (a filter key or range the
//!   service does not recognize). Invalid queries present like unavailable
//!   data but keep their kind so diagnostics can tell them apart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CRM API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lead data unavailable: {0}")]
    DataUnavailable(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl AnalyticsError {
    /// Fold every variant into the two-kind taxonomy the views understand.
    ///
    /// HTTP 400 from the leads endpoint means the store rejected the query
    /// itself; everything else upstream is an availability problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::InvalidQuery(_) => ErrorKind::InvalidQuery,
            AnalyticsError::Api { status: 400, .. } => ErrorKind::InvalidQuery,
            _ => ErrorKind::DataUnavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    DataUnavailable,
    InvalidQuery,
}

/// Serializable error representation for view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewError {
    /// User-presentable message. Never carries raw payloads or URLs.
    pub message: String,
    pub kind: ErrorKind,
}

impl From<&AnalyticsError> for ViewError {
    fn from(err: &AnalyticsError) -> Self {
        let kind = err.kind();
        // Both kinds present identically; the kind field is for diagnostics.
        let message = match kind {
            ErrorKind::DataUnavailable => "Lead data is currently unavailable.".to_string(),
            ErrorKind::InvalidQuery => "Lead data is currently unavailable.".to_string(),
        };
        ViewError { message, kind }
    }
}

impl From<AnalyticsError> for ViewError {
    fn from(err: AnalyticsError) -> Self {
        ViewError::from(&err)
    }
}
