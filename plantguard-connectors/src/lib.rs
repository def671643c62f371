//! Connectors between the PlantGuard monitor loop and hosted services
//!
//! ## Overview
//!
//! The core loop only knows the collaborator traits in
//! [`plantguard_core::traits`]. This crate implements them against the two
//! services a deployment talks to:
//!
//! | Connector | Service | Implements |
//! |-----------|---------|------------|
//! | [`RestStore`] | PostgREST (e.g. Supabase) | `SensorStore`, `PlantStore`, `UserStore` |
//! | [`TwilioTransport`] | Twilio Messages API | `NotificationTransport` |
//!
//! Both sit on the blocking [`http::HttpClient`]: the loop is strictly
//! sequential, so a request simply blocks the cycle until it finishes or
//! times out.
//!
//! ## Errors
//!
//! Connectors fail with [`ConnectorError`], which keeps the full detail
//! (status codes, response bodies, decode messages). At the trait boundary
//! the detail is logged and the error is narrowed to the core's `Copy`
//! error types:
//!
//! ```text
//! HttpError::Request      -> StoreError::Unreachable     / TransportError::Unreachable
//! HttpError::Status{s}    -> StoreError::Rejected{s}     / TransportError::Rejected{s}
//! Decode                  -> StoreError::Malformed       / TransportError::Malformed
//! NotFound{table, id}     -> StoreError::NotFound{table, id}
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use plantguard_connectors::{RestStore, TwilioTransport};
//! use plantguard_core::traits::{NotificationTransport, SensorStore};
//!
//! let mut store = RestStore::new("https://project.supabase.co", "service-key")?;
//! let record = store.sensor_record(1)?;
//!
//! let mut sms = TwilioTransport::new("AC123", "auth-token", "whatsapp:+14155238886")?;
//! sms.send("whatsapp:+447700900123", "The sensor for the basil is blocked.")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod http;
pub mod supabase;
pub mod twilio;

// Re-export common types
pub use http::{AuthMethod, HttpClient, HttpConfig, HttpError};
pub use supabase::RestStore;
pub use twilio::TwilioTransport;

use plantguard_core::errors::{StoreError, TransportError};
use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// HTTP exchange failed
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Query matched no row
    #[error("No {table} row with id {id}")]
    NotFound { table: &'static str, id: u32 },

    /// Response arrived but did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Connector was configured with unusable settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConnectorError> for StoreError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::Http(HttpError::Request(_)) => StoreError::Unreachable,
            ConnectorError::Http(HttpError::Status { status, .. }) => StoreError::Rejected { status },
            ConnectorError::Http(HttpError::Decode(_)) | ConnectorError::Decode(_) => {
                StoreError::Malformed { reason: "unexpected response body" }
            }
            ConnectorError::Http(HttpError::Config(_)) | ConnectorError::Config(_) => {
                StoreError::Malformed { reason: "invalid connector configuration" }
            }
            ConnectorError::NotFound { table, id } => StoreError::NotFound { table, id },
        }
    }
}

impl From<ConnectorError> for TransportError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::Http(HttpError::Request(_)) => TransportError::Unreachable,
            ConnectorError::Http(HttpError::Status { status, .. }) => TransportError::Rejected { status },
            ConnectorError::NotFound { .. } => TransportError::NoRecipient,
            _ => TransportError::Malformed,
        }
    }
}

/// Request counters kept by every [`HttpClient`]
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Requests that got a success response
    pub requests_sent: u64,
    /// Requests that failed after all retries
    pub requests_failed: u64,
    /// Request body bytes sent
    pub bytes_sent: u64,
    /// Retries performed
    pub retries: u32,
    /// Last error message
    pub last_error: Option<String>,
}
