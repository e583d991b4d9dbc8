//! Transport-level error types.
//!
//! These errors describe failures of the HTTP exchange itself, as opposed to
//! application-level failures reported inside a well-formed response
//! envelope.
//!
//! # Example
//!
//! ```rust,ignore
//! use api_request::clients::{HttpTransport, TransportError};
//!
//! match transport.get("/api/users", options).await {
//!     Ok(response) => println!("Status {}", response.code),
//!     Err(TransportError::Timeout { timeout_ms }) => {
//!         println!("Gave up after {}ms", timeout_ms);
//!     }
//!     Err(TransportError::Status { code, .. }) => println!("HTTP {}", code),
//!     Err(e) => println!("Transport error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request could not be completed by the transport.
///
/// The `Display` output of every variant is the message routed to error
/// callbacks and notifications, so a timeout always mentions `timeout`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within its timeout.
    #[error("timeout of {timeout_ms}ms exceeded")]
    Timeout {
        /// The timeout that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// A non-2xx response without a usable envelope.
    #[error("{message}")]
    Status {
        /// The HTTP status code of the response.
        code: u16,
        /// Human-readable description of the failure.
        message: String,
    },

    /// The request could not be built from the given parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TransportError {
    /// Builds the error used for a non-2xx status.
    #[must_use]
    pub fn status(code: u16) -> Self {
        Self::Status {
            code,
            message: format!("Request failed with status code {code}"),
        }
    }

    /// Returns `true` if this error was caused by a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Network(e) => e.is_timeout(),
            _ => false,
        }
    }
}
