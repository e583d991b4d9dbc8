//! Errors returned by [`RequestFacade`](crate::RequestFacade).
//!
//! # Error Handling
//!
//! - [`RequestError::MissingParameters`]: dispatched without a path, before any I/O
//! - [`RequestError::Api`]: the envelope `code` was not 200; carries only `msg`
//! - [`RequestError::Transport`]: the original transport failure
//!
//! The `Display` output of each variant is the message routed to error
//! callbacks and notifications (after timeout rewriting).
//!
//! # Example
//!
//! ```rust,ignore
//! use api_request::RequestError;
//!
//! match facade.dispatch(descriptor).await {
//!     Ok(dispatched) => println!("{:?}", dispatched),
//!     Err(RequestError::Api { code, msg }) => println!("API said {}: {}", code, msg),
//!     Err(RequestError::Transport(e)) => println!("Transport failed: {}", e),
//!     Err(e) => println!("{}", e),
//! }
//! ```

use thiserror::Error;

use crate::clients::{ResponseShape, TransportError};

/// Error type for a façade dispatch.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request was dispatched without parameters.
    #[error("{message}")]
    MissingParameters {
        /// The localized message.
        message: String,
    },

    /// The server answered with a non-success envelope.
    #[error("{msg}")]
    Api {
        /// The envelope code.
        code: i64,
        /// The envelope message.
        msg: String,
    },

    /// The HTTP exchange itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response data could not be decoded into the requested type.
    #[error("Failed to decode response data: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response did not have the requested shape.
    #[error("Expected a {expected:?} response")]
    UnexpectedShape {
        /// The shape the caller asked for.
        expected: ResponseShape,
    },
}

impl RequestError {
    /// Returns the envelope message if this is an application-level failure.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { msg, .. } => Some(msg),
            _ => None,
        }
    }
}
