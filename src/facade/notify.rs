//! Error notification and the auth-token extension point.
//!
//! Classification of an error message ([`tip_message`]) is pure; showing it
//! to a user goes through the injected [`Notifier`].

use crate::config::Messages;

/// Header carrying the token supplied by a [`TokenProvider`].
pub const TOKEN_HEADER: &str = "token";

/// Substring marking an error message as a timeout.
const TIMEOUT_MARKER: &str = "timeout";

/// A user-visible error notification channel (toast, alert, status line).
///
/// Any `Fn(&str) + Send + Sync` closure is a `Notifier`.
///
/// # Example
///
/// ```rust
/// use api_request::facade::Notifier;
///
/// let notifier = |message: &str| eprintln!("error: {message}");
/// notifier.show_error("Request timed out");
/// ```
pub trait Notifier: Send + Sync {
    /// Shows an error message. Fire-and-forget.
    fn show_error(&self, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn show_error(&self, message: &str) {
        self(message);
    }
}

/// The default notifier: emits the message as an `error` event via `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str) {
        tracing::error!(error = %message, "Request failed");
    }
}

/// Supplies a token attached to every request as the [`TOKEN_HEADER`] header.
///
/// Any `Fn() -> Option<String> + Send + Sync` closure is a `TokenProvider`.
pub trait TokenProvider: Send + Sync {
    /// Returns the current token, or `None` to send the request without one.
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Rewrites an error message for display.
///
/// Any message containing `timeout` (case-sensitive) is replaced with the
/// localized timeout message; others pass through unchanged.
///
/// # Example
///
/// ```rust
/// use api_request::Messages;
/// use api_request::facade::tip_message;
///
/// let messages = Messages::default();
/// assert_eq!(tip_message("timeout of 3000ms exceeded", &messages), "Request timed out");
/// assert_eq!(tip_message("bad input", &messages), "bad input");
/// ```
#[must_use]
pub fn tip_message(message: &str, messages: &Messages) -> String {
    if message.contains(TIMEOUT_MARKER) {
        messages.request_timed_out.clone()
    } else {
        message.to_string()
    }
}
