//! The request façade: one entry point for every API call.
//!
//! # Overview
//!
//! - [`RequestFacade`]: dispatches [`RequestDescriptor`]s through an [`HttpTransport`](crate::clients::HttpTransport)
//! - [`RequestDescriptor`]: the declarative, per-call request description
//! - [`normalize`] / [`build_headers`]: pure default resolution and header synthesis
//! - [`interpret`]: turns a raw response into [`Dispatched`] or a [`RequestError`]
//! - [`Notifier`] / [`tip_message`]: error notification, with timeout rewriting
//! - [`TokenProvider`]: extension point for attaching an auth token
//!
//! # Flow
//!
//! ```text
//! descriptor -> normalize -> build_headers -> transport.post/get -> interpret
//!            -> Ok(Dispatched) | Err(RequestError) -> on_complete (always)
//! ```
//!
//! Failures other than [`RequestError::MissingParameters`] are reported before
//! they are returned: the message goes to the descriptor's `on_error` callback
//! and, unless `notify_on_error(false)` was set, to the notifier.

mod descriptor;
mod errors;
mod interpret;
mod normalize;
mod notify;
mod request_facade;

pub use descriptor::{CompleteCallback, ErrorCallback, RequestDescriptor, RequestDescriptorBuilder};
pub use errors::RequestError;
pub use interpret::{interpret, Dispatched};
pub use normalize::{build_headers, join_path, normalize, NormalizedRequest};
pub use notify::{tip_message, Notifier, TokenProvider, TracingNotifier, TOKEN_HEADER};
pub use request_facade::RequestFacade;
