//! HTTP client layer underneath the request façade.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpTransport`]: The async trait the façade dispatches through
//! - [`HttpClient`]: The default `reqwest`-backed transport
//! - [`RequestBody`]: JSON, multipart form or raw payloads
//! - [`RequestOptions`]: Per-call headers, query, response type and timeout
//! - [`HttpResponse`]: A raw response with case-insensitive header lookup
//! - [`ApiEnvelope`]: The `{code, data, msg}` JSON envelope
//! - [`FileResult`]: A downloaded file
//! - [`TransportError`]: Failures to obtain a response
//!
//! # Example
//!
//! ```rust,ignore
//! use api_request::clients::{HttpClient, HttpTransport, RequestOptions};
//!
//! let client = HttpClient::new(&config);
//! let response = client.get("/api/users", RequestOptions::default()).await?;
//! println!("{}", response.text()?);
//! ```
//!
//! Transports do not retry; a request is sent exactly once.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::TransportError;
pub use http_client::{HttpClient, HttpTransport, SDK_VERSION};
pub use http_request::{
    merge_headers, BodyEncoding, FormFields, FormValue, HttpMethod, RequestBody, RequestOptions,
    ResponseShape,
};
pub use http_response::{
    file_name_from_disposition, ApiEnvelope, FileResult, HttpResponse, SUCCESS_CODE,
};
