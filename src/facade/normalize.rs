//! Turning a [`RequestDescriptor`] into a fully populated request.
//!
//! Everything here is pure: no I/O, no callbacks invoked.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::clients::{
    merge_headers, BodyEncoding, FormFields, HttpMethod, RequestBody, ResponseShape,
};
use crate::facade::descriptor::RequestDescriptor;
use crate::facade::notify::TOKEN_HEADER;

/// A request with every default resolved, ready for the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedRequest {
    /// Full transport path: API prefix plus logical path.
    pub path: String,
    /// The effective method.
    pub method: HttpMethod,
    /// The effective body encoding.
    pub body_encoding: BodyEncoding,
    /// Whether failures are shown through the notifier.
    pub notify_on_error: bool,
    /// The payload, converted to a multipart form when requested.
    pub payload: Option<RequestBody>,
    /// Headers synthesized by [`build_headers`] plus per-call extras.
    pub headers: HashMap<String, String>,
    /// Per-call timeout override.
    pub timeout: Option<Duration>,
    /// Expected response shape.
    pub expected_response_shape: ResponseShape,
    /// Name used for a download whose response names no file.
    pub fallback_file_name: String,
}

/// Resolves defaults, converts the payload and builds headers.
///
/// Callbacks on the descriptor are dropped; take them out first if they
/// are needed.
///
/// # Example
///
/// ```rust
/// use api_request::{HttpMethod, RequestDescriptor};
/// use api_request::facade::normalize;
///
/// let request = normalize(RequestDescriptor::new("users"), "/api/", None);
///
/// assert_eq!(request.path, "/api/users");
/// assert_eq!(request.method, HttpMethod::Post);
/// assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");
/// ```
#[must_use]
pub fn normalize(
    descriptor: RequestDescriptor,
    api_prefix: &str,
    token: Option<&str>,
) -> NormalizedRequest {
    let method = descriptor.method.unwrap_or_default();
    let body_encoding = descriptor.body_encoding.unwrap_or_default();
    let notify_on_error = descriptor.notify_on_error.unwrap_or(true);

    let fallback_file_name = descriptor
        .default_file_name
        .or_else(|| descriptor.payload.as_ref().and_then(RequestBody::as_file_name))
        .unwrap_or_default();

    let payload = match descriptor.payload {
        Some(RequestBody::Json(Value::Object(map))) if descriptor.encode_as_multipart => {
            Some(RequestBody::Form(FormFields::from_json_map(&map)))
        }
        other => other,
    };

    let mut headers = build_headers(method, body_encoding, token);
    merge_headers(&mut headers, descriptor.headers);

    NormalizedRequest {
        path: join_path(api_prefix, &descriptor.url),
        method,
        body_encoding,
        notify_on_error,
        payload,
        headers,
        timeout: descriptor.timeout,
        expected_response_shape: descriptor.expected_response_shape,
        fallback_file_name,
    }
}

/// Builds the synthesized request headers.
///
/// POST requests carry a `Content-Type` matching `encoding`; GET requests
/// carry none. A token, when present, is attached as the `token` header.
#[must_use]
pub fn build_headers(
    method: HttpMethod,
    encoding: BodyEncoding,
    token: Option<&str>,
) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    if method == HttpMethod::Post {
        headers.insert(
            "Content-Type".to_string(),
            encoding.as_content_type().to_string(),
        );
    }

    if let Some(token) = token {
        headers.insert(TOKEN_HEADER.to_string(), token.to_string());
    }

    headers
}

/// Joins the API prefix and a logical path into a rooted transport path.
///
/// The result always starts with `/` and has exactly one `/` between the
/// prefix and the path, whatever slashes either side carries.
#[must_use]
pub fn join_path(api_prefix: &str, url: &str) -> String {
    let prefix = api_prefix.trim_matches('/');
    let url = url.trim_start_matches('/');
    if prefix.is_empty() {
        format!("/{url}")
    } else {
        format!("/{prefix}/{url}")
    }
}
