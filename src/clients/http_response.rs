//! HTTP response types.
//!
//! This module provides the raw [`HttpResponse`] returned by a transport and
//! the two shapes the façade interprets it into: the JSON [`ApiEnvelope`] and
//! the downloaded [`FileResult`].

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope `code` that signals success.
pub const SUCCESS_CODE: i64 = 200;

/// Marker preceding the file name inside a `content-disposition` header.
const FILE_NAME_MARKER: &str = "fileName=";

/// A raw HTTP response.
///
/// Header names are stored lowercased, so lookups through [`header`](Self::header)
/// are case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The undecoded response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, lowercasing header names.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::with_capacity(headers.len());
        for (name, values) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }

        Self {
            code,
            headers: normalized,
            body,
        }
    }

    /// Creates a response with a JSON body and `content-type: application/json`.
    #[must_use]
    pub fn json(code: u16, body: &Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/json".to_string()],
        );
        Self::new(code, headers, body.to_string().into_bytes())
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Content-Type` header value, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the `Content-Disposition` header value, if present.
    #[must_use]
    pub fn content_disposition(&self) -> Option<&str> {
        self.header("content-disposition")
    }

    /// Returns `true` if the content type names a JSON document.
    ///
    /// Parameters such as `charset` are ignored, and `+json` suffixed types
    /// count as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type().is_some_and(|value| {
            let essence = value.split(';').next().unwrap_or_default().trim();
            essence.eq_ignore_ascii_case("application/json")
                || essence.to_ascii_lowercase().ends_with("+json")
        })
    }

    /// Decodes the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`std::str::Utf8Error`] if the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// Extracts the download file name from the `Content-Disposition` header.
    ///
    /// See [`file_name_from_disposition`].
    #[must_use]
    pub fn file_name(&self) -> Option<String> {
        self.content_disposition()
            .and_then(file_name_from_disposition)
    }
}

/// Extracts a file name from a `Content-Disposition` header value.
///
/// The name follows the case-sensitive `fileName=` marker and runs to the
/// next `;` or the end of the value. Surrounding quotes are removed and the
/// name is percent-decoded; a name that does not decode to UTF-8 is returned
/// as written.
///
/// # Example
///
/// ```rust
/// use api_request::clients::file_name_from_disposition;
///
/// assert_eq!(
///     file_name_from_disposition("attachment; fileName=%E6%8A%A5%E8%A1%A8.csv"),
///     Some("报表.csv".to_string())
/// );
/// assert_eq!(file_name_from_disposition("inline"), None);
/// ```
#[must_use]
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    let start = header.find(FILE_NAME_MARKER)? + FILE_NAME_MARKER.len();
    let raw = header[start..]
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');

    let name = urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |n| n.into_owned());
    Some(name)
}

/// The JSON envelope every API response is wrapped in.
///
/// `code == 200` is the only success signal. Absent or `null` fields take
/// their defaults, so an empty body parses to an envelope that is not a
/// success.
///
/// # Example
///
/// ```rust
/// use api_request::clients::ApiEnvelope;
///
/// let envelope = ApiEnvelope::from_body(br#"{"code":200,"data":[1,2],"msg":""}"#).unwrap();
/// assert!(envelope.is_success());
///
/// let empty = ApiEnvelope::from_body(b"").unwrap();
/// assert!(!empty.is_success());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Application status code.
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    /// The payload of a successful response.
    #[serde(default)]
    pub data: Value,
    /// Human-readable message, describing the failure when `code != 200`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
}

impl ApiEnvelope {
    /// Parses an envelope from a response body.
    ///
    /// An empty body or a JSON `null` yields the default envelope.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the body is not a JSON object with
    /// envelope-compatible fields.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let envelope: Option<Self> = serde_json::from_slice(body)?;
        Ok(envelope.unwrap_or_default())
    }

    /// Creates the failure envelope used when an error body is unreadable.
    #[must_use]
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self {
            code: -1,
            data: Value::Null,
            msg: msg.into(),
        }
    }

    /// Returns `true` if `code` signals success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// A downloaded file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileResult {
    /// The name of the file, from `Content-Disposition` or a caller fallback.
    pub file_name: String,
    /// The file content.
    pub file_blob: Vec<u8>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
