//! HTTP request types handed to an [`HttpTransport`](crate::clients::HttpTransport).
//!
//! This module provides the method, encoding and body types the façade
//! resolves a request into, plus the per-call [`RequestOptions`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde_json::Value;

/// HTTP methods supported by the façade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET; the payload travels as query parameters.
    Get,
    /// HTTP POST; the payload travels as the request body.
    #[default]
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
        }
    }
}

/// Encoding of a POST body, which selects its `Content-Type`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// JSON content type (`application/json`).
    #[default]
    Json,
    /// URL-encoded form content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl BodyEncoding {
    /// Returns the MIME type string for this encoding.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// The response shape a caller expects back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON envelope `{code, data, msg}`.
    #[default]
    Json,
    /// A raw file download.
    Binary,
}

/// A single multipart form field value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue {
    /// A plain text field.
    Text(String),
    /// A file upload.
    File {
        /// File name reported to the server.
        file_name: String,
        /// MIME type of the content, if known.
        content_type: Option<String>,
        /// The file content.
        bytes: Vec<u8>,
    },
}

/// An ordered list of multipart form fields.
///
/// Field names may repeat; order is preserved on the wire.
///
/// # Example
///
/// ```rust
/// use api_request::clients::FormFields;
///
/// let form = FormFields::new()
///     .text("title", "Quarterly report")
///     .file("upload", "report.csv", b"a,b\n1,2\n".to_vec());
///
/// assert_eq!(form.len(), 2);
/// assert_eq!(form.names().collect::<Vec<_>>(), vec!["title", "upload"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, FormValue)>,
}

impl FormFields {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, FormValue::Text(value.into()));
        self
    }

    /// Appends a file field without an explicit MIME type.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.push(
            name,
            FormValue::File {
                file_name: file_name.into(),
                content_type: None,
                bytes,
            },
        );
        self
    }

    /// Appends a field.
    pub fn push(&mut self, name: impl Into<String>, value: FormValue) {
        self.fields.push((name.into(), value));
    }

    /// Returns the first value recorded under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Iterates over field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the form has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a form from a JSON mapping, one field per key.
    ///
    /// Strings are used as-is, `null` becomes an empty field and every other
    /// value is sent as its compact JSON text.
    #[must_use]
    pub fn from_json_map(map: &serde_json::Map<String, Value>) -> Self {
        let mut form = Self::new();
        for (key, value) in map {
            form.push(key.clone(), FormValue::Text(json_to_text(value)));
        }
        form
    }
}

impl IntoIterator for FormFields {
    type Item = (String, FormValue);
    type IntoIter = std::vec::IntoIter<(String, FormValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// The payload of a request.
///
/// The variant is chosen by the caller; the façade never guesses a payload's
/// kind from its shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// A JSON value: the body of a POST, the query of a GET.
    Json(Value),
    /// Multipart form fields, possibly carrying files.
    Form(FormFields),
    /// Raw bytes sent as the body of a POST.
    Raw(Vec<u8>),
}

impl RequestBody {
    /// Flattens the payload into query parameters for a GET request.
    ///
    /// Object members map to `key=value` pairs (`null` members are skipped,
    /// arrays repeat as `key[]`, nested objects are sent as JSON text). Text
    /// form fields map to pairs; files and raw bodies contribute nothing.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        match self {
            Self::Json(Value::Object(map)) => {
                for (key, value) in map {
                    match value {
                        Value::Null => {}
                        Value::Array(items) => {
                            let name = format!("{key}[]");
                            for item in items.iter().filter(|item| !item.is_null()) {
                                pairs.push((name.clone(), json_to_text(item)));
                            }
                        }
                        other => pairs.push((key.clone(), json_to_text(other))),
                    }
                }
            }
            Self::Form(form) => {
                for (name, value) in form.iter() {
                    if let FormValue::Text(text) = value {
                        pairs.push((name.to_string(), text.clone()));
                    }
                }
            }
            Self::Json(_) | Self::Raw(_) => {}
        }
        pairs
    }

    /// Renders the payload as a fallback download name.
    ///
    /// A JSON string is used verbatim and any other JSON value as its compact
    /// text; forms and raw bodies have no name.
    #[must_use]
    pub fn as_file_name(&self) -> Option<String> {
        match self {
            Self::Json(Value::Null) | Self::Form(_) | Self::Raw(_) => None,
            Self::Json(value) => Some(json_to_text(value)),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<FormFields> for RequestBody {
    fn from(form: FormFields) -> Self {
        Self::Form(form)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

/// Per-call options passed to the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Headers to send, in addition to the transport's defaults.
    pub headers: HashMap<String, String>,
    /// Query parameters (GET only).
    pub params: Option<Vec<(String, String)>>,
    /// Expected response shape.
    pub response_type: ResponseShape,
    /// Timeout overriding the transport default.
    pub timeout: Option<Duration>,
}

/// Merges `extra` into `headers`.
///
/// Header names are compared case-insensitively: an incoming header replaces
/// any existing entry with the same name in any case, so each name appears
/// at most once.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use api_request::clients::merge_headers;
///
/// let mut headers = HashMap::from([("Content-Type".to_string(), "application/json".to_string())]);
/// merge_headers(&mut headers, [("content-type".to_string(), "text/plain".to_string())]);
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("content-type").unwrap(), "text/plain");
/// ```
pub fn merge_headers<I>(headers: &mut HashMap<String, String>, extra: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, value) in extra {
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        headers.insert(name, value);
    }
}

fn json_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
