//! The transport seam and its reqwest implementation.
//!
//! The façade talks to the network only through the [`HttpTransport`] trait.
//! [`HttpClient`] is the default implementation; tests and embedders can
//! substitute their own.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};

use crate::clients::errors::TransportError;
use crate::clients::http_request::{
    merge_headers, BodyEncoding, FormFields, FormValue, RequestBody, RequestOptions,
};
use crate::clients::http_response::HttpResponse;
use crate::config::RequestConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `Accept` header sent with every request.
const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";

/// An HTTP client the façade can dispatch through.
///
/// Implementations must return `Ok` for any response that arrived, whatever
/// its status; only failures to obtain a response are errors. `path` is
/// relative to the implementation's base URL.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a POST request with an optional body.
    async fn post(
        &self,
        path: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError>;

    /// Sends a GET request; the payload travels in `options.params`.
    async fn get(&self, path: &str, options: RequestOptions)
        -> Result<HttpResponse, TransportError>;
}

/// HTTP client backed by `reqwest`.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers including User-Agent
/// - The configured default timeout, overridable per call
/// - JSON, URL-encoded, multipart and raw request bodies
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URI (e.g., `https://api.example.com`).
    base_uri: String,
    /// Timeout used when a call does not override it.
    timeout: Duration,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    ///
    /// # Example
    ///
    /// ```rust
    /// use api_request::{BaseUrl, RequestConfig};
    /// use api_request::clients::HttpClient;
    ///
    /// let config = RequestConfig::builder()
    ///     .base_url(BaseUrl::new("https://api.example.com").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = HttpClient::new(&config);
    /// assert_eq!(client.base_uri(), "https://api.example.com");
    /// ```
    #[must_use]
    pub fn new(config: &RequestConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}api-request v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), DEFAULT_ACCEPT.to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_uri: config.base_url().as_ref().to_string(),
            timeout: config.timeout(),
            default_headers,
        }
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default timeout for this client.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Applies headers and timeout, sends the request and collects the response.
    async fn execute(
        &self,
        mut req_builder: reqwest::RequestBuilder,
        path: &str,
        options: RequestOptions,
        skip_content_type: bool,
    ) -> Result<HttpResponse, TransportError> {
        let timeout = options.timeout.unwrap_or(self.timeout);
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        req_builder = req_builder.timeout(timeout);

        let mut headers = self.default_headers.clone();
        merge_headers(&mut headers, options.headers);
        let mut header_map = HeaderMap::new();
        for (key, value) in &headers {
            if skip_content_type && key.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                continue;
            }
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| TransportError::InvalidRequest(format!("invalid header name '{key}'")))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                TransportError::InvalidRequest(format!("invalid value for header '{key}'"))
            })?;
            header_map.insert(name, value);
        }
        req_builder = req_builder.headers(header_map);

        if let Some(params) = &options.params {
            req_builder = req_builder.query(params);
        }

        tracing::debug!(path, timeout_ms, "Sending request");

        let map_timeout = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout { timeout_ms }
            } else {
                TransportError::Network(e)
            }
        };

        let res = req_builder.send().await.map_err(map_timeout)?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await.map_err(map_timeout)?.to_vec();

        tracing::debug!(path, code, bytes = body.len(), "Received response");

        Ok(HttpResponse::new(code, res_headers, body))
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_uri)
        } else {
            format!("{}/{path}", self.base_uri)
        }
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Builds a multipart form from form fields.
    fn multipart_form(fields: FormFields) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let mut part = Part::bytes(bytes).file_name(file_name);
                    if let Some(content_type) = content_type {
                        part = part.mime_str(&content_type)?;
                    }
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }

    /// Returns `true` if the headers declare a URL-encoded form body.
    fn declares_form_encoding(headers: &HashMap<String, String>) -> bool {
        headers.iter().any(|(key, value)| {
            key.eq_ignore_ascii_case(CONTENT_TYPE.as_str())
                && value.starts_with(BodyEncoding::FormUrlEncoded.as_content_type())
        })
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn post(
        &self,
        path: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let mut req_builder = self.client.post(self.url(path));
        let mut body_sets_content_type = false;

        match body {
            None => {}
            Some(RequestBody::Json(value)) => {
                if value.is_object() && Self::declares_form_encoding(&options.headers) {
                    req_builder = req_builder.form(&RequestBody::Json(value).to_query_pairs());
                    body_sets_content_type = true;
                } else {
                    req_builder = req_builder.body(value.to_string());
                }
            }
            Some(RequestBody::Form(fields)) => {
                req_builder = req_builder.multipart(Self::multipart_form(fields)?);
                body_sets_content_type = true;
            }
            Some(RequestBody::Raw(bytes)) => {
                req_builder = req_builder.body(bytes);
            }
        }

        self.execute(req_builder, path, options, body_sets_content_type)
            .await
    }

    async fn get(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let req_builder = self.client.get(self.url(path));
        self.execute(req_builder, path, options, false).await
    }
}
