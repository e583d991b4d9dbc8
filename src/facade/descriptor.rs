//! The per-call request description.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::clients::{merge_headers, BodyEncoding, HttpMethod, RequestBody, ResponseShape};

/// Callback receiving the (rewritten) error message of a failed dispatch.
pub type ErrorCallback = Box<dyn FnOnce(&str) + Send>;

/// Callback run once when a dispatch finishes, whatever its outcome.
pub type CompleteCallback = Box<dyn FnOnce() + Send>;

/// A declarative description of one request.
///
/// Unset fields are filled with defaults by
/// [`normalize`](crate::facade::normalize): `POST`, JSON encoding,
/// notifications on, JSON response.
///
/// # Example
///
/// ```rust
/// use api_request::{HttpMethod, RequestDescriptor};
/// use serde_json::json;
///
/// let descriptor = RequestDescriptor::builder("users/search")
///     .method(HttpMethod::Get)
///     .payload(json!({"q": "ada"}))
///     .on_error(|msg| eprintln!("search failed: {msg}"))
///     .build();
///
/// assert_eq!(descriptor.url(), "users/search");
/// ```
pub struct RequestDescriptor {
    pub(crate) url: String,
    pub(crate) payload: Option<RequestBody>,
    pub(crate) method: Option<HttpMethod>,
    pub(crate) body_encoding: Option<BodyEncoding>,
    pub(crate) encode_as_multipart: bool,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) on_complete: Option<CompleteCallback>,
    pub(crate) notify_on_error: Option<bool>,
    pub(crate) expected_response_shape: ResponseShape,
    pub(crate) timeout: Option<Duration>,
    pub(crate) default_file_name: Option<String>,
    pub(crate) headers: HashMap<String, String>,
}

impl RequestDescriptor {
    /// Creates a descriptor for `url` with every option unset.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::builder(url).build()
    }

    /// Creates a new builder for a request to `url`.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::new(url)
    }

    /// Returns the logical path.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&RequestBody> {
        self.payload.as_ref()
    }

    /// Returns the expected response shape.
    #[must_use]
    pub const fn expected_response_shape(&self) -> ResponseShape {
        self.expected_response_shape
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("payload", &self.payload)
            .field("method", &self.method)
            .field("body_encoding", &self.body_encoding)
            .field("encode_as_multipart", &self.encode_as_multipart)
            .field("on_error", &self.on_error.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("notify_on_error", &self.notify_on_error)
            .field("expected_response_shape", &self.expected_response_shape)
            .field("timeout", &self.timeout)
            .field("default_file_name", &self.default_file_name)
            .field("headers", &self.headers)
            .finish()
    }
}

/// Builder for constructing [`RequestDescriptor`] instances.
#[must_use]
pub struct RequestDescriptorBuilder {
    descriptor: RequestDescriptor,
}

impl RequestDescriptorBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            descriptor: RequestDescriptor {
                url: url.into(),
                payload: None,
                method: None,
                body_encoding: None,
                encode_as_multipart: false,
                on_error: None,
                on_complete: None,
                notify_on_error: None,
                expected_response_shape: ResponseShape::Json,
                timeout: None,
                default_file_name: None,
                headers: HashMap::new(),
            },
        }
    }

    /// Sets the payload.
    pub fn payload(mut self, payload: impl Into<RequestBody>) -> Self {
        self.descriptor.payload = Some(payload.into());
        self
    }

    /// Sets the HTTP method (default `POST`).
    pub const fn method(mut self, method: HttpMethod) -> Self {
        self.descriptor.method = Some(method);
        self
    }

    /// Sets the POST body encoding (default JSON).
    pub const fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.descriptor.body_encoding = Some(encoding);
        self
    }

    /// Converts a JSON object payload into multipart form fields.
    pub const fn encode_as_multipart(mut self, enabled: bool) -> Self {
        self.descriptor.encode_as_multipart = enabled;
        self
    }

    /// Sets the callback invoked with the error message on failure.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&str) + Send + 'static,
    {
        self.descriptor.on_error = Some(Box::new(callback));
        self
    }

    /// Sets the callback invoked once when the dispatch finishes.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.descriptor.on_complete = Some(Box::new(callback));
        self
    }

    /// Enables or disables the user-visible error notification (default on).
    pub const fn notify_on_error(mut self, notify: bool) -> Self {
        self.descriptor.notify_on_error = Some(notify);
        self
    }

    /// Sets the expected response shape (default JSON).
    pub const fn expected_response_shape(mut self, shape: ResponseShape) -> Self {
        self.descriptor.expected_response_shape = shape;
        self
    }

    /// Overrides the configured default timeout.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.descriptor.timeout = Some(timeout);
        self
    }

    /// Sets the name used for a download whose response carries none.
    pub fn default_file_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.default_file_name = Some(name.into());
        self
    }

    /// Adds a header sent in place of any synthesized one of the same name.
    ///
    /// Names are case-insensitive; a later call for the same name wins.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        merge_headers(&mut self.descriptor.headers, [(key.into(), value.into())]);
        self
    }

    /// Builds the [`RequestDescriptor`].
    #[must_use]
    pub fn build(self) -> RequestDescriptor {
        self.descriptor
    }
}

// Verify RequestDescriptor can cross await points in a Send future
const _: fn() = || {
    const fn assert_send<T: Send>() {}
    assert_send::<RequestDescriptor>();
};
