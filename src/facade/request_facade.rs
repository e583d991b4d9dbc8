//! The request façade.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::clients::{
    FileResult, HttpClient, HttpMethod, HttpResponse, HttpTransport, RequestOptions, ResponseShape,
    TransportError,
};
use crate::config::RequestConfig;
use crate::facade::descriptor::{CompleteCallback, ErrorCallback, RequestDescriptor};
use crate::facade::errors::RequestError;
use crate::facade::interpret::{interpret, Dispatched};
use crate::facade::normalize::{normalize, NormalizedRequest};
use crate::facade::notify::{tip_message, Notifier, TokenProvider, TracingNotifier};

/// Runs the completion callback when dropped.
///
/// Holding one for the whole dispatch guarantees the callback runs exactly
/// once on every exit path, including unwinding and cancellation.
struct CompletionGuard(Option<CompleteCallback>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(on_complete) = self.0.take() {
            on_complete();
        }
    }
}

/// Normalizes application calls into a uniform request/response contract.
///
/// Each [`dispatch`](Self::dispatch) fills in defaults, builds headers,
/// sends the request through the injected [`HttpTransport`], interprets the
/// response and reports failures through the descriptor's error callback and
/// the [`Notifier`].
///
/// # Thread Safety
///
/// `RequestFacade` is `Send + Sync`; concurrent dispatches are independent.
///
/// # Example
///
/// ```rust,ignore
/// use api_request::{RequestConfig, RequestDescriptor, RequestFacade};
/// use serde_json::json;
///
/// let facade = RequestFacade::from_config(RequestConfig::from_env()?);
///
/// let descriptor = RequestDescriptor::builder("users/create")
///     .payload(json!({"name": "Ada"}))
///     .on_complete(|| println!("done"))
///     .build();
///
/// let user: serde_json::Value = facade.dispatch_as(descriptor).await?;
/// ```
pub struct RequestFacade {
    transport: Arc<dyn HttpTransport>,
    config: RequestConfig,
    notifier: Arc<dyn Notifier>,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

// Verify RequestFacade is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestFacade>();
};

impl RequestFacade {
    /// Creates a façade dispatching through `transport`.
    ///
    /// Notifications go to a [`TracingNotifier`] until replaced with
    /// [`with_notifier`](Self::with_notifier).
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, config: RequestConfig) -> Self {
        Self {
            transport,
            config,
            notifier: Arc::new(TracingNotifier),
            token_provider: None,
        }
    }

    /// Creates a façade over the default [`HttpClient`].
    #[must_use]
    pub fn from_config(config: RequestConfig) -> Self {
        let client = HttpClient::new(&config);
        Self::new(Arc::new(client), config)
    }

    /// Replaces the notification channel.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Attaches a token provider; its token is sent with every request.
    #[must_use]
    pub fn with_token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Dispatches one request.
    ///
    /// Resolves to the envelope `data` for JSON responses and to a
    /// [`FileResult`] for binary ones. The descriptor's `on_complete` runs
    /// exactly once whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`RequestError::MissingParameters`] if the descriptor has an empty
    ///   path; nothing is sent and no error is reported.
    /// - [`RequestError::Api`] if the envelope `code` is not 200.
    /// - [`RequestError::Transport`] with the original error if the exchange
    ///   failed.
    ///
    /// Api and transport failures are first reported: the message (with any
    /// timeout rewritten) goes to `on_error` and, unless disabled, to the
    /// notifier.
    pub async fn dispatch(&self, descriptor: RequestDescriptor) -> Result<Dispatched, RequestError> {
        self.dispatch_with(descriptor, Ok).await
    }

    /// Dispatches a request and deserializes the envelope `data` into `T`.
    ///
    /// A decode failure is reported like any other failure, before
    /// `on_complete` runs.
    ///
    /// # Errors
    ///
    /// Everything [`dispatch`](Self::dispatch) returns, plus
    /// [`RequestError::Decode`] if the data does not match `T`.
    pub async fn dispatch_as<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, RequestError> {
        self.dispatch_with(descriptor, Dispatched::deserialize).await
    }

    /// Dispatches a request expecting a file download.
    ///
    /// # Errors
    ///
    /// Everything [`dispatch`](Self::dispatch) returns.
    pub async fn download(
        &self,
        mut descriptor: RequestDescriptor,
    ) -> Result<FileResult, RequestError> {
        descriptor.expected_response_shape = ResponseShape::Binary;
        self.dispatch_with(descriptor, |dispatched| {
            // Binary interpretation only yields files; this error is the type-level fallback.
            dispatched.into_file().ok_or(RequestError::UnexpectedShape {
                expected: ResponseShape::Binary,
            })
        })
        .await
    }

    /// Runs one dispatch and converts its result with `finish`.
    ///
    /// Every failure, including one raised by `finish`, is reported before
    /// the completion guard fires.
    async fn dispatch_with<T, F>(
        &self,
        mut descriptor: RequestDescriptor,
        finish: F,
    ) -> Result<T, RequestError>
    where
        F: FnOnce(Dispatched) -> Result<T, RequestError> + Send,
    {
        let _completion = CompletionGuard(descriptor.on_complete.take());
        let on_error = descriptor.on_error.take();

        if descriptor.url.trim().is_empty() {
            return Err(RequestError::MissingParameters {
                message: self.config.messages().missing_parameters.clone(),
            });
        }

        let token = self.token_provider.as_ref().and_then(|p| p.token());
        let request = normalize(descriptor, self.config.api_prefix(), token.as_deref());

        let path = request.path.clone();
        let method = request.method;
        let shape = request.expected_response_shape;
        let notify_on_error = request.notify_on_error;
        let fallback_file_name = request.fallback_file_name.clone();

        tracing::debug!(%method, path = %path, "Dispatching request");

        let result = match self.send(request).await {
            Ok(response) => interpret(response, shape, &fallback_file_name, self.config.messages())
                .and_then(finish),
            Err(e) => Err(RequestError::Transport(e)),
        };

        if let Err(error) = &result {
            tracing::warn!(%method, path = %path, error = %error, "Request failed");
            self.tip_error(&error.to_string(), notify_on_error, on_error);
        }

        result
    }

    /// Routes a normalized request to the transport.
    async fn send(&self, request: NormalizedRequest) -> Result<HttpResponse, TransportError> {
        let NormalizedRequest {
            path,
            method,
            payload,
            headers,
            timeout,
            expected_response_shape,
            ..
        } = request;

        let mut options = RequestOptions {
            headers,
            params: None,
            response_type: expected_response_shape,
            timeout,
        };

        match method {
            HttpMethod::Post => self.transport.post(&path, payload, options).await,
            HttpMethod::Get => {
                options.params = payload.map(|payload| payload.to_query_pairs());
                self.transport.get(&path, options).await
            }
        }
    }

    /// Reports a failure message to the callback and, if enabled, the notifier.
    fn tip_error(&self, message: &str, notify: bool, on_error: Option<ErrorCallback>) {
        let message = tip_message(message, self.config.messages());

        if let Some(on_error) = on_error {
            on_error(&message);
        }

        if notify {
            self.notifier.show_error(&message);
        }
    }
}

impl fmt::Debug for RequestFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFacade")
            .field("config", &self.config)
            .field("token_provider", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}
