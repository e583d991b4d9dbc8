//! # api-request
//!
//! A uniform request/response façade over an HTTP client.
//!
//! ## Overview
//!
//! Application code describes a call with a [`RequestDescriptor`] and hands
//! it to a [`RequestFacade`], which:
//! - fills in defaults (`POST`, JSON body, notifications on)
//! - builds headers and, when asked, turns a JSON mapping into a multipart form
//! - dispatches through an injected [`HttpTransport`](clients::HttpTransport)
//! - unwraps the `{code, data, msg}` envelope, or returns a downloaded file
//! - reports failures to a per-call callback and a [`Notifier`](facade::Notifier)
//! - always runs the per-call completion callback
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use api_request::{BaseUrl, HttpMethod, RequestConfig, RequestDescriptor, RequestFacade};
//! use serde_json::json;
//!
//! let config = RequestConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let facade = RequestFacade::from_config(config);
//!
//! // POST /api/users/create with a JSON body
//! let created = facade
//!     .dispatch(
//!         RequestDescriptor::builder("users/create")
//!             .payload(json!({"name": "Ada"}))
//!             .on_error(|msg| eprintln!("create failed: {msg}"))
//!             .build(),
//!     )
//!     .await?;
//!
//! // GET /api/reports/export?month=2024-01 as a file
//! let file = facade
//!     .download(
//!         RequestDescriptor::builder("reports/export")
//!             .method(HttpMethod::Get)
//!             .payload(json!({"month": "2024-01"}))
//!             .build(),
//!     )
//!     .await?;
//! println!("{} ({} bytes)", file.file_name, file.file_blob.len());
//! ```
//!
//! ## Configuration
//!
//! [`RequestConfig::from_env`] reads `API_BASE_URL` and `API_TIMEOUT_MS`
//! (default 3000) once; the resulting configuration is immutable.
//!
//! ## Design Principles
//!
//! - **No global state**: the transport and configuration are owned by the façade
//! - **Pure classification**: normalization, interpretation and message
//!   rewriting do no I/O and are tested without a network
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with Tokio async runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod facade;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, Messages, RequestConfig, RequestConfigBuilder};
pub use error::ConfigError;

pub use clients::{
    ApiEnvelope, BodyEncoding, FileResult, FormFields, FormValue, HttpClient, HttpMethod,
    HttpResponse, HttpTransport, RequestBody, RequestOptions, ResponseShape, TransportError,
};

pub use facade::{Dispatched, RequestDescriptor, RequestError, RequestFacade};
