//! Generic JSON-over-HTTP helper for mobile API clients.
//!
//! # Overview
//! `CommonApi` performs one GET/POST/PUT/DELETE exchange per call: check
//! connectivity, validate the URL, build the request (extra headers, JSON
//! body, forwarded cookie), send it through a `Transport`, drop an optional
//! response prefix and decode the body as JSON. Each call resolves to exactly
//! one `Result<serde_json::Value, ApiError>`.
//!
//! # Design
//! - `ApiClient` is the I/O-free half: `build_*` produces an `HttpRequest`,
//!   `parse_response` consumes an `HttpResponse`. The FFI crate exposes this
//!   half so a native host can run the network round-trip itself.
//! - `CommonApi<T: Transport>` is the async half; `UreqTransport` is the
//!   bundled transport.
//! - Per-API differences (prefix length, extra headers) are an `ApiConfig`
//!   value fixed at construction.
//! - Connectivity and cookies are traits so hosts can plug in platform state.
//! - `params` holds the URL helpers concrete API methods are built from.

pub mod client;
pub mod config;
pub mod cookies;
pub mod error;
pub mod helper;
pub mod http;
pub mod json;
pub mod params;
pub mod reachability;
pub mod transport;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use cookies::{CookieStore, MemoryCookieStore};
pub use error::{ApiError, ErrorKind, TransportError};
pub use helper::{dispatch, CommonApi};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{method_key_substitute, method_params_from_map};
pub use reachability::{Connectivity, NetworkStatus};
pub use transport::{Transport, UreqTransport};
