//! Request builder and response parser behind the HTTP helper.
//!
//! # Design
//! `ApiClient` carries only read-only configuration plus handles to its two
//! collaborators (connectivity probe and cookie store). Each verb is split into
//! a `build_*` method that runs every pre-flight check and produces an
//! `HttpRequest`, and a shared `parse_response` that turns the raw body into a
//! JSON value. Nothing here performs I/O: `CommonApi` or a foreign host runs
//! the round-trip in between.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use url::Url;

use crate::config::ApiConfig;
use crate::cookies::{CookieStore, MemoryCookieStore};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::json::parse_json_data;
use crate::reachability::{Connectivity, NetworkStatus};

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Synchronous, stateless builder/parser for one configured API.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    connectivity: Arc<dyn Connectivity>,
    cookies: Arc<dyn CookieStore>,
}

impl ApiClient {
    /// A client that assumes the network is reachable and owns an empty
    /// cookie jar. Swap either collaborator with the `with_*` methods.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            connectivity: Arc::new(NetworkStatus::online()),
            cookies: Arc::new(MemoryCookieStore::new()),
        }
    }

    pub fn with_connectivity(mut self, probe: impl Connectivity + 'static) -> Self {
        self.connectivity = Arc::new(probe);
        self
    }

    pub fn with_cookie_store(mut self, store: impl CookieStore + 'static) -> Self {
        self.cookies = Arc::new(store);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn build_get(&self, url: &str) -> Result<HttpRequest, ApiError> {
        self.prepare(HttpMethod::Get, url)
    }

    pub fn build_post(&self, url: &str, params: &Map<String, Value>) -> Result<HttpRequest, ApiError> {
        let req = self.prepare(HttpMethod::Post, url)?;
        with_json_body(req, params)
    }

    pub fn build_put(&self, url: &str, params: &Map<String, Value>) -> Result<HttpRequest, ApiError> {
        let req = self.prepare(HttpMethod::Put, url)?;
        with_json_body(req, params)
    }

    /// Build a DELETE request. When `cookie_name` names a stored cookie with a
    /// non-empty value, that value is sent in a header of the same name.
    pub fn build_delete(&self, url: &str, cookie_name: Option<&str>) -> Result<HttpRequest, ApiError> {
        let mut req = self.prepare(HttpMethod::Delete, url)?;
        if let Some(name) = cookie_name {
            match self.cookies.cookie(name) {
                Some(value) if !value.is_empty() => req.headers.push((name.to_string(), value)),
                _ => tracing::debug!(cookie = name, "no cookie to forward"),
            }
        }
        Ok(req)
    }

    /// Decode a response body, dropping the configured prefix first.
    ///
    /// The status code is not consulted; error payloads are JSON too and are
    /// returned to the caller as values.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_json_data(&response.body, self.config.skip_response_data_length)
    }

    /// Connectivity, then URL checks, then the base request with the
    /// configured headers applied.
    fn prepare(&self, method: HttpMethod, url: &str) -> Result<HttpRequest, ApiError> {
        if !self.connectivity.is_connected() {
            return Err(ApiError::NoConnectivity);
        }
        if url.is_empty() {
            return Err(ApiError::EmptyUrl);
        }
        if !is_valid_url(url) {
            return Err(ApiError::InvalidUrl);
        }

        let headers = self
            .config
            .additional_headers
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: None,
        })
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("connected", &self.connectivity.is_connected())
            .finish_non_exhaustive()
    }
}

/// An absolute URL made only of characters a URI may carry literally.
///
/// `Url::parse` repairs input that the wire format forbids (raw spaces,
/// backslashes, `{placeholder}` braces, a missing `//`), so the raw string is
/// checked as well.
fn is_valid_url(url: &str) -> bool {
    if !url.chars().all(is_uri_char) {
        return false;
    }
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    // A host is only legitimate after an explicit `scheme://`.
    !parsed.has_host()
        || url
            .get(parsed.scheme().len()..)
            .is_some_and(|rest| rest.starts_with("://"))
}

fn is_uri_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '{' | '}' | '\\' | '<' | '>' | '"' | '|' | '^' | '`')
}

fn with_json_body(mut req: HttpRequest, params: &Map<String, Value>) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_vec(params)?;
    req.headers.push(("Accept".to_string(), JSON_MEDIA_TYPE.to_string()));
    req.headers.push(("Content-Type".to_string(), JSON_MEDIA_TYPE.to_string()));
    req.body = Some(body);
    Ok(req)
}
