//! The asynchronous HTTP helper.
//!
//! # Design
//! `CommonApi` pairs an `ApiClient` (checks, request building, JSON decoding)
//! with a `Transport` (the round-trip). Every verb is `build_* → execute →
//! parse_response` and resolves to a single `Result`, so a caller sees a value
//! or an error, never both and never neither. Pre-flight failures return
//! before the transport is touched.
//!
//! The helper holds no per-request state; wrap it in an `Arc` to issue
//! concurrent requests. Callers that prefer a completion closure over
//! `.await` use `dispatch`.

use std::future::Future;

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::cookies::MemoryCookieStore;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::reachability::Connectivity;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct CommonApi<T> {
    client: ApiClient,
    transport: T,
}

impl<T: Transport> CommonApi<T> {
    pub fn new(client: ApiClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn with_connectivity(mut self, probe: impl Connectivity + 'static) -> Self {
        self.client = self.client.with_connectivity(probe);
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        let request = self.client.build_get(url)?;
        self.send(request).await
    }

    pub async fn post(&self, url: &str, params: &Map<String, Value>) -> Result<Value, ApiError> {
        let request = self.client.build_post(url, params)?;
        self.send(request).await
    }

    pub async fn put(&self, url: &str, params: &Map<String, Value>) -> Result<Value, ApiError> {
        let request = self.client.build_put(url, params)?;
        self.send(request).await
    }

    pub async fn delete(&self, url: &str, cookie_name: Option<&str>) -> Result<Value, ApiError> {
        let request = self.client.build_delete(url, cookie_name)?;
        self.send(request).await
    }

    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "dispatching request");

        let response = self.transport.execute(request).await.map_err(|e| {
            warn!(%method, %url, error = %e, "transport failed");
            ApiError::Transport(e)
        })?;
        debug!(%method, %url, status = response.status, bytes = response.body.len(), "response received");

        self.client.parse_response(response).map_err(|e| {
            warn!(%method, %url, error = %e, "response was not JSON");
            e
        })
    }
}

impl CommonApi<UreqTransport> {
    /// A helper backed by `ureq` whose transport and DELETE cookie lookups
    /// share one cookie jar.
    pub fn with_ureq(config: ApiConfig) -> Self {
        let cookies = MemoryCookieStore::new();
        let client = ApiClient::new(config).with_cookie_store(cookies.clone());
        Self::new(client, UreqTransport::new(cookies))
    }

    pub fn cookies(&self) -> &MemoryCookieStore {
        self.transport.cookies()
    }
}

/// Run `request` on the current tokio runtime and hand its outcome to
/// `completion` exactly once, on whichever worker finishes it.
///
/// Must be called from within a tokio runtime.
pub fn dispatch<F, C>(request: F, completion: C) -> JoinHandle<()>
where
    F: Future<Output = Result<Value, ApiError>> + Send + 'static,
    C: FnOnce(Result<Value, ApiError>) + Send + 'static,
{
    tokio::spawn(async move { completion(request.await) })
}
