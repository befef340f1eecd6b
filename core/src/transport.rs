//! Network transport: executes an `HttpRequest` and returns the raw response.
//!
//! # Design
//! `Transport` is the seam between the helper and an HTTP library. The helper
//! never inspects the status code, so a transport only fails for I/O-level
//! problems (DNS, connect, TLS, truncated body), not for 4xx/5xx.
//!
//! `UreqTransport` drives a blocking `ureq` agent on tokio's blocking pool and
//! feeds every `Set-Cookie` header into a shared `MemoryCookieStore`, the same
//! jar the helper reads when a DELETE needs to forward a cookie.

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::cookies::MemoryCookieStore;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    cookies: MemoryCookieStore,
}

impl UreqTransport {
    pub fn new(cookies: MemoryCookieStore) -> Self {
        // Status codes are data for the JSON step, not transport failures.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, cookies }
    }

    /// The jar this transport records response cookies into.
    pub fn cookies(&self) -> &MemoryCookieStore {
        &self.cookies
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("cookies", &self.cookies)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(MemoryCookieStore::new())
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let cookies = self.cookies.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, &cookies, request))
            .await
            .map_err(|e| TransportError::new(format!("transport task failed: {e}")))?
    }
}

fn execute_blocking(
    agent: &ureq::Agent,
    cookies: &MemoryCookieStore,
    req: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    let result = match req.method {
        HttpMethod::Get => {
            let mut builder = agent.get(req.url.as_str());
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Delete => {
            let mut builder = agent.delete(req.url.as_str());
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post | HttpMethod::Put => {
            let mut builder = if req.method == HttpMethod::Post {
                agent.post(req.url.as_str())
            } else {
                agent.put(req.url.as_str())
            };
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match &req.body {
                Some(body) => builder.send(&body[..]),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status().as_u16();
    let mut headers = Vec::new();
    for (name, value) in response.headers() {
        let Ok(value) = value.to_str() else {
            continue;
        };
        if name.as_str() == "set-cookie" {
            if let Some(cookie) = cookies.store_set_cookie_header(value) {
                debug!(cookie = %cookie, "stored response cookie");
            }
        }
        headers.push((name.as_str().to_string(), value.to_string()));
    }
    let body = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| TransportError::new(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
