//! Cookie lookup used by DELETE requests.
//!
//! # Design
//! The helper only ever reads cookies by name; writing them is the job of
//! whatever receives responses. `MemoryCookieStore` is a shared, cloneable jar:
//! `UreqTransport` feeds it from `Set-Cookie` headers and the FFI lets a host
//! mirror its platform cookie storage into it. Domains, paths and expiry are
//! not tracked, the jar keeps the latest value seen per name.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub trait CookieStore: Send + Sync {
    /// Current value of the cookie called `name`, if any.
    fn cookie(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCookieStore {
    cookies: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut cookies) = self.cookies.write() {
            cookies.insert(name.into(), value.into());
        }
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.cookies.write().ok()?.remove(name)
    }

    /// Record the cookie carried by one `Set-Cookie` header value.
    ///
    /// Attributes after the first `;` are ignored. Returns the cookie name, or
    /// `None` when the header has no `name=value` pair.
    pub fn store_set_cookie_header(&self, header: &str) -> Option<String> {
        let pair = header.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.set(name, value.trim().trim_matches('"'));
        Some(name.to_string())
    }
}

impl CookieStore for MemoryCookieStore {
    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.read().ok()?.get(name).cloned()
    }
}
