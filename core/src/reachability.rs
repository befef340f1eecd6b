//! Network reachability probe consulted before every request.
//!
//! The platform owns the real reachability machinery. `NetworkStatus` is the
//! handle a host keeps and flips from its reachability callbacks; closures
//! work too for tests and ad-hoc probes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;
}

impl<F> Connectivity for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_connected(&self) -> bool {
        self()
    }
}

/// Shared online/offline flag. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct NetworkStatus {
    online: Arc<AtomicBool>,
}

impl NetworkStatus {
    pub fn online() -> Self {
        Self::with_state(true)
    }

    pub fn offline() -> Self {
        Self::with_state(false)
    }

    fn with_state(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::online()
    }
}

impl Connectivity for NetworkStatus {
    fn is_connected(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}
