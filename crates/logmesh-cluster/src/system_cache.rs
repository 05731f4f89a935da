//! Lazily-filled cache of a node's `GET /system` overview.
//!
//! Empty → Populated only under the lock, so concurrent first reads issue
//! one fetch between them. Nothing expires; a `reload` swaps the payload
//! wholesale and is the only way to refresh it.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use logmesh_core::api::SystemOverview;
use logmesh_core::TransportError;

use crate::lookup::Lookup;

#[derive(Debug, Default)]
enum CacheState {
    #[default]
    Empty,
    Populated(Arc<SystemOverview>),
}

#[derive(Debug, Default)]
pub struct SystemInfoCache {
    state: Mutex<CacheState>,
}

impl SystemInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached overview, fetching it first if the cache is empty.
    ///
    /// A failed fetch is logged and leaves the cache empty.
    pub async fn get_or_load<F, Fut>(&self, fetch: F) -> Lookup<Arc<SystemOverview>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SystemOverview, TransportError>>,
    {
        let mut state = self.state.lock().await;
        if let CacheState::Populated(overview) = &*state {
            return Lookup::Ready(overview.clone());
        }
        match fetch().await {
            Ok(overview) => {
                let overview = Arc::new(overview);
                *state = CacheState::Populated(overview.clone());
                Lookup::Ready(overview)
            }
            Err(e) => {
                tracing::warn!(error = %e, "unable to load system information");
                Lookup::Degraded
            }
        }
    }

    /// Fetch unconditionally and replace the cached overview.
    ///
    /// On failure the previous overview, if any, stays in place.
    pub async fn reload<F, Fut>(&self, fetch: F) -> Lookup<Arc<SystemOverview>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SystemOverview, TransportError>>,
    {
        let mut state = self.state.lock().await;
        match fetch().await {
            Ok(overview) => {
                let overview = Arc::new(overview);
                *state = CacheState::Populated(overview.clone());
                Lookup::Ready(overview)
            }
            Err(e) => {
                tracing::warn!(error = %e, "unable to reload system information");
                Lookup::Degraded
            }
        }
    }

    /// Peek without fetching. `None` if empty or a fill is in progress.
    pub fn cached(&self) -> Option<Arc<SystemOverview>> {
        match &*self.state.try_lock().ok()? {
            CacheState::Populated(overview) => Some(overview.clone()),
            CacheState::Empty => None,
        }
    }
}
