use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use crate::cache::ImageStore;
use crate::provider::ImageProvider;

// app's shared state
pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
    pub cache: Arc<dyn ImageStore>,
    // one lock per cache key with a provider call in flight
    pub inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ImageProvider>, cache: Arc<dyn ImageStore>) -> Self {
        Self {
            provider,
            cache,
            inflight: DashMap::new(),
        }
    }
}
