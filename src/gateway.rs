// Request handling independent of HTTP

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::make_cache_key;
use crate::error::{GatewayError, Result};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE, GENERATION_ERRORS};
use crate::models::{ClearCacheResponse, GenerateRequest, GenerateResponse, HealthResponse};
use crate::provider::ImageRequest;
use crate::state::AppState;
use crate::styles::{DEFAULT_STYLE, Style, compose_prompt, truncate_for_log};

const LOG_PROMPT_CHARS: usize = 80;

// Removes a key's in-flight lock once nobody holds it, also when the request
// future is dropped mid-await. Must be bound before the lock it hands out.
struct InflightSlot<'a> {
    map: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
}

impl<'a> InflightSlot<'a> {
    fn new(map: &'a DashMap<String, Arc<Mutex<()>>>, key: &str) -> Self {
        Self {
            map,
            key: key.to_string(),
        }
    }

    fn lock(&self) -> Arc<Mutex<()>> {
        Arc::clone(self.map.entry(self.key.clone()).or_default().value())
    }
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        self.map
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl AppState {
    // Missing credential fails before the cache or network is touched.
    // At most one provider call runs per key.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        if !self.provider.is_configured() {
            return Err(GatewayError::Configuration(
                "REPLICATE_API_TOKEN is not set. Add it to your .env file".to_string(),
            ));
        }

        let style = request.style.unwrap_or_else(|| DEFAULT_STYLE.to_string());
        let user_prompt = request.prompt.unwrap_or_default();
        let key = make_cache_key(&style, &user_prompt);

        if let Some(url) = self.cached(&key) {
            return Ok(GenerateResponse { url, cached: true, style });
        }

        let slot = InflightSlot::new(&self.inflight, &key);
        let lock = slot.lock();
        let _guard = lock.lock().await;

        // someone else may have filled it while we waited
        match self.cached(&key) {
            Some(url) => Ok(GenerateResponse { url, cached: true, style }),
            None => {
                CACHE_MISSES.inc();
                self.generate_uncached(key, style, &user_prompt).await
            }
        }
    }

    fn cached(&self, key: &str) -> Option<String> {
        let url = self.cache.get(key)?;
        CACHE_HITS.inc();
        tracing::debug!(key = %key, "cache hit");
        Some(url)
    }

    async fn generate_uncached(
        &self,
        key: String,
        style: String,
        user_prompt: &str,
    ) -> Result<GenerateResponse> {
        let full_prompt = compose_prompt(Style::from_param(&style), user_prompt);
        tracing::info!(
            "Generating image: {}...",
            truncate_for_log(&full_prompt, LOG_PROMPT_CHARS)
        );

        let output = self
            .provider
            .generate(&ImageRequest::new(full_prompt))
            .await
            .inspect_err(|e| {
                GENERATION_ERRORS.inc();
                tracing::error!(provider = %self.provider.name(), error = %e, "generation failed");
            })?;

        let Some(url) = output.and_then(|o| o.into_first_url()) else {
            GENERATION_ERRORS.inc();
            tracing::error!(provider = %self.provider.name(), "provider returned no image");
            return Err(GatewayError::EmptyOutput);
        };

        self.cache.insert(key, url.clone());
        CACHE_SIZE.set(self.cache.len() as f64);

        Ok(GenerateResponse { url, cached: false, style })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            api_configured: self.provider.is_configured(),
            cache_size: self.cache.len(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn clear_cache(&self) -> ClearCacheResponse {
        let removed = self.cache.clear();
        CACHE_SIZE.set(self.cache.len() as f64);
        tracing::info!(removed, "cache cleared");

        ClearCacheResponse {
            message: format!("Cache cleared ({} entries removed)", removed),
        }
    }
}
