#![allow(dead_code)]

use async_trait::async_trait;
use image_gateway::cache::MemoryStore;
use image_gateway::error::{GatewayError, Result};
use image_gateway::provider::{ImageProvider, ImageRequest, ProviderOutput};
use image_gateway::state::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// What the stub answers with
#[derive(Clone)]
pub enum StubReply {
    Url(String),
    List(Vec<String>),
    Empty,
    Fail(String),
}

// Counts calls and records prompts instead of going out
pub struct StubProvider {
    configured: bool,
    reply: Mutex<StubReply>,
    delay: Duration,
    calls: AtomicUsize,
    failures_left: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(reply: StubReply) -> Self {
        Self {
            configured: true,
            reply: Mutex::new(reply),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new(StubReply::Url("https://img/unused.png".into()))
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    // the first `n` calls fail before the normal reply kicks in
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn set_reply(&self, reply: StubReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    // most calls seen running at the same time
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for StubProvider {
    async fn generate(&self, request: &ImageRequest) -> Result<Option<ProviderOutput>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(running, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(GatewayError::Generation("stub failure".into()));
        }

        let reply = self.reply.lock().unwrap().clone();
        match reply {
            StubReply::Url(url) => Ok(Some(ProviderOutput::Single(url))),
            StubReply::List(urls) => Ok(Some(ProviderOutput::Many(urls))),
            StubReply::Empty => Ok(None),
            StubReply::Fail(msg) => Err(GatewayError::Generation(msg)),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn name(&self) -> &str {
        "stub"
    }
}

// Helper: state over a stub and an unbounded memory store
pub fn state_with(provider: Arc<StubProvider>) -> Arc<AppState> {
    Arc::new(AppState::new(provider, Arc::new(MemoryStore::unbounded())))
}
