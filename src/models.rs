use serde::{Deserialize, Serialize};

// POST /generate body, both fields optional
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct GenerateRequest {
    pub style: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct GenerateResponse {
    pub url: String,
    pub cached: bool,
    pub style: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub api_configured: bool,
    pub cache_size: usize,
    pub timestamp: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ClearCacheResponse {
    pub message: String,
}
