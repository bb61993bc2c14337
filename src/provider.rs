pub mod replicate;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use replicate::ReplicateProvider;

pub const IMAGE_DIMENSIONS: &str = "512x512";
pub const NUM_INFERENCE_STEPS: u32 = 25;
pub const GUIDANCE_SCALE: f64 = 7.5;

// Input sent to the image model, only the prompt varies
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub image_dimensions: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
}

impl ImageRequest {
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            image_dimensions: IMAGE_DIMENSIONS.to_string(),
            num_inference_steps: NUM_INFERENCE_STEPS,
            guidance_scale: GUIDANCE_SCALE,
        }
    }
}

// Model output: one URL or a list
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ProviderOutput {
    Single(String),
    Many(Vec<String>),
}

impl ProviderOutput {
    // First URL, or None when the output is empty
    pub fn into_first_url(self) -> Option<String> {
        let url = match self {
            ProviderOutput::Single(url) => Some(url),
            ProviderOutput::Many(urls) => urls.into_iter().next(),
        };
        url.filter(|u| !u.is_empty())
    }
}

// Image generation backend
#[async_trait]
pub trait ImageProvider: Send + Sync {
    // Ok(None) means the provider returned no output
    async fn generate(&self, request: &ImageRequest) -> Result<Option<ProviderOutput>>;

    fn is_configured(&self) -> bool;

    fn name(&self) -> &str;
}
