use clap::Parser;
use secrecy::SecretString;
use std::num::{NonZeroU64, NonZeroUsize};
use std::time::Duration;
use crate::provider::replicate::{DEFAULT_BASE_URL, DEFAULT_MODEL};

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "image-gateway")]
#[command(about = "Caching relay for styled image generation")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    // Replicate API token, generation is refused without it
    #[arg(long, env = "REPLICATE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    // Replicate API base url
    #[arg(long, env = "REPLICATE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub provider_url: String,

    // Model in "owner/name" form
    #[arg(short, long, env = "REPLICATE_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    // "development" turns on debug logging
    #[arg(short, long, env = "APP_ENV", default_value = "production")]
    pub environment: String,

    // Max cached images, unbounded when unset
    #[arg(short, long, env = "CACHE_CAPACITY")]
    pub cache_capacity: Option<NonZeroUsize>,

    // How often to poll a prediction that is still running
    #[arg(long, default_value = "1000")]
    pub poll_interval_ms: NonZeroU64,
}

impl Args {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    // Empty values count as unset
    pub fn api_token(&self) -> Option<SecretString> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_string()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.get())
    }

    pub fn log_filter(&self) -> &'static str {
        if self.is_development() {
            "image_gateway=debug,tower_http=debug,info"
        } else {
            "info"
        }
    }
}
