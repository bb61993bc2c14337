mod cache;
mod generate;
mod health;
mod metrics;

pub use cache::clear_cache_handler;
pub use generate::generate_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
