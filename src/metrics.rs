use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("image_gateway_requests_total", "Total number of generate requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("image_gateway_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("image_gateway_cache_misses_total", "Total cache misses").unwrap();
    pub static ref GENERATION_ERRORS: Counter = register_counter!(
        "image_gateway_generation_errors_total",
        "Provider calls that failed or returned no image"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "image_gateway_request_latency_seconds",
        "Generate request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("image_gateway_cache_size", "Current number of items in cache").unwrap();
}
