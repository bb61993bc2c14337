use clap::Parser; // for cli
use std::sync::Arc;

use image_gateway::cache::MemoryStore;
use image_gateway::config::Args;
use image_gateway::provider::ReplicateProvider;
use image_gateway::state::AppState;
use image_gateway::{create_app, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap sees its values
    dotenv::dotenv().ok();
    let args = Args::parse();

    telemetry::init(args.log_filter());

    let api_token = args.api_token();
    if api_token.is_none() {
        tracing::warn!("REPLICATE_API_TOKEN is not set, /generate will answer 400");
        tracing::warn!("Create a token at https://replicate.com/account/api-tokens");
    }

    let provider = ReplicateProvider::new(
        reqwest::Client::new(),
        api_token,
        args.provider_url.clone(),
        args.model.clone(),
        args.poll_interval(),
    );

    // creating shared state
    let state = Arc::new(AppState::new(
        Arc::new(provider),
        Arc::new(MemoryStore::new(args.cache_capacity)),
    ));

    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Gateway running on http://localhost:{}", args.port);
    tracing::info!("Forwarding to {} ({})", args.provider_url, args.model);
    match args.cache_capacity {
        Some(capacity) => tracing::info!("Cache capacity: {} entries", capacity),
        None => tracing::info!("Cache capacity: unbounded"),
    }

    axum::serve(listener, app).await?;
    Ok(())
}
