use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;
use std::time::Instant;
use crate::error::GatewayError;
use crate::state::AppState;
use crate::models::{GenerateRequest, GenerateResponse};
use crate::metrics::{REQUEST_TOTAL, REQUEST_LATENCY};

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, GatewayError> {
    REQUEST_TOTAL.inc();

    // malformed bodies answer like any other failure
    let Json(payload) = payload.map_err(|rejection| {
        tracing::error!(error = %rejection, "rejected generate body");
        GatewayError::InvalidBody(rejection.body_text())
    })?;

    let start_time = Instant::now();

    let result = state.generate(payload).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    result.map(Json)
}
