use axum::{Json, extract::State};
use std::sync::Arc;
use crate::models::ClearCacheResponse;
use crate::state::AppState;

pub async fn clear_cache_handler(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    Json(state.clear_cache())
}
