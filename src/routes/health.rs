use axum::{Router, routing::get, Json, extract::State};
use tracing::warn;

use crate::models::{AppState, HealthResponse};

pub const WELCOME: &str = "Welcome to the Job Board API";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn welcome() -> &'static str {
    WELCOME
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.store.ping().await {
        Ok(backend) => backend.to_string(),
        Err(e) => {
            warn!("Health check could not reach the store: {}", e);
            "unavailable".to_string()
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
    })
}
