//! API Routes
//!
//! - `GET /` - plain-text welcome
//! - `GET /api/health` - liveness and store status
//! - `GET /api/jobs` - filtered job search
//! - `POST /api/submit-job` - recruiter submission
//! - `POST /api/contact` - support message

pub mod contact;
pub mod health;
pub mod jobs;

use axum::Router;
use crate::middleware::{compression_layer, cors_layer, trace_layer};
use crate::models::AppState;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(jobs::router(state.clone()))
        .merge(contact::router(state.clone()))
        .merge(health::router(state))
        .layer(compression_layer())
        .layer(cors)
        .layer(trace_layer())
}
