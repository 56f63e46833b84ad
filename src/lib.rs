// Jobsy - job board API and filtered search client

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod search;    // Query building, SQL rendering and result normalization
pub mod routes;
pub mod middleware;
pub mod client;    // Filter state, debounced query encoding, listing fetcher
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
