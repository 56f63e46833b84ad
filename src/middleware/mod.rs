// Middleware: CORS, response compression and request tracing

pub mod cors;

pub use cors::*;

use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};

pub fn compression_layer() -> CompressionLayer {
    CompressionLayer::new().gzip(true)
}

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
