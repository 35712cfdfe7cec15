//! HTTP API
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | task form |
//! | `POST /print` | print from the form, answers with HTML |
//! | `POST /api/print` | print from JSON |
//! | `GET /health` | printer status |

pub mod error;
pub mod health;
pub mod pages;
pub mod print;

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::core::ServerState;

pub use error::{ApiError, ApiResult};
pub use print::TaskInput;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/print", post(print::print_form))
        .route("/api/print", post(print::print_json))
        .route("/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
