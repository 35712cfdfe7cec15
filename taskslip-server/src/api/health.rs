//! Health check endpoint

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::core::ServerState;

/// GET /health
///
/// `ok` while the printer answers, `degraded` otherwise.
pub async fn health_check(State(state): State<ServerState>) -> Json<Value> {
    let connection = state.manager.state();

    let (online, printer) = match state.printer() {
        Ok(handle) => {
            let online = handle.is_online().await;
            let profile = handle.profile();
            (
                online,
                json!({
                    "state": connection,
                    "online": online,
                    "busy": handle.is_busy(),
                    "profile": profile.name,
                    "columns": profile.columns,
                }),
            )
        }
        Err(_) => (
            false,
            json!({
                "state": connection,
                "online": false,
                "busy": false,
                "profile": null,
                "columns": null,
            }),
        ),
    };

    let status = if online { "ok" } else { "degraded" };
    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "printer": printer,
    }))
}
