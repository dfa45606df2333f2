use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::clock::BusinessCalendar;
use crate::AppState;

/// Health check endpoint
///
/// Reports store connectivity and the current business calendar day, so
/// operators can verify the day-boundary configuration at a glance.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.clone();
    let db_status = tokio::task::spawn_blocking(move || match db.begin_read() {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            "disconnected"
        }
    })
    .await
    .unwrap_or("error");

    let calendar =
        BusinessCalendar::from_utc_offset_hours(state.config.day_boundary_utc_offset_hours);

    Json(json!({
        "status": if db_status == "connected" { "healthy" } else { "unhealthy" },
        "database": db_status,
        "businessDay": calendar.day_key(Utc::now()),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
