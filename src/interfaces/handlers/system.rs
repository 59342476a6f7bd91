use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;

use crate::{constants::{messages, START_TIME}, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthCheckResponse {
    success: bool,
    status: &'static str,
    uptime: String,
    started_at: String,
    timestamp: String,
    database: &'static str,
    version: &'static str,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let (status, database) = match state.project_handler.project_repo.check_connection().await {
        Ok(()) => ("healthy", "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            ("degraded", "Unavailable")
        }
    };

    HttpResponse::Ok().json(HealthCheckResponse {
        success: true,
        status,
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        started_at: START_TIME.to_rfc3339(),
        timestamp: now_utc.to_rfc3339(),
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Default service for paths no route claims.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": messages::ROUTE_NOT_FOUND,
    }))
}
