//! `GET /health`: readiness of the database and the mail transport.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::health::{HealthChecks, HealthResponse, OverallStatus, Probe};
use crate::state::AppState;

/// Runs both probes and answers `200` when they pass, `503` otherwise.
/// The body has the same shape either way:
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 42 users" },
///     "mail": { "status": "ok", "message": "Mail transport reachable" }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let checks = HealthChecks {
        database: probe_database(&state).await,
        mail: probe_mail(&state).await,
    };
    let status = checks.overall();

    let code = match status {
        OverallStatus::Healthy => StatusCode::OK,
        OverallStatus::Degraded => {
            tracing::warn!(?checks, "Health check degraded");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks,
    };
    (code, Json(body)).into_response()
}

async fn probe_database(state: &AppState) -> Probe {
    match state.user_service.total_users().await {
        Ok(users) => Probe::passed(format!("Connected, {users} users")),
        Err(e) => Probe::failed(format!("Database error: {e}")),
    }
}

async fn probe_mail(state: &AppState) -> Probe {
    if state.notifier.health_check().await {
        Probe::passed("Mail transport reachable")
    } else {
        Probe::failed("Mail transport unreachable")
    }
}
