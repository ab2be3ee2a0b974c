//! Health check and welcome handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    /// `None` when the service runs on the in-memory store
    pub db: Option<DatabaseConnection>,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub docs: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service banner", body = WelcomeResponse))
)]
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Coworking Management System API".to_string(),
        docs: "/docs".to_string(),
        version: "1.0.0".to_string(),
    })
}

async fn ping(db: &DatabaseConnection) -> ComponentHealth {
    let started = Instant::now();
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    match db.execute(stmt).await {
        Ok(_) => ComponentHealth {
            status: "ok".to_string(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            ComponentHealth {
                status: "error".to_string(),
                latency_ms: None,
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.db {
        Some(db) => ping(db).await,
        None => ComponentHealth {
            status: "in-memory".to_string(),
            latency_ms: None,
        },
    };

    let healthy = database.status != "error";
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_database;

    #[tokio::test]
    async fn reports_ok_with_live_database() {
        let db = test_database().await;
        let state = HealthState {
            db: Some(db),
            started_at: Arc::new(Instant::now()),
        };
        let (code, Json(body)) = health_check(State(state)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.database.status, "ok");
        assert!(body.database.latency_ms.is_some());
    }
}
