use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "blog-service")]
    pub service: String,
    pub version: String,
}

/// Liveness plus a storage round trip; 503 when storage is unreachable
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Storage unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let storage_ok = match state.users.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check storage ping failed");
            false
        }
    };

    let body = HealthResponse {
        status: if storage_ok { "ok" } else { "unavailable" }.to_string(),
        service: "blog-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if storage_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
