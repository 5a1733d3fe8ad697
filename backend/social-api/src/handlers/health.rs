/// Health check endpoints
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    checks: Vec<ComponentCheck>,
    timestamp: String,
}

#[derive(Serialize)]
struct ComponentCheck {
    component: String,
    healthy: bool,
    message: String,
    latency_ms: u64,
}

async fn check_postgres(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map(|_| ())
}

/// Basic health summary
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match check_postgres(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "social-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "social-api"
        })),
    }
}

/// Readiness: the service can reach its store
pub async fn readiness_check(pool: web::Data<PgPool>) -> HttpResponse {
    let start = Instant::now();
    let result = check_postgres(pool.get_ref()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (ready, message) = match result {
        Ok(_) => (true, "PostgreSQL connection successful".to_string()),
        Err(e) => (false, format!("PostgreSQL connection failed: {}", e)),
    };

    let response = ReadinessResponse {
        ready,
        checks: vec![ComponentCheck {
            component: "postgresql".to_string(),
            healthy: ready,
            message,
            latency_ms,
        }],
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Liveness: the process is responsive
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
