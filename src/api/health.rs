use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn ping_database(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map(|_| ())
}

async fn query_jobs_table(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1 FROM jobs LIMIT 1")
        .fetch_optional(pool)
        .await
        .map(|_| ())
}

/// General health check including database connectivity
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match ping_database(pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy",
                database: "disconnected",
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Readiness: 503 until the job table can be queried
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match query_jobs_table(pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "ready",
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("Readiness check failed: database unavailable: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "not_ready",
                database: "disconnected",
                error: Some(format!("Database unavailable: {}", e)),
            })
        }
    }
}

/// Liveness: the process answers, dependencies are not checked
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        database: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
