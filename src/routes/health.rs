use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

/// Health check endpoint
///
/// Reports whether the database answers a trivial query. Served outside the
/// authenticated `/api` scope.
#[get("/health")]
pub async fn health(pool: Option<web::Data<PgPool>>) -> impl Responder {
    let database = match pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
            Ok(_) => "up",
            Err(e) => {
                log::error!("health check query failed: {}", e);
                "down"
            }
        },
        None => "unconfigured",
    };

    let body = json!({
        "status": if database == "down" { "degraded" } else { "ok" },
        "database": database,
        "timestamp": Utc::now()
    });

    if database == "down" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
