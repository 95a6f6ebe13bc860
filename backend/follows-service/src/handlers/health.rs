use super::SharedRepository;
use actix_web::{web, HttpResponse, Responder};
use tracing::warn;

pub async fn health() -> impl Responder {
    "OK"
}

/// Ready only while Neo4j answers the connectivity probe
pub async fn ready(repo: web::Data<SharedRepository>) -> HttpResponse {
    match repo.health_check().await {
        Ok(()) => HttpResponse::Ok().body("READY"),
        Err(e) => {
            warn!(error = %e, "Readiness probe failed");
            HttpResponse::ServiceUnavailable().body(format!("NOT READY: {}", e))
        }
    }
}
