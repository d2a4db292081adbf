use std::time::Duration;

use actix_web::{get, web, HttpResponse, Responder};
use humantime::format_duration;
use serde::Serialize;

use crate::{constants::START_TIME, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    started_at: String,
    database: &'static str,
    mail: &'static str,
    version: &'static str,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = chrono::Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let database = state.content_handler.store_status().await;
    let mail = state.mail_status();

    HttpResponse::Ok().json(HealthCheckResponse {
        status: if database == "OK" { "healthy" } else { "degraded" },
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        started_at: START_TIME.to_rfc3339(),
        database,
        mail,
        version: env!("CARGO_PKG_VERSION"),
    })
}
