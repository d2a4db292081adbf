use actix_web::{get, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, AppState};

#[get("/projects")]
#[instrument(skip(state))]
pub async fn list_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.content_handler.list_projects().await?;

    Ok(HttpResponse::Ok().json(projects))
}

#[get("/skills")]
#[instrument(skip(state))]
pub async fn list_skills(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let skills = state.content_handler.list_skills().await?;

    Ok(HttpResponse::Ok().json(skills))
}
