use actix_web::{post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::contact::ContactForm, errors::AppError, AppState};

#[post("/contact")]
#[instrument(skip(state, form))]
pub async fn submit_contact(
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    let receipt = state.contact_handler
        .submit(form.into_inner())
        .await?;

    if receipt.is_stored() {
        Ok(HttpResponse::Created().json(receipt))
    } else {
        Ok(HttpResponse::Ok().json(receipt))
    }
}
