use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    constants::messages,
    entities::{
        contact::NewContactMessage,
        response::{ApiResponse, Empty},
    },
    errors::AppError,
    use_cases::extractors::{AdminAccess, Validated},
    AppState,
};

/// Public contact form endpoint
#[instrument(skip_all)]
pub async fn create_contact_message(
    state: web::Data<AppState>,
    form: Validated<NewContactMessage>,
) -> Result<HttpResponse, AppError> {
    let message = state.contact_handler
        .create_contact_message(form.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(
        ApiResponse::data(message).with_message(messages::CONTACT_RECEIVED)
    ))
}

#[instrument(skip_all)]
pub async fn list_contact_messages(
    _admin: AdminAccess,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let messages = state.contact_handler.list_contact_messages().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(messages)))
}

#[instrument(skip(_admin, state))]
pub async fn get_contact_message(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let message = state.contact_handler.get_contact_message_by_id(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(message)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_contact_message(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.contact_handler.delete_contact_message(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(Empty::default())))
}
