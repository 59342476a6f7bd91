use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::{
        project::{NewProject, ProjectPatch},
        response::{ApiResponse, Empty},
    },
    errors::AppError,
    use_cases::extractors::{AdminAccess, Validated},
    AppState,
};

#[instrument(skip(state))]
pub async fn list_projects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.project_handler.list_projects().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(projects)))
}

#[instrument(skip(state))]
pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.get_project_by_id(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(project)))
}

#[instrument(skip_all)]
pub async fn create_project(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    body: Validated<NewProject>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.create_project(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::data(project)))
}

#[instrument(skip(_admin, state, body))]
pub async fn update_project(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Validated<ProjectPatch>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler
        .update_project(&path, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(project)))
}

#[instrument(skip(_admin, state))]
pub async fn delete_project(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.project_handler.delete_project(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(Empty::default())))
}
