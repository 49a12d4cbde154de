//! Subject CRUD request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::SUBJECT_TAG;
use crate::api::dto::{CreateSubjectRequest, ErrorResponse, SubjectResponse, UpdateSubjectRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn subject_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_subjects))
        .routes(routes!(create_subject))
        .routes(routes!(get_subject))
        .routes(routes!(update_subject))
        .routes(routes!(delete_subject))
}

#[utoipa::path(
    get,
    path = "/subjects",
    tag = SUBJECT_TAG,
    responses(
        (status = 200, description = "All subjects", body = Vec<SubjectResponse>)
    )
)]
async fn list_subjects(State(state): State<AppState>) -> AppResult<Json<Vec<SubjectResponse>>> {
    let subjects = state.services.subjects.list().await?;
    Ok(Json(
        subjects.into_iter().map(SubjectResponse::from).collect(),
    ))
}

/// POST /subjects - Create subject
///
/// Uses the `id` from the body when given, otherwise assigns a UUID.
#[utoipa::path(
    post,
    path = "/subjects",
    tag = SUBJECT_TAG,
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Subject id already in use", body = ErrorResponse)
    )
)]
async fn create_subject(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSubjectRequest>,
) -> AppResult<(StatusCode, Json<SubjectResponse>)> {
    let subject = state
        .services
        .subjects
        .create(payload.into_new_subject())
        .await?;
    Ok((StatusCode::CREATED, Json(SubjectResponse::from(subject))))
}

#[utoipa::path(
    get,
    path = "/subjects/{id}",
    tag = SUBJECT_TAG,
    params(
        ("id" = String, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Subject found", body = SubjectResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubjectResponse>> {
    let subject = state.services.subjects.get(&id).await?;
    Ok(Json(SubjectResponse::from(subject)))
}

#[utoipa::path(
    put,
    path = "/subjects/{id}",
    tag = SUBJECT_TAG,
    params(
        ("id" = String, Path, description = "Subject ID")
    ),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateSubjectRequest>,
) -> AppResult<Json<SubjectResponse>> {
    let subject = state
        .services
        .subjects
        .update(&id, payload.into_update_subject())
        .await?;
    Ok(Json(SubjectResponse::from(subject)))
}

/// DELETE /subjects/{id} - Delete subject
///
/// Enrollments in the subject are removed with it.
#[utoipa::path(
    delete,
    path = "/subjects/{id}",
    tag = SUBJECT_TAG,
    params(
        ("id" = String, Path, description = "Subject ID")
    ),
    responses(
        (status = 204, description = "Subject deleted"),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    )
)]
async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.subjects.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
