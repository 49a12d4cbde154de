//! Teacher CRUD request handlers.
//!
//! Registries are assigned by the server on creation and never change.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::TEACHER_TAG;
use crate::api::dto::{CreateTeacherRequest, ErrorResponse, TeacherResponse, UpdateTeacherRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn teacher_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_teachers))
        .routes(routes!(create_teacher))
        .routes(routes!(get_teacher))
        .routes(routes!(update_teacher))
        .routes(routes!(delete_teacher))
}

#[utoipa::path(
    get,
    path = "/teachers",
    tag = TEACHER_TAG,
    responses(
        (status = 200, description = "All teachers", body = Vec<TeacherResponse>)
    )
)]
async fn list_teachers(State(state): State<AppState>) -> AppResult<Json<Vec<TeacherResponse>>> {
    let teachers = state.services.teachers.list().await?;
    Ok(Json(
        teachers.into_iter().map(TeacherResponse::from).collect(),
    ))
}

/// POST /teachers - Create teacher
///
/// The registry is derived from the department, e.g. "Computer Science" → `COMP-001`.
#[utoipa::path(
    post,
    path = "/teachers",
    tag = TEACHER_TAG,
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = TeacherResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Registry could not be allocated", body = ErrorResponse)
    )
)]
async fn create_teacher(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTeacherRequest>,
) -> AppResult<(StatusCode, Json<TeacherResponse>)> {
    let teacher = state
        .services
        .teachers
        .create(payload.into_new_teacher())
        .await?;
    Ok((StatusCode::CREATED, Json(TeacherResponse::from(teacher))))
}

#[utoipa::path(
    get,
    path = "/teachers/{id}",
    tag = TEACHER_TAG,
    params(
        ("id" = String, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher found", body = TeacherResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    )
)]
async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TeacherResponse>> {
    let teacher = state.services.teachers.get(&id).await?;
    Ok(Json(TeacherResponse::from(teacher)))
}

#[utoipa::path(
    put,
    path = "/teachers/{id}",
    tag = TEACHER_TAG,
    params(
        ("id" = String, Path, description = "Teacher ID")
    ),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    )
)]
async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTeacherRequest>,
) -> AppResult<Json<TeacherResponse>> {
    let teacher = state
        .services
        .teachers
        .update(&id, payload.into_update_teacher())
        .await?;
    Ok(Json(TeacherResponse::from(teacher)))
}

#[utoipa::path(
    delete,
    path = "/teachers/{id}",
    tag = TEACHER_TAG,
    params(
        ("id" = String, Path, description = "Teacher ID")
    ),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    )
)]
async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.teachers.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
