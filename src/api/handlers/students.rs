//! Student and enrollment request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::STUDENT_TAG;
use crate::api::dto::{CreateStudentRequest, ErrorResponse, StudentResponse, UpdateStudentRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates student-related routes.
///
/// Routes:
/// - GET /students                                  - List students with their subjects
/// - POST /students                                 - Create a student
/// - GET /students/{id}                             - Get student by ID
/// - PUT /students/{id}                             - Update student fields
/// - DELETE /students/{id}                          - Delete student
/// - POST /students/{student_id}/subjects/{subject_id}   - Enroll in a subject
/// - DELETE /students/{student_id}/subjects/{subject_id} - Drop a subject
pub fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_students))
        .routes(routes!(create_student))
        .routes(routes!(get_student))
        .routes(routes!(update_student))
        .routes(routes!(delete_student))
        .routes(routes!(enroll_subject))
        .routes(routes!(unenroll_subject))
}

#[utoipa::path(
    get,
    path = "/students",
    tag = STUDENT_TAG,
    responses(
        (status = 200, description = "All students", body = Vec<StudentResponse>)
    )
)]
async fn list_students(State(state): State<AppState>) -> AppResult<Json<Vec<StudentResponse>>> {
    let students = state.services.students.list().await?;
    Ok(Json(
        students.into_iter().map(StudentResponse::from).collect(),
    ))
}

/// POST /students - Create student
///
/// Every subject listed in the body must already exist.
#[utoipa::path(
    post,
    path = "/students",
    tag = STUDENT_TAG,
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Referenced subject not found", body = ErrorResponse),
        (status = 409, description = "Enrollment number already in use", body = ErrorResponse)
    )
)]
async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStudentRequest>,
) -> AppResult<(StatusCode, Json<StudentResponse>)> {
    let student = state
        .services
        .students
        .create(payload.into_new_student())
        .await?;
    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = STUDENT_TAG,
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StudentResponse>> {
    let student = state.services.students.get(&id).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// PUT /students/{id} - Update student
///
/// Replaces enrollment, name and current year. Enrolled subjects are untouched.
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = STUDENT_TAG,
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Enrollment number already in use", body = ErrorResponse)
    )
)]
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStudentRequest>,
) -> AppResult<Json<StudentResponse>> {
    let student = state
        .services
        .students
        .update(&id, payload.into_update_student())
        .await?;
    Ok(Json(StudentResponse::from(student)))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = STUDENT_TAG,
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.students.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /students/{student_id}/subjects/{subject_id} - Enroll
///
/// Returns the student with the updated subject list.
#[utoipa::path(
    post,
    path = "/students/{student_id}/subjects/{subject_id}",
    tag = STUDENT_TAG,
    params(
        ("student_id" = String, Path, description = "Student ID"),
        ("subject_id" = String, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Student enrolled", body = StudentResponse),
        (status = 404, description = "Student or subject not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    )
)]
async fn enroll_subject(
    State(state): State<AppState>,
    Path((student_id, subject_id)): Path<(String, String)>,
) -> AppResult<Json<StudentResponse>> {
    let student = state
        .services
        .students
        .enroll(&student_id, &subject_id)
        .await?;
    Ok(Json(StudentResponse::from(student)))
}

#[utoipa::path(
    delete,
    path = "/students/{student_id}/subjects/{subject_id}",
    tag = STUDENT_TAG,
    params(
        ("student_id" = String, Path, description = "Student ID"),
        ("subject_id" = String, Path, description = "Subject ID")
    ),
    responses(
        (status = 204, description = "Subject dropped"),
        (status = 404, description = "Student not found or not enrolled", body = ErrorResponse)
    )
)]
async fn unenroll_subject(
    State(state): State<AppState>,
    Path((student_id, subject_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .services
        .students
        .unenroll(&student_id, &subject_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
