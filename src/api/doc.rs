use utoipa::OpenApi;

pub const STUDENT_TAG: &str = "Students";
pub const SUBJECT_TAG: &str = "Subjects";
pub const TEACHER_TAG: &str = "Teachers";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "college-rs",
        description = "Academic records API: students, subjects, teachers and enrollments",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = STUDENT_TAG, description = "Student and enrollment endpoints"),
        (name = SUBJECT_TAG, description = "Subject catalog endpoints"),
        (name = TEACHER_TAG, description = "Teacher endpoints with generated registries"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
