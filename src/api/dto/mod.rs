//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `student` - Student and enrollment DTOs
//! - `subject` - Subject DTOs
//! - `teacher` - Teacher DTOs
//! - `error` - Common error response DTOs
//! - `health` - Health check DTOs

mod error;
mod health;
mod student;
mod subject;
mod teacher;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use student::{CreateStudentRequest, StudentResponse, SubjectRefRequest, UpdateStudentRequest};
pub use subject::{CreateSubjectRequest, SubjectResponse, UpdateSubjectRequest};
pub use teacher::{CreateTeacherRequest, TeacherResponse, UpdateTeacherRequest};
