//! Service layer for business logic operations.
//!
//! Services validate input, enforce the entity rules and coordinate the
//! repositories. Handlers only talk to services.

pub mod registry;
mod student_service;
mod subject_service;
mod teacher_service;

pub use registry::RegistryGenerator;
pub use student_service::StudentService;
pub use subject_service::SubjectService;
pub use teacher_service::TeacherService;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Used as Axum application state; cloning only bumps reference counts.
#[derive(Clone)]
pub struct Services {
    pub students: StudentService,
    pub subjects: SubjectService,
    pub teachers: TeacherService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories, settings: &Settings) -> Self {
        Self {
            students: StudentService::new(
                repos.students,
                repos.subjects.clone(),
                settings.students.initial_subjects,
            ),
            subjects: SubjectService::new(repos.subjects),
            teachers: TeacherService::new(repos.teachers, settings.registry.max_attempts),
        }
    }
}

/// Rejects empty or whitespace-only required values.
pub(crate) fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, format!("{field} is required")));
    }
    Ok(())
}
