//! Teacher service.
//!
//! Creation derives the registry from the department once; updates never
//! touch it.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewTeacher, Teacher, UpdateTeacher};
use crate::repositories::TeacherRepository;
use crate::services::registry::RegistryGenerator;
use crate::services::require;

#[derive(Clone)]
pub struct TeacherService {
    repo: Arc<dyn TeacherRepository>,
    registry: RegistryGenerator,
    max_attempts: u32,
}

impl TeacherService {
    /// # Arguments
    /// * `repo` - Teacher persistence
    /// * `max_attempts` - Generate-and-insert attempts before a registry conflict is returned
    pub fn new(repo: Arc<dyn TeacherRepository>, max_attempts: u32) -> Self {
        Self {
            registry: RegistryGenerator::new(repo.clone()),
            repo,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates a teacher with a freshly generated registry.
    ///
    /// A registry conflict from a concurrent insert is retried with a new
    /// registry until `max_attempts` is reached.
    pub async fn create(&self, new_teacher: NewTeacher) -> AppResult<Teacher> {
        validate_fields(&new_teacher.name, &new_teacher.department)?;

        let mut attempt = 1;
        loop {
            let teacher = Teacher {
                id: Uuid::new_v4().to_string(),
                registry: self.registry.generate(&new_teacher.department).await?,
                name: new_teacher.name.clone(),
                department: new_teacher.department.clone(),
            };

            match self.repo.insert(teacher).await {
                Ok(created) => {
                    tracing::info!(
                        teacher_id = %created.id,
                        registry = %created.registry,
                        "Teacher created"
                    );
                    return Ok(created);
                }
                Err(err) if err.is_duplicate_of("registry") && attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Registry already taken, regenerating"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<Teacher> {
        require("id", id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("teacher", "id", id))
    }

    pub async fn list(&self) -> AppResult<Vec<Teacher>> {
        self.repo.list_all().await
    }

    /// Updates name and department. The stored registry is kept as is.
    pub async fn update(&self, id: &str, changes: UpdateTeacher) -> AppResult<Teacher> {
        require("id", id)?;
        validate_fields(&changes.name, &changes.department)?;

        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_for("update", "teacher", "id", id))?;

        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found_for("update", "teacher", "id", id))
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        require("id", id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_for("deletion", "teacher", "id", id))?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found_for("deletion", "teacher", "id", id));
        }
        tracing::info!(teacher_id = %id, "Teacher deleted");
        Ok(())
    }
}

fn validate_fields(name: &str, department: &str) -> AppResult<()> {
    require("name", name)?;
    require("department", department)
}
