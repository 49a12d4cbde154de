//! Subject service. Subjects carry no field rules of their own.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewSubject, Subject, UpdateSubject};
use crate::repositories::SubjectRepository;
use crate::services::require;

#[derive(Clone)]
pub struct SubjectService {
    repo: Arc<dyn SubjectRepository>,
}

impl SubjectService {
    pub fn new(repo: Arc<dyn SubjectRepository>) -> Self {
        Self { repo }
    }

    /// Creates a subject, keeping a caller-supplied id when it is not blank.
    pub async fn create(&self, new_subject: NewSubject) -> AppResult<Subject> {
        let id = new_subject
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let created = self
            .repo
            .insert(Subject {
                id,
                name: new_subject.name,
                year: new_subject.year,
                credits: new_subject.credits,
            })
            .await?;

        tracing::info!(subject_id = %created.id, "Subject created");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> AppResult<Subject> {
        require("id", id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("subject", "id", id))
    }

    pub async fn list(&self) -> AppResult<Vec<Subject>> {
        self.repo.list_all().await
    }

    pub async fn update(&self, id: &str, changes: UpdateSubject) -> AppResult<Subject> {
        require("id", id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_for("update", "subject", "id", id))?;

        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found_for("update", "subject", "id", id))
    }

    /// Deletes the subject; enrollment links referencing it go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        require("id", id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_for("deletion", "subject", "id", id))?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found_for("deletion", "subject", "id", id));
        }
        tracing::info!(subject_id = %id, "Subject deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;

    fn service() -> SubjectService {
        SubjectService::new(Arc::new(InMemoryStore::new()))
    }

    fn algorithms(id: Option<&str>) -> NewSubject {
        NewSubject {
            id: id.map(str::to_string),
            name: "Algorithms".to_string(),
            year: 2,
            credits: 4,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_uuid_when_id_missing() {
        let service = service();

        let generated = service.create(algorithms(None)).await.unwrap();
        assert!(Uuid::parse_str(&generated.id).is_ok());

        let blank = service.create(algorithms(Some("  "))).await.unwrap();
        assert!(Uuid::parse_str(&blank.id).is_ok());
    }

    #[tokio::test]
    async fn test_create_keeps_caller_id() {
        let service = service();
        let created = service.create(algorithms(Some("ALG-2"))).await.unwrap();
        assert_eq!(created.id, "ALG-2");

        let err = service.create(algorithms(Some("ALG-2"))).await.unwrap_err();
        assert!(err.is_duplicate_of("id"));
    }

    #[tokio::test]
    async fn test_no_field_validation() {
        let service = service();
        let created = service
            .create(NewSubject {
                id: None,
                name: String::new(),
                year: 0,
                credits: 0,
            })
            .await
            .unwrap();
        assert_eq!(created.name, "");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service();
        let created = service.create(algorithms(None)).await.unwrap();

        let updated = service
            .update(
                &created.id,
                UpdateSubject {
                    name: "Advanced Algorithms".to_string(),
                    year: 3,
                    credits: 6,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Advanced Algorithms");
        assert_eq!(updated.credits, 6);

        service.delete(&created.id).await.unwrap();
        let err = service.delete(&created.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("subject not found for deletion: id={}", created.id)
        );

        let err = service
            .update(&created.id, UpdateSubject::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_id_is_invalid() {
        let service = service();
        assert!(matches!(
            service.get("").await,
            Err(AppError::Validation { .. })
        ));
    }
}
