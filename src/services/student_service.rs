//! Student service and enrollment manager.
//!
//! Validates student fields and subject references, and keeps the
//! student-subject relation free of duplicates with precise errors.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::InitialSubjectPolicy;
use crate::error::{AppError, AppResult};
use crate::models::{NewStudent, Student, StudentRecord, UpdateStudent};
use crate::repositories::{StudentRepository, SubjectRepository};
use crate::services::require;

#[derive(Clone)]
pub struct StudentService {
    students: Arc<dyn StudentRepository>,
    subjects: Arc<dyn SubjectRepository>,
    initial_subjects: InitialSubjectPolicy,
}

impl StudentService {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        subjects: Arc<dyn SubjectRepository>,
        initial_subjects: InitialSubjectPolicy,
    ) -> Self {
        Self {
            students,
            subjects,
            initial_subjects,
        }
    }

    /// Creates a student and links the referenced subjects.
    ///
    /// Every reference must resolve before anything is written. How link
    /// failures after that point are handled depends on the configured
    /// [`InitialSubjectPolicy`].
    pub async fn create(&self, new_student: NewStudent) -> AppResult<Student> {
        validate_fields(
            &new_student.enrollment,
            &new_student.name,
            new_student.current_year,
        )?;
        let subject_ids = self.resolve_subjects(&new_student.subject_ids).await?;

        let record = StudentRecord {
            id: Uuid::new_v4().to_string(),
            enrollment: new_student.enrollment,
            name: new_student.name,
            current_year: new_student.current_year,
        };

        let created = match self.initial_subjects {
            InitialSubjectPolicy::Atomic => {
                self.students
                    .insert_with_subjects(record, &subject_ids)
                    .await?
            }
            InitialSubjectPolicy::BestEffort => {
                let created = self.students.insert(record).await?;
                for subject_id in &subject_ids {
                    if let Err(err) = self.students.add_subject(&created.id, subject_id).await {
                        tracing::warn!(
                            student_id = %created.id,
                            subject_id = %subject_id,
                            error = %err,
                            "Failed to link initial subject, continuing"
                        );
                    }
                }
                created
            }
        };

        tracing::info!(
            student_id = %created.id,
            subjects = subject_ids.len(),
            "Student created"
        );
        self.reload(&created.id).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Student> {
        require("id", id)?;
        self.reload(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Student>> {
        self.students.list_all().await
    }

    /// Updates scalar fields. The subject set is only changed through
    /// [`enroll`](Self::enroll) and [`unenroll`](Self::unenroll).
    pub async fn update(&self, id: &str, changes: UpdateStudent) -> AppResult<Student> {
        require("id", id)?;
        validate_fields(&changes.enrollment, &changes.name, changes.current_year)?;

        self.students
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_for("update", "student", "id", id))?;

        self.students
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found_for("update", "student", "id", id))?;

        self.reload(id).await
    }

    /// Deletes the student together with its enrollment links.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        require("id", id)?;
        self.students
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_for("deletion", "student", "id", id))?;

        if self.students.delete(id).await? == 0 {
            return Err(AppError::not_found_for("deletion", "student", "id", id));
        }
        tracing::info!(student_id = %id, "Student deleted");
        Ok(())
    }

    /// Enrolls a student in a subject and returns the updated student.
    ///
    /// # Errors
    /// * `Validation` - an id is empty
    /// * `NotFound` - the student or subject does not exist
    /// * `Duplicate` - the student is already enrolled in the subject
    pub async fn enroll(&self, student_id: &str, subject_id: &str) -> AppResult<Student> {
        require("student_id", student_id)?;
        require("subject_id", subject_id)?;

        let student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::not_found("student", "id", student_id))?;

        self.subjects
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::not_found("subject", "id", subject_id))?;

        if student.is_enrolled_in(subject_id) {
            return Err(AppError::duplicate("enrollment", "subject_id", subject_id));
        }

        self.students.add_subject(student_id, subject_id).await?;
        tracing::info!(student_id = %student_id, subject_id = %subject_id, "Student enrolled");

        self.reload(student_id).await
    }

    /// Removes a student from a subject.
    ///
    /// # Errors
    /// * `Validation` - an id is empty
    /// * `NotFound` - the student does not exist or is not enrolled in the subject
    pub async fn unenroll(&self, student_id: &str, subject_id: &str) -> AppResult<()> {
        require("student_id", student_id)?;
        require("subject_id", subject_id)?;

        let student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::not_found("student", "id", student_id))?;

        if !student.is_enrolled_in(subject_id) {
            return Err(AppError::not_found("enrollment", "subject_id", subject_id));
        }

        // The link can vanish between the check and the delete
        if self.students.remove_subject(student_id, subject_id).await? == 0 {
            return Err(AppError::not_found("enrollment", "subject_id", subject_id));
        }
        tracing::info!(student_id = %student_id, subject_id = %subject_id, "Student unenrolled");
        Ok(())
    }

    async fn reload(&self, id: &str) -> AppResult<Student> {
        self.students
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("student", "id", id))
    }

    /// Checks every reference and drops repeats, keeping first-seen order.
    async fn resolve_subjects(&self, subject_ids: &[String]) -> AppResult<Vec<String>> {
        let mut resolved: Vec<String> = Vec::with_capacity(subject_ids.len());
        for subject_id in subject_ids {
            if subject_id.trim().is_empty() {
                return Err(AppError::validation(
                    "subjects",
                    "Subject references must have an id",
                ));
            }
            if resolved.contains(subject_id) {
                continue;
            }
            self.subjects
                .find_by_id(subject_id)
                .await?
                .ok_or_else(|| AppError::not_found("subject", "id", subject_id.as_str()))?;
            resolved.push(subject_id.clone());
        }
        Ok(resolved)
    }
}

fn validate_fields(enrollment: &str, name: &str, current_year: i32) -> AppResult<()> {
    require("enrollment", enrollment)?;
    require("name", name)?;
    if current_year == 0 {
        return Err(AppError::validation(
            "current_year",
            "current_year is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;
    use crate::repositories::InMemoryStore;

    struct Fixture {
        store: InMemoryStore,
        service: StudentService,
    }

    fn fixture(policy: InitialSubjectPolicy) -> Fixture {
        let store = InMemoryStore::new();
        let service = StudentService::new(Arc::new(store.clone()), Arc::new(store.clone()), policy);
        Fixture { store, service }
    }

    async fn add_subject(store: &InMemoryStore, id: &str, name: &str) {
        SubjectRepository::insert(
            store,
            Subject {
                id: id.to_string(),
                name: name.to_string(),
                year: 2,
                credits: 4,
            },
        )
        .await
        .unwrap();
    }

    fn new_student(enrollment: &str, subject_ids: &[&str]) -> NewStudent {
        NewStudent {
            enrollment: enrollment.to_string(),
            name: "Ana".to_string(),
            current_year: 2,
            subject_ids: subject_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_rehydrates_subjects() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        add_subject(&f.store, "S1", "Algorithms").await;

        let student = f
            .service
            .create(new_student("20230001", &["S1", "S1"]))
            .await
            .unwrap();

        assert_eq!(student.subjects.len(), 1);
        assert_eq!(student.subjects[0].name, "Algorithms");
        assert_eq!(student.subjects[0].credits, 4);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let f = fixture(InitialSubjectPolicy::BestEffort);

        let mut input = new_student("", &[]);
        let err = f.service.create(input.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "enrollment"));

        input.enrollment = "20230001".to_string();
        input.name = " ".to_string();
        let err = f.service.create(input.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));

        input.name = "Ana".to_string();
        input.current_year = 0;
        let err = f.service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "current_year"));
    }

    #[tokio::test]
    async fn test_create_with_unknown_subject_writes_nothing() {
        for policy in [InitialSubjectPolicy::BestEffort, InitialSubjectPolicy::Atomic] {
            let f = fixture(policy);
            add_subject(&f.store, "S1", "Algorithms").await;

            let err = f
                .service
                .create(new_student("20230001", &["S1", "missing"]))
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "subject not found: id=missing");
            assert!(f.service.list().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_subject_reference() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        let err = f
            .service
            .create(new_student("20230001", &[""]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "subjects"));
    }

    #[tokio::test]
    async fn test_atomic_policy_links_all_subjects() {
        let f = fixture(InitialSubjectPolicy::Atomic);
        add_subject(&f.store, "S1", "Algorithms").await;
        add_subject(&f.store, "S2", "Databases").await;

        let student = f
            .service
            .create(new_student("20230001", &["S2", "S1"]))
            .await
            .unwrap();
        let ids: Vec<&str> = student.subjects.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_code_conflicts() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        f.service.create(new_student("20230001", &[])).await.unwrap();

        let err = f
            .service
            .create(new_student("20230001", &[]))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_of("enrollment"));
    }

    #[tokio::test]
    async fn test_enroll_unenroll_scenario() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        add_subject(&f.store, "S1", "Algorithms").await;
        let student = f.service.create(new_student("20230001", &[])).await.unwrap();

        let enrolled = f.service.enroll(&student.id, "S1").await.unwrap();
        assert_eq!(enrolled.subjects.len(), 1);
        assert_eq!(enrolled.subjects[0].id, "S1");

        let err = f.service.enroll(&student.id, "S1").await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { ref entity, .. } if entity == "enrollment"));
        assert_eq!(f.service.get(&student.id).await.unwrap().subjects.len(), 1);

        f.service.unenroll(&student.id, "S1").await.unwrap();
        assert!(f.service.get(&student.id).await.unwrap().subjects.is_empty());

        let err = f.service.unenroll(&student.id, "S1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref entity, .. } if entity == "enrollment"));
    }

    #[tokio::test]
    async fn test_enroll_errors() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        add_subject(&f.store, "S1", "Algorithms").await;
        let student = f.service.create(new_student("20230001", &[])).await.unwrap();

        assert!(matches!(
            f.service.enroll("", "S1").await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            f.service.enroll(&student.id, "").await,
            Err(AppError::Validation { .. })
        ));

        let err = f.service.enroll("ghost", "S1").await.unwrap_err();
        assert_eq!(err.to_string(), "student not found: id=ghost");

        let err = f.service.enroll(&student.id, "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "subject not found: id=nope");
    }

    #[tokio::test]
    async fn test_unenroll_missing_student() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        let err = f.service.unenroll("ghost", "S1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref entity, .. } if entity == "student"));
    }

    #[tokio::test]
    async fn test_update_keeps_subjects_and_checks_existence() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        add_subject(&f.store, "S1", "Algorithms").await;
        let student = f
            .service
            .create(new_student("20230001", &["S1"]))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                &student.id,
                UpdateStudent {
                    enrollment: "20230002".to_string(),
                    name: "Ana Maria".to_string(),
                    current_year: 3,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.enrollment, "20230002");
        assert_eq!(updated.current_year, 3);
        assert_eq!(updated.subjects.len(), 1);

        let err = f
            .service
            .update(
                "ghost",
                UpdateStudent {
                    enrollment: "1".to_string(),
                    name: "x".to_string(),
                    current_year: 1,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "student not found for update: id=ghost");
    }

    #[tokio::test]
    async fn test_cascading_deletes() {
        let f = fixture(InitialSubjectPolicy::BestEffort);
        add_subject(&f.store, "S1", "Algorithms").await;
        add_subject(&f.store, "S2", "Databases").await;
        let ana = f
            .service
            .create(new_student("20230001", &["S1", "S2"]))
            .await
            .unwrap();
        let bia = f
            .service
            .create(new_student("20230002", &["S1"]))
            .await
            .unwrap();

        SubjectRepository::delete(&f.store, "S1").await.unwrap();
        let ana = f.service.get(&ana.id).await.unwrap();
        assert_eq!(ana.subjects.len(), 1);
        assert!(f.service.get(&bia.id).await.unwrap().subjects.is_empty());

        f.service.delete(&ana.id).await.unwrap();
        assert!(matches!(
            f.service.get(&ana.id).await,
            Err(AppError::NotFound { .. })
        ));
        let err = f.service.delete(&ana.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("student not found for deletion: id={}", ana.id)
        );
    }
}
