//! Repository layer for data access operations.
//!
//! Each entity has an async repository trait with two implementations: a
//! PostgreSQL one built on diesel_async, and a process-local one used for
//! development and tests.

mod memory;
mod student_repo;
mod subject_repo;
mod teacher_repo;

pub use memory::InMemoryStore;
pub use student_repo::PgStudentRepository;
pub use subject_repo::PgSubjectRepository;
pub use teacher_repo::PgTeacherRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{
    Student, StudentRecord, Subject, Teacher, UpdateStudent, UpdateSubject, UpdateTeacher,
};

/// Persistence for students and their subject links.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert(&self, record: StudentRecord) -> AppResult<StudentRecord>;

    /// Inserts the student and links every subject in a single transaction.
    async fn insert_with_subjects(
        &self,
        record: StudentRecord,
        subject_ids: &[String],
    ) -> AppResult<StudentRecord>;

    /// Loads the student with its linked subjects.
    async fn find_by_id(&self, student_id: &str) -> AppResult<Option<Student>>;

    async fn list_all(&self) -> AppResult<Vec<Student>>;

    /// Returns `None` when no row has the id.
    async fn update(
        &self,
        student_id: &str,
        changes: UpdateStudent,
    ) -> AppResult<Option<StudentRecord>>;

    /// Deletes the student and its links. Returns the number of student rows removed.
    async fn delete(&self, student_id: &str) -> AppResult<usize>;

    /// Links a subject. Returns 0 when the link already existed.
    async fn add_subject(&self, student_id: &str, subject_id: &str) -> AppResult<usize>;

    /// Unlinks a subject. Returns 0 when there was no link.
    async fn remove_subject(&self, student_id: &str, subject_id: &str) -> AppResult<usize>;
}

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn insert(&self, subject: Subject) -> AppResult<Subject>;

    async fn find_by_id(&self, subject_id: &str) -> AppResult<Option<Subject>>;

    async fn list_all(&self) -> AppResult<Vec<Subject>>;

    async fn update(&self, subject_id: &str, changes: UpdateSubject)
    -> AppResult<Option<Subject>>;

    /// Deletes the subject and every enrollment link that references it.
    async fn delete(&self, subject_id: &str) -> AppResult<usize>;
}

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// Fails with `Duplicate` on `registry` when the registry is taken.
    async fn insert(&self, teacher: Teacher) -> AppResult<Teacher>;

    async fn find_by_id(&self, teacher_id: &str) -> AppResult<Option<Teacher>>;

    async fn list_all(&self) -> AppResult<Vec<Teacher>>;

    async fn update(&self, teacher_id: &str, changes: UpdateTeacher)
    -> AppResult<Option<Teacher>>;

    async fn delete(&self, teacher_id: &str) -> AppResult<usize>;

    /// Highest registry of the form `{prefix}-{n}`, comparing by length first
    /// so that `COMP-1000` ranks above `COMP-999`.
    async fn last_registry_for_prefix(&self, prefix: &str) -> AppResult<Option<String>>;
}

/// Aggregates all repositories for convenient access.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub students: Arc<dyn StudentRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub teachers: Arc<dyn TeacherRepository>,
}

impl Repositories {
    /// Repositories backed by PostgreSQL.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            students: Arc::new(PgStudentRepository::new(pool.clone())),
            subjects: Arc::new(PgSubjectRepository::new(pool.clone())),
            teachers: Arc::new(PgTeacherRepository::new(pool)),
        }
    }

    /// Repositories sharing one fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            students: Arc::new(store.clone()),
            subjects: Arc::new(store.clone()),
            teachers: Arc::new(store),
        }
    }
}
