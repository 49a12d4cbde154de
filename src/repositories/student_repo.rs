//! PostgreSQL student repository.
//!
//! Students are stored in `students`; their subject set lives in the
//! `student_subjects` association table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Student, StudentRecord, StudentSubject, Subject, UpdateStudent};
use crate::repositories::StudentRepository;
use crate::schema::{student_subjects, students, subjects};

/// Student repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning is cheap.
#[derive(Clone)]
pub struct PgStudentRepository {
    pool: AsyncDbPool,
}

impl PgStudentRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

fn links_for(student_id: &str, subject_ids: &[String]) -> Vec<StudentSubject> {
    subject_ids
        .iter()
        .map(|subject_id| StudentSubject {
            student_id: student_id.to_string(),
            subject_id: subject_id.clone(),
        })
        .collect()
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn insert(&self, record: StudentRecord) -> AppResult<StudentRecord> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(students::table)
            .values(&record)
            .returning(StudentRecord::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn insert_with_subjects(
        &self,
        record: StudentRecord,
        subject_ids: &[String],
    ) -> AppResult<StudentRecord> {
        let mut conn = self.pool.get().await?;
        let links = links_for(&record.id, subject_ids);

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(students::table)
                    .values(&record)
                    .returning(StudentRecord::as_returning())
                    .get_result(conn)
                    .await?;

                if !links.is_empty() {
                    diesel::insert_into(student_subjects::table)
                        .values(&links)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }

                Ok(inserted)
            }
            .scope_boxed()
        })
        .await
    }

    async fn find_by_id(&self, student_id: &str) -> AppResult<Option<Student>> {
        let mut conn = self.pool.get().await?;

        let Some(record) = students::table
            .find(student_id)
            .select(StudentRecord::as_select())
            .first(&mut conn)
            .await
            .optional()?
        else {
            return Ok(None);
        };

        let subjects = StudentSubject::belonging_to(&record)
            .inner_join(subjects::table)
            .select(Subject::as_select())
            .order((subjects::name.asc(), subjects::id.asc()))
            .load(&mut conn)
            .await?;

        Ok(Some(Student::from_record(record, subjects)))
    }

    async fn list_all(&self) -> AppResult<Vec<Student>> {
        let mut conn = self.pool.get().await?;

        let records = students::table
            .select(StudentRecord::as_select())
            .order(students::enrollment.asc())
            .load(&mut conn)
            .await?;

        let links: Vec<(StudentSubject, Subject)> = StudentSubject::belonging_to(&records)
            .inner_join(subjects::table)
            .select((StudentSubject::as_select(), Subject::as_select()))
            .order((subjects::name.asc(), subjects::id.asc()))
            .load(&mut conn)
            .await?;

        let grouped = links.grouped_by(&records);
        Ok(records
            .into_iter()
            .zip(grouped)
            .map(|(record, links)| {
                let subjects = links.into_iter().map(|(_, subject)| subject).collect();
                Student::from_record(record, subjects)
            })
            .collect())
    }

    async fn update(
        &self,
        student_id: &str,
        changes: UpdateStudent,
    ) -> AppResult<Option<StudentRecord>> {
        let mut conn = self.pool.get().await?;

        diesel::update(students::table.find(student_id))
            .set(&changes)
            .returning(StudentRecord::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn delete(&self, student_id: &str) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        // student_subjects rows go with it through ON DELETE CASCADE
        diesel::delete(students::table.find(student_id))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn add_subject(&self, student_id: &str, subject_id: &str) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;
        let link = StudentSubject {
            student_id: student_id.to_string(),
            subject_id: subject_id.to_string(),
        };

        diesel::insert_into(student_subjects::table)
            .values(&link)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn remove_subject(&self, student_id: &str, subject_id: &str) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(student_subjects::table.find((student_id, subject_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_for_pairs_every_subject_with_the_student() {
        let links = links_for("s1", &["math".to_string(), "physics".to_string()]);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.student_id == "s1"));
        assert_eq!(links[1].subject_id, "physics");
    }
}
