//! PostgreSQL subject repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Subject, UpdateSubject};
use crate::repositories::SubjectRepository;
use crate::schema::subjects::dsl::*;

#[derive(Clone)]
pub struct PgSubjectRepository {
    pool: AsyncDbPool,
}

impl PgSubjectRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubjectRepository for PgSubjectRepository {
    async fn insert(&self, subject: Subject) -> AppResult<Subject> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(subjects)
            .values(&subject)
            .returning(Subject::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, subject_id: &str) -> AppResult<Option<Subject>> {
        let mut conn = self.pool.get().await?;

        subjects
            .filter(id.eq(subject_id))
            .select(Subject::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> AppResult<Vec<Subject>> {
        let mut conn = self.pool.get().await?;

        subjects
            .select(Subject::as_select())
            .order((name.asc(), id.asc()))
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(
        &self,
        subject_id: &str,
        changes: UpdateSubject,
    ) -> AppResult<Option<Subject>> {
        let mut conn = self.pool.get().await?;

        diesel::update(subjects.filter(id.eq(subject_id)))
            .set(&changes)
            .returning(Subject::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn delete(&self, subject_id: &str) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(subjects.filter(id.eq(subject_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
