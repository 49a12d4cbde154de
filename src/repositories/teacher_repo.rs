//! PostgreSQL teacher repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Teacher, UpdateTeacher};
use crate::repositories::TeacherRepository;
use crate::schema::teachers::dsl::*;
use crate::services::registry::latest_registry;

#[derive(Clone)]
pub struct PgTeacherRepository {
    pool: AsyncDbPool,
}

impl PgTeacherRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so the prefix matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl TeacherRepository for PgTeacherRepository {
    async fn insert(&self, teacher: Teacher) -> AppResult<Teacher> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(teachers)
            .values(&teacher)
            .returning(Teacher::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, teacher_id: &str) -> AppResult<Option<Teacher>> {
        let mut conn = self.pool.get().await?;

        teachers
            .filter(id.eq(teacher_id))
            .select(Teacher::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> AppResult<Vec<Teacher>> {
        let mut conn = self.pool.get().await?;

        teachers
            .select(Teacher::as_select())
            .order(registry.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(
        &self,
        teacher_id: &str,
        changes: UpdateTeacher,
    ) -> AppResult<Option<Teacher>> {
        let mut conn = self.pool.get().await?;

        diesel::update(teachers.filter(id.eq(teacher_id)))
            .set(&changes)
            .returning(Teacher::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn delete(&self, teacher_id: &str) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(teachers.filter(id.eq(teacher_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn last_registry_for_prefix(&self, prefix: &str) -> AppResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        let pattern = format!("{}-%", escape_like(prefix));

        // LIKE also matches longer prefixes such as `ART--001` for `ART`.
        let candidates = teachers
            .filter(registry.like(pattern))
            .select(registry)
            .load::<String>(&mut conn)
            .await?;

        Ok(latest_registry(candidates, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_plain_prefix() {
        assert_eq!(escape_like("COMP"), "COMP");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("C_M%"), "C\\_M\\%");
        assert_eq!(escape_like("A\\B"), "A\\\\B");
    }
}
