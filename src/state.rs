//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::Settings;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since both Services and AsyncDbPool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool; `None` on the in-memory store
    pub db_pool: Option<AsyncDbPool>,
}

impl AppState {
    /// Creates state backed by PostgreSQL through the given pool.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, &settings);
    /// ```
    pub fn new(pool: AsyncDbPool, settings: &Settings) -> Self {
        let repos = Repositories::postgres(pool.clone());
        Self {
            services: Services::new(repos, settings),
            db_pool: Some(pool),
        }
    }

    /// Creates state backed by a fresh in-process store.
    pub fn in_memory(settings: &Settings) -> Self {
        Self {
            services: Services::new(Repositories::in_memory(), settings),
            db_pool: None,
        }
    }
}
