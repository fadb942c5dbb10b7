use newswire_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::article_repository::ArticleRepository;
use crate::config::DatabaseConfig;
use crate::queue_repository::{PublishedMarkerRepository, WorkQueueRepository};

/// Central database facade — owns the connection pool, runs migrations,
/// and vends repository instances.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL with the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {e}")))?;

        Ok(Self { pool })
    }

    /// Create a `Database` from an existing pool (useful for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run all pending migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        tracing::debug!("Running database migrations");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get a [`WorkQueueRepository`] backed by this pool.
    pub fn work_queue(&self) -> WorkQueueRepository {
        WorkQueueRepository::new(self.pool.clone())
    }

    /// Get a [`PublishedMarkerRepository`] backed by this pool.
    pub fn published_markers(&self) -> PublishedMarkerRepository {
        PublishedMarkerRepository::new(self.pool.clone())
    }

    /// Get an [`ArticleRepository`] backed by this pool.
    pub fn articles(&self) -> ArticleRepository {
        ArticleRepository::new(self.pool.clone())
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
