use sqlx::{PgPool, Pool, Postgres};

use newswire_core::error::AppError;
use newswire_core::traits::{MarkerSet, WorkQueue};

/// PostgreSQL-backed FIFO work queue.
///
/// `claim` deletes-and-returns the head row under
/// `FOR UPDATE SKIP LOCKED`, so concurrent consumers never receive the
/// same payload; the pop is the pipeline's single mutual-exclusion
/// point.
#[derive(Clone)]
pub struct WorkQueueRepository {
    pool: Pool<Postgres>,
}

impl WorkQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl WorkQueue for WorkQueueRepository {
    async fn push(&self, payload: &str) -> Result<(), AppError> {
        sqlx::query(r#"INSERT INTO work_queue (payload) VALUES ($1)"#)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn claim(&self) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            DELETE FROM work_queue
            WHERE position = (
                SELECT position FROM work_queue
                ORDER BY position ASC
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            RETURNING payload
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(|(payload,)| payload))
    }

    async fn depth(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM work_queue"#)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(count)
    }
}

/// PostgreSQL-backed set of work-item ids already offered to the queue.
///
/// Rows are only ever added; the set is the producer's cross-run dedup
/// guard and is never pruned.
#[derive(Clone)]
pub struct PublishedMarkerRepository {
    pool: Pool<Postgres>,
}

impl PublishedMarkerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MarkerSet for PublishedMarkerRepository {
    async fn contains(&self, id: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM published_markers WHERE item_id = $1)"#)
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(exists)
    }

    async fn add(&self, id: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO published_markers (item_id) VALUES ($1) ON CONFLICT (item_id) DO NOTHING"#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
