use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};

use newswire_core::error::AppError;
use newswire_core::models::ArticleRecord;
use newswire_core::traits::{ArticleStore, InsertOutcome};

/// Repository for article persistence in PostgreSQL.
///
/// The `articles` primary key on `id` is the pipeline's idempotency
/// constraint: under at-least-once delivery, racing inserts of the same
/// id resolve to one stored row and one [`InsertOutcome::Duplicate`].
#[derive(Clone)]
pub struct ArticleRepository {
    pool: Pool<Postgres>,
}

impl ArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a record, treating a unique violation on `id` as an
    /// idempotent no-op. The violation is recognized via the driver's
    /// typed error code, not by matching message text.
    pub async fn insert(&self, record: &ArticleRecord) -> Result<InsertOutcome, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO articles
                (id, url, source, category, priority, title, body, error,
                 scraped_at, processed_at, word_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&record.id)
        .bind(&record.url)
        .bind(&record.source)
        .bind(&record.category)
        .bind(record.priority)
        .bind(&record.title)
        .bind(&record.body)
        .bind(&record.error)
        .bind(record.scraped_at)
        .bind(record.processed_at)
        .bind(record.word_count as i32)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(AppError::DatabaseError(e.to_string())),
        }
    }

    /// Fetch a stored record by id.
    pub async fn get(&self, id: &str) -> Result<Option<ArticleRecord>, AppError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, url, source, category, priority, title, body, error,
                   scraped_at, processed_at, word_count
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// Total number of stored records.
    pub async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM articles"#)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(count)
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: String,
    url: String,
    source: String,
    category: String,
    priority: i32,
    title: Option<String>,
    body: Option<String>,
    error: Option<String>,
    scraped_at: DateTime<Utc>,
    processed_at: DateTime<Utc>,
    word_count: i32,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        ArticleRecord {
            id: row.id,
            url: row.url,
            source: row.source,
            category: row.category,
            priority: row.priority,
            title: row.title,
            body: row.body,
            error: row.error,
            scraped_at: row.scraped_at,
            processed_at: row.processed_at,
            word_count: row.word_count as u32,
        }
    }
}

// -- Trait implementation --

impl ArticleStore for ArticleRepository {
    async fn insert(&self, record: &ArticleRecord) -> Result<InsertOutcome, AppError> {
        ArticleRepository::insert(self, record).await
    }
}
