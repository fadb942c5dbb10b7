use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

/// SQL migration statements, executed one at a time.
const MIGRATIONS: &[&str] = &[
    // 001_articles.sql
    r#"CREATE TABLE IF NOT EXISTS articles (
        id VARCHAR PRIMARY KEY,
        url VARCHAR NOT NULL,
        source VARCHAR NOT NULL,
        category VARCHAR NOT NULL,
        priority INTEGER NOT NULL,
        title TEXT,
        body TEXT,
        error TEXT,
        scraped_at TIMESTAMPTZ NOT NULL,
        processed_at TIMESTAMPTZ NOT NULL,
        word_count INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_articles_source
        ON articles(source, processed_at DESC)"#,
    // 002_queue.sql
    r#"CREATE TABLE IF NOT EXISTS work_queue (
        position BIGSERIAL PRIMARY KEY,
        payload TEXT NOT NULL,
        enqueued_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS published_markers (
        item_id VARCHAR PRIMARY KEY,
        marked_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
];

/// Spins up a PostgreSQL container and returns a connected pool.
///
/// The `ContainerAsync` must be kept in scope for the test duration —
/// dropping it will stop the container.
pub async fn setup_test_db() -> (PgPool, ContainerAsync<GenericImage>) {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(ContainerPort::Tcp(5432))
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_PASSWORD", "postgres")
        .with_env_var("POSTGRES_DB", "newswire_test")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");

    let connection_string = format!("postgresql://postgres:postgres@{host}:{port}/newswire_test");

    // Retry connection until container is fully ready
    const MAX_RETRIES: u32 = 30;
    let mut retries = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .connect(&connection_string)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retries += 1;
                if retries >= MAX_RETRIES {
                    panic!("Failed to connect to database after {MAX_RETRIES} retries: {e}");
                }
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        }
    };

    // Run migrations one statement at a time
    for migration in MIGRATIONS {
        sqlx::query(migration)
            .execute(&pool)
            .await
            .expect("Failed to run migration");
    }

    (pool, container)
}
