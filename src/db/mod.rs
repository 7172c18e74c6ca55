//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for the content snapshot and the version log.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool, run migrations, and seed the
/// initial site content on first run.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    // Seed the initial bilingual content
    seed_default_content(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create tables if they don't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_fields (
            section TEXT NOT NULL,
            language TEXT NOT NULL,
            field TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (section, language, field)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content_versions (
            id TEXT PRIMARY KEY,
            section TEXT NOT NULL,
            language TEXT NOT NULL,
            field TEXT NOT NULL,
            old_value TEXT NOT NULL,
            new_value TEXT NOT NULL,
            author TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Index for the newest-first history listing
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_versions_timestamp ON content_versions(timestamp);
        CREATE INDEX IF NOT EXISTS idx_versions_field ON content_versions(section, language, field);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initial site content, inserted when the content table is empty.
/// Fields are kept in en/pt parity. Seeding appends no version records.
const DEFAULT_CONTENT: &[(&str, &str, &str, &str)] = &[
    ("hero", "en", "title", "Hi, I build things for the web"),
    ("hero", "pt", "title", "Olá, eu construo coisas para a web"),
    ("hero", "en", "tagline", "Software engineer and open-source contributor"),
    ("hero", "pt", "tagline", "Engenheiro de software e contribuidor open-source"),
    ("about", "en", "bio", "I am a software engineer focused on backend systems."),
    ("about", "pt", "bio", "Sou engenheiro de software focado em sistemas backend."),
    ("projects", "en", "title", "Projects"),
    ("projects", "pt", "title", "Projetos"),
    ("projects", "en", "current", "Currently working on"),
    ("projects", "pt", "current", "Trabalhando atualmente em"),
    ("projects", "en", "networks", "Find me on"),
    ("projects", "pt", "networks", "Encontre-me em"),
];

/// Seed the default bilingual content if no content exists yet.
async fn seed_default_content(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM content_fields")
        .fetch_one(pool)
        .await?;
    let count: i64 = row.get("n");
    if count > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();
    for (section, language, field, value) in DEFAULT_CONTENT {
        sqlx::query(
            "INSERT INTO content_fields (section, language, field, value, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(section)
        .bind(language)
        .bind(field)
        .bind(value)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    tracing::info!("Seeded {} default content fields", DEFAULT_CONTENT.len());
    Ok(())
}
