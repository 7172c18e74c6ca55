//! Database repository for content and version-log operations.
//!
//! Uses prepared statements and transactions for data integrity. Every
//! successful content mutation (updates and reverts alike) appends exactly
//! one version record inside the same transaction that writes the field, so
//! the log can never drift from the content it describes.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{ContentSnapshot, Language, SectionContent, VersionRecord};

/// Database repository for all content operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== CONTENT OPERATIONS ====================

    /// Get the full content snapshot: section -> language -> field -> text.
    pub async fn get_snapshot(&self) -> Result<ContentSnapshot, AppError> {
        let rows = sqlx::query(
            "SELECT section, language, field, value FROM content_fields ORDER BY section, language, field"
        )
        .fetch_all(&self.pool)
        .await?;

        let mut snapshot = ContentSnapshot::new();
        for row in rows {
            let section: String = row.get("section");
            let language: String = row.get("language");
            let field: String = row.get("field");
            let value: String = row.get("value");

            let language = language_from_db(&language)?;
            snapshot
                .entry(section)
                .or_insert_with(SectionContent::default)
                .fields_mut(language)
                .insert(field, value);
        }

        Ok(snapshot)
    }

    /// Persist a single field's new value and append the version record
    /// documenting the change.
    ///
    /// A field that does not exist yet is created, with `old_value` recorded
    /// as the empty string. Last-write-wins at the field level: there is no
    /// version/etag compare against concurrent editors.
    pub async fn update_field(
        &self,
        section: &str,
        language: Language,
        field: &str,
        value: &str,
        author: &str,
    ) -> Result<VersionRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<String> = sqlx::query(
            "SELECT value FROM content_fields WHERE section = ? AND language = ? AND field = ?",
        )
        .bind(section)
        .bind(language.as_str())
        .bind(field)
        .fetch_optional(&mut *tx)
        .await?
        .map(|r| r.get("value"));

        let old_value = previous.unwrap_or_default();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO content_fields (section, language, field, value, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (section, language, field)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(section)
        .bind(language.as_str())
        .bind(field)
        .bind(value)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let record = VersionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            section: section.to_string(),
            language,
            field: field.to_string(),
            old_value,
            new_value: value.to_string(),
            author: author.to_string(),
            timestamp: now,
        };
        insert_version(&mut tx, &record).await?;

        tx.commit().await?;
        Ok(record)
    }

    // ==================== VERSION LOG OPERATIONS ====================

    /// List all version records, newest first.
    pub async fn list_versions(&self) -> Result<Vec<VersionRecord>, AppError> {
        let rows = sqlx::query(
            "SELECT id, section, language, field, old_value, new_value, author, timestamp
             FROM content_versions ORDER BY timestamp DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(version_from_row).collect()
    }

    /// Undo the change a version record describes: restore the field to that
    /// record's `old_value` (its value immediately before the change was
    /// applied) and append a new record documenting the restoration.
    ///
    /// History is forward-only: prior records are never mutated or deleted.
    /// Fails with `NotFound` and no side effect when the id is unknown.
    pub async fn revert_version(&self, id: &str, author: &str) -> Result<VersionRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let target = sqlx::query(
            "SELECT id, section, language, field, old_value, new_value, author, timestamp
             FROM content_versions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .as_ref()
        .map(version_from_row)
        .transpose()?
        .ok_or_else(|| AppError::NotFound(format!("Version {} not found", id)))?;

        let current: Option<String> = sqlx::query(
            "SELECT value FROM content_fields WHERE section = ? AND language = ? AND field = ?",
        )
        .bind(&target.section)
        .bind(target.language.as_str())
        .bind(&target.field)
        .fetch_optional(&mut *tx)
        .await?
        .map(|r| r.get("value"));

        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO content_fields (section, language, field, value, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (section, language, field)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(&target.section)
        .bind(target.language.as_str())
        .bind(&target.field)
        .bind(&target.old_value)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let record = VersionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            section: target.section.clone(),
            language: target.language,
            field: target.field.clone(),
            old_value: current.unwrap_or_default(),
            new_value: target.old_value.clone(),
            author: author.to_string(),
            timestamp: now,
        };
        insert_version(&mut tx, &record).await?;

        tx.commit().await?;
        Ok(record)
    }
}

/// Append a version record inside an open transaction.
async fn insert_version(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    record: &VersionRecord,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO content_versions (id, section, language, field, old_value, new_value, author, timestamp)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(&record.section)
    .bind(record.language.as_str())
    .bind(&record.field)
    .bind(&record.old_value)
    .bind(&record.new_value)
    .bind(&record.author)
    .bind(&record.timestamp)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn language_from_db(value: &str) -> Result<Language, AppError> {
    Language::from_str(value)
        .ok_or_else(|| AppError::Internal(format!("Invalid language in database: {}", value)))
}

fn version_from_row(row: &SqliteRow) -> Result<VersionRecord, AppError> {
    let language: String = row.get("language");
    Ok(VersionRecord {
        id: row.get("id"),
        section: row.get("section"),
        language: language_from_db(&language)?,
        field: row.get("field"),
        old_value: row.get("old_value"),
        new_value: row.get("new_value"),
        author: row.get("author"),
        timestamp: row.get("timestamp"),
    })
}
