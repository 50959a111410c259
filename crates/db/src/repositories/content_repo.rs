//! Repository for the `contents` table (content library).

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::content::{Content, CreateContent};

const COLUMNS: &str = "id, parish_id, title, body, language, deleted_at, created_at, updated_at";

/// Provides CRUD operations for content library entries.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert a new content entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateContent,
    ) -> Result<Content, sqlx::Error> {
        let query = format!(
            "INSERT INTO contents (parish_id, title, body, language)
             VALUES ($1, $2, $3, COALESCE($4, 'en'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Content>(&query)
            .bind(parish_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.language)
            .fetch_one(pool)
            .await
    }

    /// Find a content entry by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<Content>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contents
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Content>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// List all content entries in a parish ordered by title.
    pub async fn list(pool: &PgPool, parish_id: DbId) -> Result<Vec<Content>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contents
             WHERE parish_id = $1 AND deleted_at IS NULL
             ORDER BY title ASC"
        );
        sqlx::query_as::<_, Content>(&query)
            .bind(parish_id)
            .fetch_all(pool)
            .await
    }
}
