//! Repository for the `documents` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document};

const COLUMNS: &str = "id, parish_id, file_name, file_path, file_type, file_size, \
                       deleted_at, created_at";

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Register an uploaded document, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (parish_id, file_name, file_path, file_type, file_size)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(parish_id)
            .bind(&input.file_name)
            .bind(&input.file_path)
            .bind(&input.file_type)
            .bind(input.file_size)
            .fetch_one(pool)
            .await
    }

    /// Find a document by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }
}
