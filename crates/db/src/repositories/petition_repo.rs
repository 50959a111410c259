//! Repository for the `petitions` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::petition::{CreatePetition, Petition};

const COLUMNS: &str = "id, parish_id, title, text, deleted_at, created_at, updated_at";

/// Provides CRUD operations for petitions.
pub struct PetitionRepo;

impl PetitionRepo {
    /// Insert a new petition, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreatePetition,
    ) -> Result<Petition, sqlx::Error> {
        let query = format!(
            "INSERT INTO petitions (parish_id, title, text)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Petition>(&query)
            .bind(parish_id)
            .bind(&input.title)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Find a petition by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<Petition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM petitions
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Petition>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }
}
