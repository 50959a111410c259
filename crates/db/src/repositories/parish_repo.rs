//! Repository for the `parishes` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::parish::Parish;

const COLUMNS: &str = "id, name, city, state, deleted_at, created_at, updated_at";

/// Provides read and seed operations for parishes.
pub struct ParishRepo;

impl ParishRepo {
    /// Insert a new parish, returning the created row.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        city: &str,
        state: &str,
    ) -> Result<Parish, sqlx::Error> {
        let query = format!(
            "INSERT INTO parishes (name, city, state) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Parish>(&query)
            .bind(name)
            .bind(city)
            .bind(state)
            .fetch_one(pool)
            .await
    }

    /// Find a parish by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Parish>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parishes WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Parish>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
