//! Repository for the `locations` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location};

const COLUMNS: &str = "id, parish_id, name, address, deleted_at, created_at, updated_at";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (parish_id, name, address)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(parish_id)
            .bind(&input.name)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    /// Find a location by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// List all locations in a parish ordered by name.
    pub async fn list(pool: &PgPool, parish_id: DbId) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE parish_id = $1 AND deleted_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(parish_id)
            .fetch_all(pool)
            .await
    }
}
