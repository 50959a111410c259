//! Repository for the `groups` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group};

const COLUMNS: &str = "id, parish_id, name, description, deleted_at, created_at, updated_at";

/// Provides CRUD operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a new group, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateGroup,
    ) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (parish_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(parish_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a group by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM groups
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }
}
