//! Repository for the `mass_intentions` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::mass_intention::{CreateMassIntention, MassIntention};

const COLUMNS: &str = "id, parish_id, master_event_id, offered_for, requested_by_id, note, \
                       deleted_at, created_at, updated_at";

/// Provides CRUD and linking operations for mass intentions.
pub struct MassIntentionRepo;

impl MassIntentionRepo {
    /// Insert a new mass intention, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateMassIntention,
    ) -> Result<MassIntention, sqlx::Error> {
        let query = format!(
            "INSERT INTO mass_intentions
                (parish_id, master_event_id, offered_for, requested_by_id, note)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MassIntention>(&query)
            .bind(parish_id)
            .bind(input.master_event_id)
            .bind(&input.offered_for)
            .bind(input.requested_by_id)
            .bind(&input.note)
            .fetch_one(pool)
            .await
    }

    /// Find an intention by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<MassIntention>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mass_intentions
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, MassIntention>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the intention linked to a master event, if any.
    pub async fn find_for_event(
        pool: &PgPool,
        master_event_id: DbId,
    ) -> Result<Option<MassIntention>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mass_intentions
             WHERE master_event_id = $1 AND deleted_at IS NULL
             LIMIT 1"
        );
        sqlx::query_as::<_, MassIntention>(&query)
            .bind(master_event_id)
            .fetch_optional(pool)
            .await
    }

    /// Link an intention to a master event. Returns `true` if a row changed.
    pub async fn link(
        pool: &PgPool,
        parish_id: DbId,
        intention_id: DbId,
        master_event_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE mass_intentions SET master_event_id = $3
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL",
        )
        .bind(intention_id)
        .bind(parish_id)
        .bind(master_event_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Unlink an intention from its master event. Returns `true` if a row
    /// changed.
    pub async fn unlink(
        pool: &PgPool,
        parish_id: DbId,
        intention_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE mass_intentions SET master_event_id = NULL
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL",
        )
        .bind(intention_id)
        .bind(parish_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
