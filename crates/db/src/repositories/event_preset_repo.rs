//! Repository for the `event_presets` table.
//!
//! `preset_data` is written once at creation and never updated; only the
//! name and description can change afterwards.

use sacristy_core::preset::PresetData;
use sacristy_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::event_preset::{EventPreset, EventPresetWithEventType, UpdateEventPreset};

const COLUMNS: &str = "id, parish_id, event_type_id, name, description, preset_data, \
                       created_by, deleted_at, created_at, updated_at";

/// Provides CRUD operations for event presets.
pub struct EventPresetRepo;

impl EventPresetRepo {
    /// Insert a new preset, returning the created row.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        event_type_id: DbId,
        name: &str,
        description: Option<&str>,
        data: &PresetData,
        created_by: Option<DbId>,
    ) -> Result<EventPreset, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_presets
                (parish_id, event_type_id, name, description, preset_data, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventPreset>(&query)
            .bind(parish_id)
            .bind(event_type_id)
            .bind(name)
            .bind(description)
            .bind(Json(data))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a preset by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<EventPreset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_presets
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, EventPreset>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// List all of a parish's presets with their event type name, newest
    /// first.
    pub async fn list(
        pool: &PgPool,
        parish_id: DbId,
    ) -> Result<Vec<EventPresetWithEventType>, sqlx::Error> {
        let query = format!(
            "SELECT p.{columns}, et.name AS event_type_name
             FROM event_presets p
             JOIN event_types et ON et.id = p.event_type_id
             WHERE p.parish_id = $1 AND p.deleted_at IS NULL
             ORDER BY p.created_at DESC",
            columns = COLUMNS.replace(", ", ", p.")
        );
        sqlx::query_as::<_, EventPresetWithEventType>(&query)
            .bind(parish_id)
            .fetch_all(pool)
            .await
    }

    /// List a parish's presets for one event type, newest first.
    pub async fn list_for_event_type(
        pool: &PgPool,
        parish_id: DbId,
        event_type_id: DbId,
    ) -> Result<Vec<EventPreset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_presets
             WHERE parish_id = $1 AND event_type_id = $2 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, EventPreset>(&query)
            .bind(parish_id)
            .bind(event_type_id)
            .fetch_all(pool)
            .await
    }

    /// Relabel a preset. `preset_data` is never touched by this statement.
    pub async fn update_label(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
        input: &UpdateEventPreset,
    ) -> Result<Option<EventPreset>, sqlx::Error> {
        let query = format!(
            "UPDATE event_presets SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventPreset>(&query)
            .bind(id)
            .bind(parish_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a preset. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, parish_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE event_presets SET deleted_at = now()
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(parish_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
