//! Repository for the `master_events` table.

use sacristy_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::master_event::{CreateMasterEvent, MasterEvent, UpdateMasterEvent};

const COLUMNS: &str = "id, parish_id, event_type_id, field_values, status, \
                       deleted_at, created_at, updated_at";

/// Filters accepted by [`MasterEventRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct MasterEventFilter {
    pub event_type_id: Option<DbId>,
    pub system_type: Option<String>,
    pub status: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Provides CRUD operations for master events.
pub struct MasterEventRepo;

impl MasterEventRepo {
    /// Insert a new master event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateMasterEvent,
    ) -> Result<MasterEvent, sqlx::Error> {
        let field_values = input.field_values.clone().unwrap_or_default();
        let query = format!(
            "INSERT INTO master_events (parish_id, event_type_id, field_values, status)
             VALUES ($1, $2, $3, COALESCE($4, 'PLANNING'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MasterEvent>(&query)
            .bind(parish_id)
            .bind(input.event_type_id)
            .bind(Json(&field_values))
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a master event by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<MasterEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM master_events
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, MasterEvent>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// List master events for a parish, newest first, with optional
    /// event-type, system-type, and status filters.
    pub async fn list(
        pool: &PgPool,
        parish_id: DbId,
        filter: &MasterEventFilter,
    ) -> Result<Vec<MasterEvent>, sqlx::Error> {
        let query = format!(
            "SELECT m.{columns}
             FROM master_events m
             JOIN event_types et ON et.id = m.event_type_id AND et.deleted_at IS NULL
             WHERE m.parish_id = $1
               AND m.deleted_at IS NULL
               AND ($2::uuid IS NULL OR m.event_type_id = $2)
               AND ($3::text IS NULL OR et.system_type = $3)
               AND ($4::text IS NULL OR m.status = $4)
             ORDER BY m.created_at DESC
             LIMIT $5 OFFSET $6",
            columns = COLUMNS.replace(", ", ", m.")
        );
        sqlx::query_as::<_, MasterEvent>(&query)
            .bind(parish_id)
            .bind(filter.event_type_id)
            .bind(&filter.system_type)
            .bind(&filter.status)
            .bind(if filter.limit > 0 { filter.limit } else { 50 })
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// Count master events for a parish with an optional system-type filter.
    pub async fn count(
        pool: &PgPool,
        parish_id: DbId,
        system_type: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM master_events m
             JOIN event_types et ON et.id = m.event_type_id AND et.deleted_at IS NULL
             WHERE m.parish_id = $1
               AND m.deleted_at IS NULL
               AND ($2::text IS NULL OR et.system_type = $2)",
        )
        .bind(parish_id)
        .bind(system_type)
        .fetch_one(pool)
        .await
    }

    /// Update a master event. Only non-`None` fields are applied.
    /// Concurrent saves are last-write-wins at the row level.
    pub async fn update(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
        input: &UpdateMasterEvent,
    ) -> Result<Option<MasterEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE master_events SET
                field_values = COALESCE($3, field_values),
                status = COALESCE($4, status)
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MasterEvent>(&query)
            .bind(id)
            .bind(parish_id)
            .bind(input.field_values.as_ref().map(Json))
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a master event. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, parish_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE master_events SET deleted_at = now()
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(parish_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
