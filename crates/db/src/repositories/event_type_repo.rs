//! Repository for the `event_types` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::event_type::{CreateEventType, EventType, UpdateEventType};

const COLUMNS: &str = "id, parish_id, name, slug, description, system_type, \"order\", \
                       deleted_at, created_at, updated_at";

/// Provides CRUD operations for event types.
pub struct EventTypeRepo;

impl EventTypeRepo {
    /// Insert a new event type at the end of the parish's sidebar ordering.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateEventType,
    ) -> Result<EventType, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_types (parish_id, name, slug, description, system_type, \"order\")
             VALUES ($1, $2, $3, $4, COALESCE($5, 'event'),
                 (SELECT COALESCE(MAX(\"order\") + 1, 0) FROM event_types
                  WHERE parish_id = $1 AND deleted_at IS NULL))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventType>(&query)
            .bind(parish_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.system_type)
            .fetch_one(pool)
            .await
    }

    /// Find an event type by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<EventType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_types
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, EventType>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// List all event types in a parish in sidebar order.
    pub async fn list(pool: &PgPool, parish_id: DbId) -> Result<Vec<EventType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_types
             WHERE parish_id = $1 AND deleted_at IS NULL
             ORDER BY \"order\" ASC"
        );
        sqlx::query_as::<_, EventType>(&query)
            .bind(parish_id)
            .fetch_all(pool)
            .await
    }

    /// Find the first event type of a given system type (e.g. the parish's
    /// mass-liturgy type).
    pub async fn find_by_system_type(
        pool: &PgPool,
        parish_id: DbId,
        system_type: &str,
    ) -> Result<Option<EventType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_types
             WHERE parish_id = $1 AND system_type = $2 AND deleted_at IS NULL
             ORDER BY \"order\" ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, EventType>(&query)
            .bind(parish_id)
            .bind(system_type)
            .fetch_optional(pool)
            .await
    }

    /// Update an event type. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
        input: &UpdateEventType,
    ) -> Result<Option<EventType>, sqlx::Error> {
        let query = format!(
            "UPDATE event_types SET
                name = COALESCE($3, name),
                slug = COALESCE($4, slug),
                description = COALESCE($5, description),
                system_type = COALESCE($6, system_type)
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventType>(&query)
            .bind(id)
            .bind(parish_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.system_type)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an event type. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, parish_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE event_types SET deleted_at = now()
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(parish_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
