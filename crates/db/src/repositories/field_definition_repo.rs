//! Repository for the `input_field_definitions` table.
//!
//! Invariant enforcement (flag validation, primary uniqueness, delete
//! guards) lives in [`crate::definitions`]; this module is plain SQL.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::field_definition::{
    CreateFieldDefinition, FieldDefinition, UpdateFieldDefinition,
};

const COLUMNS: &str = "id, event_type_id, name, property_name, type, required, list_id, \
                       is_key_person, is_primary, \"order\", deleted_at, created_at, updated_at";

/// Raw usage counts of a field definition across the tables that can
/// reference it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageCounts {
    /// Events with a non-null `field_values` entry under the property name.
    pub events: i64,
    /// Live people-event assignments bound to the definition.
    pub assignments: i64,
    /// Live calendar events bound to the definition.
    pub calendar_events: i64,
}

impl UsageCounts {
    pub fn total(&self) -> i64 {
        self.events + self.assignments + self.calendar_events
    }
}

/// Provides CRUD operations for input field definitions.
pub struct FieldDefinitionRepo;

impl FieldDefinitionRepo {
    /// Insert a new definition at the end of the event type's ordering.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFieldDefinition,
    ) -> Result<FieldDefinition, sqlx::Error> {
        let query = format!(
            "INSERT INTO input_field_definitions
                (event_type_id, name, property_name, type, required, list_id,
                 is_key_person, is_primary, \"order\")
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, false), COALESCE($8, false),
                 (SELECT COALESCE(MAX(\"order\") + 1, 0) FROM input_field_definitions
                  WHERE event_type_id = $1 AND deleted_at IS NULL))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FieldDefinition>(&query)
            .bind(input.event_type_id)
            .bind(&input.name)
            .bind(&input.property_name)
            .bind(&input.field_type)
            .bind(input.required)
            .bind(input.list_id)
            .bind(input.is_key_person)
            .bind(input.is_primary)
            .fetch_one(pool)
            .await
    }

    /// Find a definition by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FieldDefinition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM input_field_definitions
             WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, FieldDefinition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an event type's definitions in display order.
    pub async fn list_for_event_type(
        pool: &PgPool,
        event_type_id: DbId,
    ) -> Result<Vec<FieldDefinition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM input_field_definitions
             WHERE event_type_id = $1 AND deleted_at IS NULL
             ORDER BY \"order\" ASC"
        );
        sqlx::query_as::<_, FieldDefinition>(&query)
            .bind(event_type_id)
            .fetch_all(pool)
            .await
    }

    /// Find the primary calendar-event definition of an event type, if any,
    /// optionally excluding one record (for self-excluded update checks).
    pub async fn find_primary_calendar(
        pool: &PgPool,
        event_type_id: DbId,
        exclude: Option<DbId>,
    ) -> Result<Option<FieldDefinition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM input_field_definitions
             WHERE event_type_id = $1
               AND type = 'calendar_event'
               AND is_primary = true
               AND deleted_at IS NULL
               AND ($2::uuid IS NULL OR id <> $2)
             LIMIT 1"
        );
        sqlx::query_as::<_, FieldDefinition>(&query)
            .bind(event_type_id)
            .bind(exclude)
            .fetch_optional(pool)
            .await
    }

    /// Update a definition. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFieldDefinition,
    ) -> Result<Option<FieldDefinition>, sqlx::Error> {
        let query = format!(
            "UPDATE input_field_definitions SET
                name = COALESCE($2, name),
                property_name = COALESCE($3, property_name),
                type = COALESCE($4, type),
                required = COALESCE($5, required),
                list_id = COALESCE($6, list_id),
                is_key_person = COALESCE($7, is_key_person),
                is_primary = COALESCE($8, is_primary)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FieldDefinition>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.property_name)
            .bind(&input.field_type)
            .bind(input.required)
            .bind(input.list_id)
            .bind(input.is_key_person)
            .bind(input.is_primary)
            .fetch_optional(pool)
            .await
    }

    /// Count references to a definition: events whose `field_values` carry a
    /// non-null entry under its property name, plus live assignment and
    /// calendar-event rows bound to it.
    pub async fn usage_counts(
        pool: &PgPool,
        event_type_id: DbId,
        property_name: &str,
        id: DbId,
    ) -> Result<UsageCounts, sqlx::Error> {
        let (events, assignments, calendar_events): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM master_events
                 WHERE event_type_id = $1 AND deleted_at IS NULL
                   AND field_values->>$2 IS NOT NULL),
                (SELECT COUNT(*) FROM people_event_assignments
                 WHERE field_definition_id = $3 AND deleted_at IS NULL),
                (SELECT COUNT(*) FROM calendar_events
                 WHERE field_definition_id = $3 AND deleted_at IS NULL)",
        )
        .bind(event_type_id)
        .bind(property_name)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(UsageCounts {
            events,
            assignments,
            calendar_events,
        })
    }

    /// Hard-delete a definition. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM input_field_definitions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign an explicit display order to one definition.
    pub async fn set_order(
        pool: &PgPool,
        event_type_id: DbId,
        id: DbId,
        order: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE input_field_definitions SET \"order\" = $3
             WHERE id = $1 AND event_type_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(event_type_id)
        .bind(order)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
