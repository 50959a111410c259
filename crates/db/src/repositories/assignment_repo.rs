//! Repository for the `people_event_assignments` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{AssignmentWithPerson, CreateAssignment, PeopleEventAssignment};

const COLUMNS: &str = "id, parish_id, master_event_id, person_id, field_definition_id, notes, \
                       deleted_at, created_at";

const JOINED_COLUMNS: &str = "a.id, a.master_event_id, a.person_id, a.field_definition_id, \
                              a.notes, d.property_name, \
                              p.full_name AS person_full_name, \
                              p.first_name AS person_first_name, \
                              p.last_name AS person_last_name, \
                              p.gender AS person_gender";

/// Provides CRUD operations for people-event role assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert a new assignment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateAssignment,
    ) -> Result<PeopleEventAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO people_event_assignments
                (parish_id, master_event_id, person_id, field_definition_id, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PeopleEventAssignment>(&query)
            .bind(parish_id)
            .bind(input.master_event_id)
            .bind(input.person_id)
            .bind(input.field_definition_id)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List an event's assignments joined with person and definition data.
    pub async fn list_for_event(
        pool: &PgPool,
        master_event_id: DbId,
    ) -> Result<Vec<AssignmentWithPerson>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM people_event_assignments a
             JOIN people p ON p.id = a.person_id AND p.deleted_at IS NULL
             JOIN input_field_definitions d ON d.id = a.field_definition_id
             WHERE a.master_event_id = $1 AND a.deleted_at IS NULL
             ORDER BY a.created_at ASC"
        );
        sqlx::query_as::<_, AssignmentWithPerson>(&query)
            .bind(master_event_id)
            .fetch_all(pool)
            .await
    }

    /// List assignments for a set of events, for list-view name columns.
    pub async fn list_for_events(
        pool: &PgPool,
        master_event_ids: &[DbId],
    ) -> Result<Vec<AssignmentWithPerson>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM people_event_assignments a
             JOIN people p ON p.id = a.person_id AND p.deleted_at IS NULL
             JOIN input_field_definitions d ON d.id = a.field_definition_id
             WHERE a.master_event_id = ANY($1) AND a.deleted_at IS NULL"
        );
        sqlx::query_as::<_, AssignmentWithPerson>(&query)
            .bind(master_event_ids)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete one assignment. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE people_event_assignments SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete all assignments of an event. Returns the number marked.
    pub async fn soft_delete_for_event(
        pool: &PgPool,
        master_event_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE people_event_assignments SET deleted_at = now()
             WHERE master_event_id = $1 AND deleted_at IS NULL",
        )
        .bind(master_event_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
