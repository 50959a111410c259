//! Repository for the `calendar_events` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::calendar_event::{CalendarEvent, CreateCalendarEvent, UpdateCalendarEvent};

const COLUMNS: &str = "id, parish_id, master_event_id, field_definition_id, start_datetime, \
                       end_datetime, location_id, is_all_day, show_on_calendar, is_cancelled, \
                       deleted_at, created_at, updated_at";

/// Provides CRUD operations for calendar events.
pub struct CalendarEventRepo;

impl CalendarEventRepo {
    /// Insert a new calendar event. When the new slot is flagged as the
    /// primary displayed occurrence, the flag is cleared on its siblings
    /// first so at most one slot per event shows on the calendar.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateCalendarEvent,
    ) -> Result<CalendarEvent, sqlx::Error> {
        let show_on_calendar = input.show_on_calendar.unwrap_or(true);
        if show_on_calendar {
            Self::clear_primary(pool, input.master_event_id).await?;
        }

        let query = format!(
            "INSERT INTO calendar_events
                (parish_id, master_event_id, field_definition_id, start_datetime,
                 end_datetime, location_id, is_all_day, show_on_calendar)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, false), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(parish_id)
            .bind(input.master_event_id)
            .bind(input.field_definition_id)
            .bind(input.start_datetime)
            .bind(input.end_datetime)
            .bind(input.location_id)
            .bind(input.is_all_day)
            .bind(show_on_calendar)
            .fetch_one(pool)
            .await
    }

    /// Find a calendar event by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an event's calendar slots ordered by start time.
    pub async fn list_for_event(
        pool: &PgPool,
        master_event_id: DbId,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE master_event_id = $1 AND deleted_at IS NULL
             ORDER BY start_datetime ASC NULLS LAST"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(master_event_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch the primary (shown-on-calendar) slot for each of the given
    /// events, for list views.
    pub async fn list_primary_for_events(
        pool: &PgPool,
        master_event_ids: &[DbId],
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE master_event_id = ANY($1)
               AND show_on_calendar = true
               AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(master_event_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a calendar event. Only non-`None` fields are applied; setting
    /// `show_on_calendar` clears the flag on sibling slots first.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCalendarEvent,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        if input.show_on_calendar == Some(true) {
            let Some(existing) = Self::find_by_id(pool, id).await? else {
                return Ok(None);
            };
            Self::clear_primary(pool, existing.master_event_id).await?;
        }

        let query = format!(
            "UPDATE calendar_events SET
                start_datetime = COALESCE($2, start_datetime),
                end_datetime = COALESCE($3, end_datetime),
                location_id = COALESCE($4, location_id),
                is_all_day = COALESCE($5, is_all_day),
                show_on_calendar = COALESCE($6, show_on_calendar),
                is_cancelled = COALESCE($7, is_cancelled)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(input.start_datetime)
            .bind(input.end_datetime)
            .bind(input.location_id)
            .bind(input.is_all_day)
            .bind(input.show_on_calendar)
            .bind(input.is_cancelled)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a calendar event. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE calendar_events SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_primary(pool: &PgPool, master_event_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE calendar_events SET show_on_calendar = false
             WHERE master_event_id = $1 AND deleted_at IS NULL",
        )
        .bind(master_event_id)
        .execute(pool)
        .await
        .map(|_| ())
    }
}
