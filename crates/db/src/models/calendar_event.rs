//! Calendar event (occasion) model and DTOs.
//!
//! A master event can own several calendar slots (e.g. rehearsal plus
//! ceremony), each tied to a `calendar_event`-typed field definition. The
//! slot with `show_on_calendar = true` is the primary displayed occurrence.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `calendar_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEvent {
    pub id: DbId,
    pub parish_id: DbId,
    pub master_event_id: DbId,
    pub field_definition_id: Option<DbId>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub location_id: Option<DbId>,
    pub is_all_day: bool,
    pub show_on_calendar: bool,
    pub is_cancelled: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new calendar event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCalendarEvent {
    pub master_event_id: DbId,
    pub field_definition_id: Option<DbId>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub location_id: Option<DbId>,
    pub is_all_day: Option<bool>,
    pub show_on_calendar: Option<bool>,
}

/// DTO for updating a calendar event. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCalendarEvent {
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub location_id: Option<DbId>,
    pub is_all_day: Option<bool>,
    pub show_on_calendar: Option<bool>,
    pub is_cancelled: Option<bool>,
}
