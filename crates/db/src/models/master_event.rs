//! Master event model, DTOs, and the fully-loaded relation projection.

use sacristy_core::fields::{FieldValues, ResolvedFields};
use sacristy_core::placeholders::ParishInfo;
use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::assignment::AssignmentWithPerson;
use crate::models::calendar_event::CalendarEvent;
use crate::models::event_type::EventType;
use crate::models::field_definition::FieldDefinition;
use crate::models::mass_intention::MassIntention;

/// Event status values.
pub const STATUS_PLANNING: &str = "PLANNING";
pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// All valid status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PLANNING,
    STATUS_CONFIRMED,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

/// A row from the `master_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MasterEvent {
    pub id: DbId,
    pub parish_id: DbId,
    pub event_type_id: DbId,
    pub field_values: Json<FieldValues>,
    pub status: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new master event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMasterEvent {
    pub event_type_id: DbId,
    pub field_values: Option<FieldValues>,
    pub status: Option<String>,
}

/// DTO for updating a master event. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMasterEvent {
    pub field_values: Option<FieldValues>,
    pub status: Option<String>,
}

/// A master event loaded with everything the detail view and the script
/// renderer need: schema, satellites, and the resolved field map.
#[derive(Debug, Clone, Serialize)]
pub struct MasterEventWithRelations {
    #[serde(flatten)]
    pub event: MasterEvent,
    pub event_type: EventType,
    pub field_definitions: Vec<FieldDefinition>,
    pub calendar_events: Vec<CalendarEvent>,
    pub assignments: Vec<AssignmentWithPerson>,
    pub mass_intention: Option<MassIntention>,
    pub resolved_fields: ResolvedFields,
    pub parish: Option<ParishInfo>,
}

/// A list-view row: the event plus its primary calendar slot and the names
/// of its presider and homilist, when assigned.
#[derive(Debug, Clone, Serialize)]
pub struct MasterEventWithNames {
    #[serde(flatten)]
    pub event: MasterEvent,
    pub event_type_name: String,
    pub primary_calendar_event: Option<CalendarEvent>,
    pub presider_name: Option<String>,
    pub homilist_name: Option<String>,
}
