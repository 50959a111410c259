//! People-to-event role assignment models and DTOs.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `people_event_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PeopleEventAssignment {
    pub id: DbId,
    pub parish_id: DbId,
    pub master_event_id: DbId,
    pub person_id: DbId,
    pub field_definition_id: DbId,
    pub notes: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// An assignment joined with its person and field definition, for list views
/// and the built-in field synthesizer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentWithPerson {
    pub id: DbId,
    pub master_event_id: DbId,
    pub person_id: DbId,
    pub field_definition_id: DbId,
    pub notes: Option<String>,
    /// `property_name` of the joined field definition (e.g. "presider").
    pub property_name: String,
    pub person_full_name: String,
    pub person_first_name: String,
    pub person_last_name: String,
    pub person_gender: Option<String>,
}

/// DTO for creating a new assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignment {
    pub master_event_id: DbId,
    pub person_id: DbId,
    pub field_definition_id: DbId,
    pub notes: Option<String>,
}
