//! Event type model and DTOs.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// System type grouping mass liturgies apart from other occasions.
pub const SYSTEM_TYPE_MASS_LITURGY: &str = "mass-liturgy";
/// System type for sacramental liturgies (weddings, funerals, baptisms...).
pub const SYSTEM_TYPE_SPECIAL_LITURGY: &str = "special-liturgy";
/// System type for everything else (meetings, socials).
pub const SYSTEM_TYPE_EVENT: &str = "event";

/// All valid system type values.
pub const VALID_SYSTEM_TYPES: &[&str] = &[
    SYSTEM_TYPE_MASS_LITURGY,
    SYSTEM_TYPE_SPECIAL_LITURGY,
    SYSTEM_TYPE_EVENT,
];

/// A row from the `event_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventType {
    pub id: DbId,
    pub parish_id: DbId,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub system_type: String,
    pub order: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new event type. Order is assigned automatically.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventType {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub system_type: Option<String>,
}

/// DTO for updating an event type. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEventType {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub system_type: Option<String>,
}
