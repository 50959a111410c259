//! Event preset model and DTOs.

use sacristy_core::preset::PresetData;
use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `event_presets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventPreset {
    pub id: DbId,
    pub parish_id: DbId,
    pub event_type_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub preset_data: Json<PresetData>,
    pub created_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A preset row joined with the owning event type's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventPresetWithEventType {
    pub id: DbId,
    pub parish_id: DbId,
    pub event_type_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub preset_data: Json<PresetData>,
    pub created_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub event_type_name: String,
}

/// DTO for relabeling a preset. `preset_data` is immutable by design and
/// deliberately has no field here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventPreset {
    pub name: Option<String>,
    pub description: Option<String>,
}
