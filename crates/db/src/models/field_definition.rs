//! Input field definition model and DTOs.

use sacristy_core::fields::FieldType;
use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `input_field_definitions` table.
///
/// `field_type` is stored as text so legacy rows with retired type names
/// keep loading; [`FieldDefinition::ty`] parses it on demand.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FieldDefinition {
    pub id: DbId,
    pub event_type_id: DbId,
    pub name: String,
    pub property_name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub list_id: Option<DbId>,
    pub is_key_person: bool,
    pub is_primary: bool,
    pub order: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FieldDefinition {
    /// Parse the stored type name. `None` for unknown (legacy) names.
    pub fn ty(&self) -> Option<FieldType> {
        FieldType::from_name(&self.field_type)
    }
}

/// DTO for creating a new field definition. Order is assigned automatically.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFieldDefinition {
    pub event_type_id: DbId,
    pub name: String,
    pub property_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    pub list_id: Option<DbId>,
    pub is_key_person: Option<bool>,
    pub is_primary: Option<bool>,
}

/// DTO for updating a field definition. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFieldDefinition {
    pub name: Option<String>,
    pub property_name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub required: Option<bool>,
    pub list_id: Option<DbId>,
    pub is_key_person: Option<bool>,
    pub is_primary: Option<bool>,
}
