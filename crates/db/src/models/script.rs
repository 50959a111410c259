//! Script and section models and DTOs.
//!
//! A script is an ordered collection of sections per event type; sections
//! carry HTML content with `{{...}}` placeholders.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scripts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Script {
    pub id: DbId,
    pub event_type_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub order: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub script_id: DbId,
    pub name: String,
    pub content: String,
    pub page_break_after: bool,
    pub order: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A script together with its ordered sections.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptWithSections {
    #[serde(flatten)]
    pub script: Script,
    pub sections: Vec<Section>,
}

/// DTO for creating a new script. Order is assigned automatically.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScript {
    pub event_type_id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a script. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScript {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// DTO for creating a new section. Order is assigned automatically.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSection {
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub page_break_after: Option<bool>,
}

/// DTO for updating a section. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSection {
    pub name: Option<String>,
    pub content: Option<String>,
    pub page_break_after: Option<bool>,
}
