//! Location model and DTOs.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub parish_id: DbId,
    pub name: String,
    pub address: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new location.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocation {
    pub name: String,
    pub address: Option<String>,
}
