//! Content library model and DTOs (readings, hymns, blessings).

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `contents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Content {
    pub id: DbId,
    pub parish_id: DbId,
    pub title: String,
    pub body: String,
    pub language: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new content entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContent {
    pub title: String,
    pub body: String,
    pub language: Option<String>,
}
