//! Document (file attachment) model and DTOs.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub parish_id: DbId,
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for registering an uploaded document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
}
