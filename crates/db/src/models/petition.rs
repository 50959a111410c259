//! Petition (prayer of the faithful) model and DTOs.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `petitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Petition {
    pub id: DbId,
    pub parish_id: DbId,
    pub title: String,
    pub text: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new petition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePetition {
    pub title: String,
    pub text: String,
}
