//! Mass intention model and DTOs.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `mass_intentions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MassIntention {
    pub id: DbId,
    pub parish_id: DbId,
    pub master_event_id: Option<DbId>,
    pub offered_for: String,
    pub requested_by_id: Option<DbId>,
    pub note: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new mass intention.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMassIntention {
    pub offered_for: String,
    pub requested_by_id: Option<DbId>,
    pub note: Option<String>,
    pub master_event_id: Option<DbId>,
}
