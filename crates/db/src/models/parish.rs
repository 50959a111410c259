//! Parish (tenant) model.

use sacristy_core::placeholders::ParishInfo;
use sacristy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `parishes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Parish {
    pub id: DbId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Parish> for ParishInfo {
    fn from(parish: &Parish) -> Self {
        ParishInfo {
            name: parish.name.clone(),
            city: parish.city.clone(),
            state: parish.state.clone(),
        }
    }
}
