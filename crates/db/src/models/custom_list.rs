//! Custom list and list item models and DTOs.
//!
//! A custom list is a parish-defined option set (e.g. "Wedding Songs");
//! `list_item`-typed fields reference one of its items.

use sacristy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `custom_lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomList {
    pub id: DbId,
    pub parish_id: DbId,
    pub name: String,
    pub slug: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `custom_list_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomListItem {
    pub id: DbId,
    pub list_id: DbId,
    pub value: String,
    pub order: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new custom list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomList {
    pub name: String,
    pub slug: String,
}

/// DTO for creating a new list item. Order is assigned automatically.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomListItem {
    pub value: String,
}
