//! Repository for the `custom_lists` and `custom_list_items` tables.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::custom_list::{
    CreateCustomList, CreateCustomListItem, CustomList, CustomListItem,
};

const LIST_COLUMNS: &str = "id, parish_id, name, slug, deleted_at, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, list_id, value, \"order\", deleted_at, created_at";

/// Provides CRUD operations for custom lists and their items.
pub struct CustomListRepo;

impl CustomListRepo {
    /// Insert a new custom list, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreateCustomList,
    ) -> Result<CustomList, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_lists (parish_id, name, slug)
             VALUES ($1, $2, $3)
             RETURNING {LIST_COLUMNS}"
        );
        sqlx::query_as::<_, CustomList>(&query)
            .bind(parish_id)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find a custom list by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<CustomList>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM custom_lists
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, CustomList>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// Count non-deleted field definitions that reference this list.
    /// Used as a delete guard.
    pub async fn field_definition_count(pool: &PgPool, list_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM input_field_definitions
             WHERE list_id = $1 AND deleted_at IS NULL",
        )
        .bind(list_id)
        .fetch_one(pool)
        .await
    }

    /// Soft-delete a custom list. Returns `true` if a row was marked.
    pub async fn soft_delete(pool: &PgPool, parish_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE custom_lists SET deleted_at = now()
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(parish_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert a new list item at the end of the list's ordering.
    pub async fn create_item(
        pool: &PgPool,
        list_id: DbId,
        input: &CreateCustomListItem,
    ) -> Result<CustomListItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_list_items (list_id, value, \"order\")
             VALUES ($1, $2,
                 (SELECT COALESCE(MAX(\"order\") + 1, 0) FROM custom_list_items
                  WHERE list_id = $1 AND deleted_at IS NULL))
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CustomListItem>(&query)
            .bind(list_id)
            .bind(&input.value)
            .fetch_one(pool)
            .await
    }

    /// Find a list item by ID, scoped to a parish through its owning list.
    pub async fn find_item_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<CustomListItem>, sqlx::Error> {
        sqlx::query_as::<_, CustomListItem>(
            "SELECT i.id, i.list_id, i.value, i.\"order\", i.deleted_at, i.created_at
             FROM custom_list_items i
             JOIN custom_lists l ON l.id = i.list_id
             WHERE i.id = $1 AND l.parish_id = $2
               AND i.deleted_at IS NULL AND l.deleted_at IS NULL",
        )
        .bind(id)
        .bind(parish_id)
        .fetch_optional(pool)
        .await
    }

    /// List the items of a list in display order.
    pub async fn list_items(
        pool: &PgPool,
        list_id: DbId,
    ) -> Result<Vec<CustomListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM custom_list_items
             WHERE list_id = $1 AND deleted_at IS NULL
             ORDER BY \"order\" ASC"
        );
        sqlx::query_as::<_, CustomListItem>(&query)
            .bind(list_id)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a list item. Returns `true` if a row was marked.
    pub async fn soft_delete_item(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE custom_list_items SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
