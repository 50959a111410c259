//! Repository for the `scripts` and `sections` tables.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::script::{
    CreateScript, CreateSection, Script, Section, UpdateScript, UpdateSection,
};

const SCRIPT_COLUMNS: &str = "id, event_type_id, name, description, \"order\", \
                              deleted_at, created_at, updated_at";
const SECTION_COLUMNS: &str = "id, script_id, name, content, page_break_after, \"order\", \
                               deleted_at, created_at, updated_at";

/// Provides CRUD operations for scripts and their sections.
pub struct ScriptRepo;

impl ScriptRepo {
    /// Insert a new script at the end of the event type's ordering.
    pub async fn create(pool: &PgPool, input: &CreateScript) -> Result<Script, sqlx::Error> {
        let query = format!(
            "INSERT INTO scripts (event_type_id, name, description, \"order\")
             VALUES ($1, $2, $3,
                 (SELECT COALESCE(MAX(\"order\") + 1, 0) FROM scripts
                  WHERE event_type_id = $1 AND deleted_at IS NULL))
             RETURNING {SCRIPT_COLUMNS}"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(input.event_type_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a script by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Script>, sqlx::Error> {
        let query = format!(
            "SELECT {SCRIPT_COLUMNS} FROM scripts WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an event type's scripts in display order.
    pub async fn list_for_event_type(
        pool: &PgPool,
        event_type_id: DbId,
    ) -> Result<Vec<Script>, sqlx::Error> {
        let query = format!(
            "SELECT {SCRIPT_COLUMNS} FROM scripts
             WHERE event_type_id = $1 AND deleted_at IS NULL
             ORDER BY \"order\" ASC"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(event_type_id)
            .fetch_all(pool)
            .await
    }

    /// Update a script. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScript,
    ) -> Result<Option<Script>, sqlx::Error> {
        let query = format!(
            "UPDATE scripts SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {SCRIPT_COLUMNS}"
        );
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a script; its sections cascade. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scripts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign an explicit display order to one script.
    pub async fn set_order(
        pool: &PgPool,
        event_type_id: DbId,
        id: DbId,
        order: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scripts SET \"order\" = $3
             WHERE id = $1 AND event_type_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(event_type_id)
        .bind(order)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Sections ----------------------------------------------------------

    /// Insert a new section at the end of the script's ordering.
    pub async fn create_section(
        pool: &PgPool,
        script_id: DbId,
        input: &CreateSection,
    ) -> Result<Section, sqlx::Error> {
        let query = format!(
            "INSERT INTO sections (script_id, name, content, page_break_after, \"order\")
             VALUES ($1, $2, $3, COALESCE($4, false),
                 (SELECT COALESCE(MAX(\"order\") + 1, 0) FROM sections
                  WHERE script_id = $1 AND deleted_at IS NULL))
             RETURNING {SECTION_COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(script_id)
            .bind(&input.name)
            .bind(&input.content)
            .bind(input.page_break_after)
            .fetch_one(pool)
            .await
    }

    /// List a script's sections in display order.
    pub async fn list_sections(
        pool: &PgPool,
        script_id: DbId,
    ) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {SECTION_COLUMNS} FROM sections
             WHERE script_id = $1 AND deleted_at IS NULL
             ORDER BY \"order\" ASC"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(script_id)
            .fetch_all(pool)
            .await
    }

    /// Update a section. Only non-`None` fields are applied.
    pub async fn update_section(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "UPDATE sections SET
                name = COALESCE($2, name),
                content = COALESCE($3, content),
                page_break_after = COALESCE($4, page_break_after)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {SECTION_COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.content)
            .bind(input.page_break_after)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a section. Returns `true` if a row was removed.
    pub async fn delete_section(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
