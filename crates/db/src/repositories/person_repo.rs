//! Repository for the `people` table.

use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::person::{CreatePerson, Person};

const COLUMNS: &str = "id, parish_id, full_name, first_name, last_name, email, phone, gender, \
                       deleted_at, created_at, updated_at";

/// Provides CRUD operations for people.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new person, returning the created row.
    pub async fn create(
        pool: &PgPool,
        parish_id: DbId,
        input: &CreatePerson,
    ) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO people (parish_id, full_name, first_name, last_name, email, phone, gender)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(parish_id)
            .bind(&input.full_name)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.gender)
            .fetch_one(pool)
            .await
    }

    /// Find a person by ID within a parish.
    pub async fn find_by_id(
        pool: &PgPool,
        parish_id: DbId,
        id: DbId,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM people
             WHERE id = $1 AND parish_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(parish_id)
            .fetch_optional(pool)
            .await
    }

    /// List all people in a parish ordered by name.
    pub async fn list(pool: &PgPool, parish_id: DbId) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM people
             WHERE parish_id = $1 AND deleted_at IS NULL
             ORDER BY full_name ASC"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(parish_id)
            .fetch_all(pool)
            .await
    }
}
