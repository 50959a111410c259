//! Field definition store: guarded operations over input field definitions.
//!
//! Wraps [`FieldDefinitionRepo`] with the invariants the schema cannot
//! express on its own: flag/type cross-field rules, primary-calendar
//! uniqueness per event type, and the in-use delete guard. Storage failures
//! are logged with context and surfaced as generic domain errors.

use sacristy_core::error::CoreError;
use sacristy_core::fields::{self, FieldType};
use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::field_definition::{
    CreateFieldDefinition, FieldDefinition, UpdateFieldDefinition,
};
use crate::repositories::field_definition_repo::UsageCounts;
use crate::repositories::{CustomListRepo, FieldDefinitionRepo};

fn storage_error(action: &str, err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, action, "Field definition storage error");
    CoreError::Internal(format!("Failed to {action}"))
}

fn parse_type(name: &str) -> Result<FieldType, CoreError> {
    FieldType::from_name(name)
        .ok_or_else(|| CoreError::Validation(format!("Unknown field type '{name}'")))
}

/// Reject a new primary calendar-event definition when the event type
/// already has one. `exclude` drops the record being updated from the check.
async fn ensure_primary_available(
    pool: &PgPool,
    event_type_id: DbId,
    exclude: Option<DbId>,
) -> Result<(), CoreError> {
    let existing = FieldDefinitionRepo::find_primary_calendar(pool, event_type_id, exclude)
        .await
        .map_err(|e| storage_error("check primary calendar field", e))?;

    if let Some(existing) = existing {
        return Err(CoreError::Conflict(format!(
            "Only one calendar event field can be marked as primary; '{}' already is",
            existing.name
        )));
    }
    Ok(())
}

/// Create a definition at the end of the event type's ordering.
pub async fn create(
    pool: &PgPool,
    input: &CreateFieldDefinition,
) -> Result<FieldDefinition, CoreError> {
    fields::validate_field_name(&input.name)?;
    fields::validate_property_name(&input.property_name)?;
    let field_type = parse_type(&input.field_type)?;

    let is_key_person = input.is_key_person.unwrap_or(false);
    let is_primary = input.is_primary.unwrap_or(false);
    fields::validate_field_flags(field_type, is_key_person, is_primary)?;

    if is_primary {
        ensure_primary_available(pool, input.event_type_id, None).await?;
    }

    let created = FieldDefinitionRepo::create(pool, input)
        .await
        .map_err(|e| storage_error("create field definition", e))?;
    tracing::info!(id = %created.id, property_name = %created.property_name, "Field definition created");
    Ok(created)
}

/// Patch a definition. The flag rules are re-checked against the *effective*
/// type (the patched type if given, the stored one otherwise), and the
/// primary-uniqueness check excludes the record itself.
pub async fn update(
    pool: &PgPool,
    id: DbId,
    patch: &UpdateFieldDefinition,
) -> Result<FieldDefinition, CoreError> {
    let existing = FieldDefinitionRepo::find_by_id(pool, id)
        .await
        .map_err(|e| storage_error("load field definition", e))?
        .ok_or(CoreError::NotFound {
            entity: "FieldDefinition",
            id,
        })?;

    if let Some(ref name) = patch.name {
        fields::validate_field_name(name)?;
    }
    if let Some(ref property_name) = patch.property_name {
        fields::validate_property_name(property_name)?;
    }

    let effective_type = match patch.field_type {
        Some(ref name) => parse_type(name)?,
        None => parse_type(&existing.field_type)?,
    };
    let is_key_person = patch.is_key_person.unwrap_or(existing.is_key_person);
    let is_primary = patch.is_primary.unwrap_or(existing.is_primary);
    fields::validate_field_flags(effective_type, is_key_person, is_primary)?;

    if is_primary {
        ensure_primary_available(pool, existing.event_type_id, Some(id)).await?;
    }

    FieldDefinitionRepo::update(pool, id, patch)
        .await
        .map_err(|e| storage_error("update field definition", e))?
        .ok_or(CoreError::NotFound {
            entity: "FieldDefinition",
            id,
        })
}

/// Usage of a definition across events, assignments, and calendar slots.
pub async fn usage(pool: &PgPool, id: DbId) -> Result<UsageCounts, CoreError> {
    let def = FieldDefinitionRepo::find_by_id(pool, id)
        .await
        .map_err(|e| storage_error("load field definition", e))?
        .ok_or(CoreError::NotFound {
            entity: "FieldDefinition",
            id,
        })?;

    FieldDefinitionRepo::usage_counts(pool, def.event_type_id, &def.property_name, def.id)
        .await
        .map_err(|e| storage_error("count field usage", e))
}

/// Hard-delete a definition, unless any event, assignment, or calendar slot
/// still references it.
pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), CoreError> {
    let def = FieldDefinitionRepo::find_by_id(pool, id)
        .await
        .map_err(|e| storage_error("load field definition", e))?
        .ok_or(CoreError::NotFound {
            entity: "FieldDefinition",
            id,
        })?;

    let usage = FieldDefinitionRepo::usage_counts(pool, def.event_type_id, &def.property_name, def.id)
        .await
        .map_err(|e| storage_error("count field usage", e))?;

    if usage.total() > 0 {
        return Err(CoreError::Conflict(format!(
            "Cannot delete field '{}': it is in use by {} record(s)",
            def.name,
            usage.total()
        )));
    }

    FieldDefinitionRepo::delete(pool, id)
        .await
        .map_err(|e| storage_error("delete field definition", e))?;
    tracing::info!(%id, property_name = %def.property_name, "Field definition deleted");
    Ok(())
}

/// Soft-delete a custom list, unless a live field definition still
/// references it as its option source.
pub async fn delete_custom_list(
    pool: &PgPool,
    parish_id: DbId,
    list_id: DbId,
) -> Result<(), CoreError> {
    let list = CustomListRepo::find_by_id(pool, parish_id, list_id)
        .await
        .map_err(|e| storage_error("load custom list", e))?
        .ok_or(CoreError::NotFound {
            entity: "CustomList",
            id: list_id,
        })?;

    let references = CustomListRepo::field_definition_count(pool, list_id)
        .await
        .map_err(|e| storage_error("count list references", e))?;
    if references > 0 {
        return Err(CoreError::Conflict(format!(
            "Cannot delete list '{}': {references} field definition(s) still use it",
            list.name
        )));
    }

    CustomListRepo::soft_delete(pool, parish_id, list_id)
        .await
        .map_err(|e| storage_error("delete custom list", e))?;
    Ok(())
}

/// Assign `order = index` for each id in the given sequence. Best-effort:
/// an update that fails is logged and skipped, the rest still apply.
pub async fn reorder(
    pool: &PgPool,
    event_type_id: DbId,
    ordered_ids: &[DbId],
) -> Result<(), CoreError> {
    for (index, id) in ordered_ids.iter().enumerate() {
        if let Err(err) = FieldDefinitionRepo::set_order(pool, event_type_id, *id, index as i32).await
        {
            tracing::warn!(error = %err, %id, "Failed to reorder field definition; continuing");
        }
    }
    Ok(())
}
