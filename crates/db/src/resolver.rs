//! Field value resolution.
//!
//! The schema-driven pass walks an event type's field definitions against
//! the event's raw `field_values` and dereferences reference-typed values
//! against the matching entity table. Lookups are per-field and failures
//! are isolated: a bad reference is logged and left unresolved, it never
//! blocks the rest of the event's display.
//!
//! A second, fixed pass merges the built-in synthesized keys (`date`,
//! `time`, `presider`, `mass_intention`) that script templates rely on but
//! no field definition backs.

use sacristy_core::error::CoreError;
use sacristy_core::fields::{
    FieldType, FieldValue, FieldValues, ResolvedField, ResolvedFields, BUILTIN_DATE,
    BUILTIN_MASS_INTENTION, BUILTIN_PRESIDER, BUILTIN_TIME,
};
use sacristy_core::placeholders::{ParishInfo, PlaceholderKeyMap};
use sacristy_core::types::DbId;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::assignment::AssignmentWithPerson;
use crate::models::calendar_event::CalendarEvent;
use crate::models::field_definition::FieldDefinition;
use crate::models::mass_intention::MassIntention;
use crate::models::master_event::MasterEventWithRelations;
use crate::repositories::{
    AssignmentRepo, CalendarEventRepo, ContentRepo, CustomListRepo, DocumentRepo, EventTypeRepo,
    FieldDefinitionRepo, GroupRepo, LocationRepo, MassIntentionRepo, MasterEventRepo, ParishRepo,
    PersonRepo, PetitionRepo,
};

fn storage_error(action: &str, err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, action, "Event resolution storage error");
    CoreError::Internal(format!("Failed to {action}"))
}

/// Build the placeholder key map for an event type's definitions.
pub fn keymap(definitions: &[FieldDefinition]) -> PlaceholderKeyMap {
    PlaceholderKeyMap::from_pairs(
        definitions
            .iter()
            .map(|d| (d.name.clone(), d.property_name.clone())),
    )
}

/// Resolve an event's raw field values against its type's definitions.
/// Returns one entry per definition, keyed by `property_name`.
pub async fn resolve_fields(
    pool: &PgPool,
    parish_id: DbId,
    definitions: &[FieldDefinition],
    values: &FieldValues,
) -> ResolvedFields {
    let mut resolved = ResolvedFields::new();

    for def in definitions {
        let raw = values
            .get(&def.property_name)
            .filter(|v| !v.is_null())
            .cloned();
        let field_type = def.ty().unwrap_or(FieldType::Text);

        let mut entry = ResolvedField {
            field_name: def.name.clone(),
            field_type,
            raw_value: raw.clone(),
            resolved_value: None,
        };

        if let Some(ref raw) = raw {
            if field_type.is_dereferenceable() {
                match resolve_reference(pool, parish_id, field_type, raw).await {
                    Ok(value) => entry.resolved_value = value,
                    Err(err) => {
                        tracing::warn!(
                            field = %def.name,
                            error = %err,
                            "Field lookup failed; leaving unresolved"
                        );
                    }
                }
            }
        }

        resolved.insert(def.property_name.clone(), entry);
    }

    resolved
}

/// Dereference one raw value against the table its field type maps to.
///
/// This match is the single registration point for type-directed lookups:
/// adding a field type is one enum variant plus one arm here. Raw values
/// that are not UUID-shaped (legacy free text) resolve to `None`, as do
/// lookups that find no row.
async fn resolve_reference(
    pool: &PgPool,
    parish_id: DbId,
    field_type: FieldType,
    raw: &FieldValue,
) -> Result<Option<serde_json::Value>, sqlx::Error> {
    let Some(id) = raw.reference_id() else {
        return Ok(None);
    };

    let value = match field_type {
        FieldType::Person => to_json(PersonRepo::find_by_id(pool, parish_id, id).await?),
        FieldType::Group => to_json(GroupRepo::find_by_id(pool, parish_id, id).await?),
        FieldType::Location => to_json(LocationRepo::find_by_id(pool, parish_id, id).await?),
        FieldType::ListItem => to_json(CustomListRepo::find_item_by_id(pool, parish_id, id).await?),
        FieldType::Document => to_json(DocumentRepo::find_by_id(pool, parish_id, id).await?),
        FieldType::Content => to_json(ContentRepo::find_by_id(pool, parish_id, id).await?),
        FieldType::Petition => to_json(PetitionRepo::find_by_id(pool, parish_id, id).await?),
        _ => None,
    };
    Ok(value)
}

fn to_json<T: Serialize>(row: Option<T>) -> Option<serde_json::Value> {
    row.and_then(|r| serde_json::to_value(r).ok())
}

/// Merge the built-in synthesized entries into a resolved map. These use
/// fixed keys and may overwrite schema-driven entries under the same key.
pub fn synthesize_built_ins(
    resolved: &mut ResolvedFields,
    calendar_events: &[CalendarEvent],
    assignments: &[AssignmentWithPerson],
    intention: Option<&MassIntention>,
) {
    // `date`/`time` come from the primary displayed slot, falling back to
    // the first slot; omitted entirely when no slot has a start.
    let primary = calendar_events
        .iter()
        .find(|ce| ce.show_on_calendar)
        .or_else(|| calendar_events.first());

    if let Some(start) = primary.and_then(|ce| ce.start_datetime) {
        resolved.insert(
            BUILTIN_DATE.to_string(),
            ResolvedField {
                field_name: BUILTIN_DATE.to_string(),
                field_type: FieldType::Date,
                raw_value: Some(FieldValue::Text(start.format("%Y-%m-%d").to_string())),
                resolved_value: None,
            },
        );
        resolved.insert(
            BUILTIN_TIME.to_string(),
            ResolvedField {
                field_name: BUILTIN_TIME.to_string(),
                field_type: FieldType::Time,
                raw_value: Some(FieldValue::Text(start.format("%-I:%M %p").to_string())),
                resolved_value: None,
            },
        );
    }

    if let Some(presider) = assignments
        .iter()
        .find(|a| a.property_name == BUILTIN_PRESIDER)
    {
        let person = serde_json::json!({
            "id": presider.person_id,
            "full_name": presider.person_full_name,
            "first_name": presider.person_first_name,
            "last_name": presider.person_last_name,
            "gender": presider.person_gender,
        });
        resolved.insert(
            BUILTIN_PRESIDER.to_string(),
            ResolvedField {
                field_name: BUILTIN_PRESIDER.to_string(),
                field_type: FieldType::Person,
                raw_value: Some(FieldValue::from(presider.person_id)),
                resolved_value: Some(person),
            },
        );
    }

    if let Some(intention) = intention {
        resolved.insert(
            BUILTIN_MASS_INTENTION.to_string(),
            ResolvedField {
                field_name: BUILTIN_MASS_INTENTION.to_string(),
                field_type: FieldType::MassIntention,
                raw_value: Some(FieldValue::from(intention.id)),
                resolved_value: serde_json::to_value(intention).ok(),
            },
        );
    }
}

/// Load a master event with its schema, satellites, and resolved field map.
/// Returns `Ok(None)` when the event (or its event type) is absent or
/// outside the parish.
pub async fn load_event_with_relations(
    pool: &PgPool,
    parish_id: DbId,
    id: DbId,
) -> Result<Option<MasterEventWithRelations>, CoreError> {
    let Some(event) = MasterEventRepo::find_by_id(pool, parish_id, id)
        .await
        .map_err(|e| storage_error("load event", e))?
    else {
        return Ok(None);
    };

    let Some(event_type) = EventTypeRepo::find_by_id(pool, parish_id, event.event_type_id)
        .await
        .map_err(|e| storage_error("load event type", e))?
    else {
        return Ok(None);
    };

    let definitions = FieldDefinitionRepo::list_for_event_type(pool, event_type.id)
        .await
        .map_err(|e| storage_error("load field definitions", e))?;
    let calendar_events = CalendarEventRepo::list_for_event(pool, event.id)
        .await
        .map_err(|e| storage_error("load calendar events", e))?;
    let assignments = AssignmentRepo::list_for_event(pool, event.id)
        .await
        .map_err(|e| storage_error("load assignments", e))?;
    let intention = MassIntentionRepo::find_for_event(pool, event.id)
        .await
        .map_err(|e| storage_error("load mass intention", e))?;
    let parish = ParishRepo::find_by_id(pool, parish_id)
        .await
        .map_err(|e| storage_error("load parish", e))?
        .map(|p| ParishInfo::from(&p));

    let mut resolved = resolve_fields(pool, parish_id, &definitions, &event.field_values.0).await;
    synthesize_built_ins(&mut resolved, &calendar_events, &assignments, intention.as_ref());

    Ok(Some(MasterEventWithRelations {
        event,
        event_type,
        field_definitions: definitions,
        calendar_events,
        assignments,
        mass_intention: intention,
        resolved_fields: resolved,
        parish,
    }))
}
