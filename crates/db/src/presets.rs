//! Preset materialization: snapshot a live event into a reusable preset,
//! and seed a new event from one.
//!
//! A preset stores raw field values only (entities are re-resolved against
//! current data when the preset is used) and per-calendar-field shape
//! (location, all-day flag, day span) keyed by the field's human `name` --
//! the same label convention script placeholders use. Absolute datetimes
//! never enter `preset_data`.

use sacristy_core::error::CoreError;
use sacristy_core::preset::{self, CalendarShapeInput, PresetData};
use sacristy_core::types::DbId;
use sqlx::PgPool;

use crate::models::event_preset::{EventPreset, UpdateEventPreset};
use crate::models::master_event::{CreateMasterEvent, MasterEvent};
use crate::repositories::{EventPresetRepo, MasterEventRepo};
use crate::resolver;

fn storage_error(action: &str, err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, action, "Preset storage error");
    CoreError::Internal(format!("Failed to {action}"))
}

/// Snapshot a live master event into a new preset.
pub async fn create_from_event(
    pool: &PgPool,
    parish_id: DbId,
    master_event_id: DbId,
    name: &str,
    description: Option<&str>,
    created_by: Option<DbId>,
) -> Result<EventPreset, CoreError> {
    preset::validate_preset_name(name)?;
    if let Some(description) = description {
        preset::validate_preset_description(description)?;
    }

    let event = resolver::load_event_with_relations(pool, parish_id, master_event_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MasterEvent",
            id: master_event_id,
        })?;

    // Calendar slots are keyed by their definition's human name; slots not
    // tied to a definition have no stable key and are skipped.
    let slots: Vec<CalendarShapeInput> = event
        .calendar_events
        .iter()
        .filter_map(|ce| {
            let def = event
                .field_definitions
                .iter()
                .find(|d| Some(d.id) == ce.field_definition_id)?;
            Some(CalendarShapeInput {
                field_name: def.name.clone(),
                location_id: ce.location_id,
                is_all_day: ce.is_all_day,
                start: ce.start_datetime,
                end: ce.end_datetime,
            })
        })
        .collect();

    let data = PresetData::from_event_parts(event.event.field_values.0.clone(), slots);

    let created = EventPresetRepo::create(
        pool,
        parish_id,
        event.event.event_type_id,
        name,
        description,
        &data,
        created_by,
    )
    .await
    .map_err(|e| storage_error("create preset", e))?;

    tracing::info!(id = %created.id, name = %created.name, "Preset created from event");
    Ok(created)
}

/// Relabel a preset. `preset_data` is an immutable snapshot; only name and
/// description can change.
pub async fn relabel(
    pool: &PgPool,
    parish_id: DbId,
    id: DbId,
    input: &UpdateEventPreset,
) -> Result<EventPreset, CoreError> {
    if let Some(ref name) = input.name {
        preset::validate_preset_name(name)?;
    }
    if let Some(ref description) = input.description {
        preset::validate_preset_description(description)?;
    }

    EventPresetRepo::update_label(pool, parish_id, id, input)
        .await
        .map_err(|e| storage_error("update preset", e))?
        .ok_or(CoreError::NotFound {
            entity: "EventPreset",
            id,
        })
}

/// Create a new master event seeded from a preset: field values are copied
/// verbatim and re-resolve against current data; calendar slots must be
/// scheduled by the caller with concrete dates afterwards.
pub async fn apply(
    pool: &PgPool,
    parish_id: DbId,
    preset_id: DbId,
) -> Result<MasterEvent, CoreError> {
    let preset = EventPresetRepo::find_by_id(pool, parish_id, preset_id)
        .await
        .map_err(|e| storage_error("load preset", e))?
        .ok_or(CoreError::NotFound {
            entity: "EventPreset",
            id: preset_id,
        })?;

    let input = CreateMasterEvent {
        event_type_id: preset.event_type_id,
        field_values: Some(preset.preset_data.0.field_values.clone()),
        status: None,
    };

    let created = MasterEventRepo::create(pool, parish_id, &input)
        .await
        .map_err(|e| storage_error("create event from preset", e))?;

    tracing::info!(preset_id = %preset.id, event_id = %created.id, "Preset applied");
    Ok(created)
}
