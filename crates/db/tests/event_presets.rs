//! Integration tests for preset materialization.
//!
//! Verifies that preset snapshots carry raw field values and calendar shape
//! only (never absolute datetimes), that relabeling leaves `preset_data`
//! byte-identical, and that applying a preset seeds a fresh event.

use assert_matches::assert_matches;
use sacristy_core::error::CoreError;
use sacristy_core::fields::{FieldValue, FieldValues};
use sacristy_core::types::DbId;
use sacristy_db::models::calendar_event::CreateCalendarEvent;
use sacristy_db::models::event_preset::UpdateEventPreset;
use sacristy_db::models::event_type::{CreateEventType, EventType};
use sacristy_db::models::field_definition::CreateFieldDefinition;
use sacristy_db::models::location::CreateLocation;
use sacristy_db::models::master_event::{CreateMasterEvent, MasterEvent};
use sacristy_db::models::parish::Parish;
use sacristy_db::presets;
use sacristy_db::repositories::{
    CalendarEventRepo, EventPresetRepo, EventTypeRepo, FieldDefinitionRepo, LocationRepo,
    MasterEventRepo, ParishRepo,
};
use sacristy_core::types::Timestamp;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(s: &str) -> Timestamp {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .expect("valid test timestamp")
        .and_utc()
}

async fn seed_parish(pool: &PgPool) -> Parish {
    ParishRepo::create(pool, "St. Mary", "Austin", "TX")
        .await
        .expect("parish creation should succeed")
}

async fn seed_event_type(pool: &PgPool, parish_id: DbId) -> EventType {
    EventTypeRepo::create(
        pool,
        parish_id,
        &CreateEventType {
            name: "Retreat".to_string(),
            slug: None,
            description: None,
            system_type: Some("event".to_string()),
        },
    )
    .await
    .expect("event type creation should succeed")
}

fn new_field(event_type_id: DbId, name: &str, property: &str, ty: &str) -> CreateFieldDefinition {
    CreateFieldDefinition {
        event_type_id,
        name: name.to_string(),
        property_name: property.to_string(),
        field_type: ty.to_string(),
        required: false,
        list_id: None,
        is_key_person: None,
        is_primary: None,
    }
}

async fn seed_event(pool: &PgPool, parish_id: DbId, event_type_id: DbId, values: FieldValues) -> MasterEvent {
    MasterEventRepo::create(
        pool,
        parish_id,
        &CreateMasterEvent {
            event_type_id,
            field_values: Some(values),
            status: None,
        },
    )
    .await
    .expect("event creation should succeed")
}

async fn raw_preset_data(pool: &PgPool, preset_id: DbId) -> String {
    sqlx::query_scalar("SELECT preset_data::text FROM event_presets WHERE id = $1")
        .bind(preset_id)
        .fetch_one(pool)
        .await
        .expect("preset row should exist")
}

// ---------------------------------------------------------------------------
// Test: snapshots keep shape, never absolute datetimes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_all_day_span_snapshots_duration_not_dates(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;

    let days_def = FieldDefinitionRepo::create(&pool, &{
        let mut f = new_field(et.id, "Retreat Days", "retreat_days", "calendar_event");
        f.is_primary = Some(true);
        f
    })
    .await
    .unwrap();

    let hall = LocationRepo::create(
        &pool,
        parish.id,
        &CreateLocation {
            name: "Parish Hall".to_string(),
            address: None,
        },
    )
    .await
    .unwrap();

    let mut values = FieldValues::new();
    values.insert("theme", FieldValue::from("Renewal"));
    let event = seed_event(&pool, parish.id, et.id, values).await;

    CalendarEventRepo::create(
        &pool,
        parish.id,
        &CreateCalendarEvent {
            master_event_id: event.id,
            field_definition_id: Some(days_def.id),
            start_datetime: Some(ts("2025-03-01T00:00:00")),
            end_datetime: Some(ts("2025-03-04T00:00:00")),
            location_id: Some(hall.id),
            is_all_day: Some(true),
            show_on_calendar: Some(true),
        },
    )
    .await
    .unwrap();

    let preset = presets::create_from_event(&pool, parish.id, event.id, "Spring Retreat", None, None)
        .await
        .unwrap();

    let shape = &preset.preset_data.0.calendar_events["Retreat Days"];
    assert!(shape.is_all_day);
    assert_eq!(shape.duration_days, Some(3));
    assert_eq!(shape.location_id, Some(hall.id));

    // No date or time survives anywhere in the stored payload.
    let raw = raw_preset_data(&pool, preset.id).await;
    assert!(!raw.contains("2025"), "preset_data must not contain dates: {raw}");
    assert!(!raw.contains("datetime"), "preset_data must not contain datetimes: {raw}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_timed_slot_has_null_duration(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;

    let ceremony_def = FieldDefinitionRepo::create(&pool, &{
        let mut f = new_field(et.id, "Ceremony", "ceremony", "calendar_event");
        f.is_primary = Some(true);
        f
    })
    .await
    .unwrap();

    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;
    CalendarEventRepo::create(
        &pool,
        parish.id,
        &CreateCalendarEvent {
            master_event_id: event.id,
            field_definition_id: Some(ceremony_def.id),
            start_datetime: Some(ts("2025-06-14T15:30:00")),
            end_datetime: Some(ts("2025-06-14T16:30:00")),
            location_id: None,
            is_all_day: Some(false),
            show_on_calendar: Some(true),
        },
    )
    .await
    .unwrap();

    let preset = presets::create_from_event(&pool, parish.id, event.id, "Saturday Wedding", None, None)
        .await
        .unwrap();
    assert_eq!(preset.preset_data.0.calendar_events["Ceremony"].duration_days, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_snapshot_copies_raw_field_values(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;
    FieldDefinitionRepo::create(&pool, &new_field(et.id, "Theme", "theme", "text"))
        .await
        .unwrap();

    let reference = Uuid::new_v4();
    let mut values = FieldValues::new();
    values.insert("theme", FieldValue::from("Renewal"));
    values.insert("speaker", FieldValue::from(reference));
    let event = seed_event(&pool, parish.id, et.id, values.clone()).await;

    let preset = presets::create_from_event(&pool, parish.id, event.id, "Template", None, None)
        .await
        .unwrap();

    // Raw ids and scalars are mirrored verbatim; nothing resolved is stored.
    assert_eq!(preset.preset_data.0.field_values, values);
    let raw = raw_preset_data(&pool, preset.id).await;
    assert!(!raw.contains("resolved"));
}

// ---------------------------------------------------------------------------
// Test: preset immutability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_relabel_leaves_preset_data_byte_identical(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;

    let mut values = FieldValues::new();
    values.insert("theme", FieldValue::from("Renewal"));
    let event = seed_event(&pool, parish.id, et.id, values).await;

    let preset = presets::create_from_event(&pool, parish.id, event.id, "Before", None, None)
        .await
        .unwrap();
    let before = raw_preset_data(&pool, preset.id).await;

    let relabeled = presets::relabel(
        &pool,
        parish.id,
        preset.id,
        &UpdateEventPreset {
            name: Some("After".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(relabeled.name, "After");

    let after = raw_preset_data(&pool, preset.id).await;
    assert_eq!(before, after, "preset_data must be untouched by relabeling");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_relabel_rejects_empty_name(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;
    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;
    let preset = presets::create_from_event(&pool, parish.id, event.id, "Keep", None, None)
        .await
        .unwrap();

    let err = presets::relabel(
        &pool,
        parish.id,
        preset.id,
        &UpdateEventPreset {
            name: Some(String::new()),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
}

// ---------------------------------------------------------------------------
// Test: applying a preset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_apply_seeds_a_new_event(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;

    let mut values = FieldValues::new();
    values.insert("theme", FieldValue::from("Renewal"));
    let event = seed_event(&pool, parish.id, et.id, values.clone()).await;
    let preset = presets::create_from_event(&pool, parish.id, event.id, "Template", None, None)
        .await
        .unwrap();

    let seeded = presets::apply(&pool, parish.id, preset.id).await.unwrap();
    assert_ne!(seeded.id, event.id);
    assert_eq!(seeded.event_type_id, et.id);
    assert_eq!(seeded.field_values.0, values);
    assert_eq!(seeded.status, "PLANNING");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_from_missing_event_is_not_found(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let err = presets::create_from_event(&pool, parish.id, Uuid::new_v4(), "X", None, None)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "MasterEvent", .. });
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_presets_are_tenant_scoped(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let other = ParishRepo::create(&pool, "St. Jude", "Dallas", "TX")
        .await
        .unwrap();
    let et = seed_event_type(&pool, parish.id).await;
    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;
    let preset = presets::create_from_event(&pool, parish.id, event.id, "Mine", None, None)
        .await
        .unwrap();

    assert!(EventPresetRepo::find_by_id(&pool, other.id, preset.id)
        .await
        .unwrap()
        .is_none());
}
