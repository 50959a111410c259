//! Integration tests for soft-delete behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted rows are hidden from `find_by_id` and list queries
//! - Soft-delete is idempotent (second call returns `false`)
//! - Soft-deleted list items are not dereferenced by the resolver
//! - Soft-deleted events stop counting toward field-usage guards

use sacristy_core::fields::{FieldValue, FieldValues};
use sacristy_core::types::DbId;
use sacristy_db::definitions;
use sacristy_db::models::custom_list::{CreateCustomList, CreateCustomListItem};
use sacristy_db::models::event_type::{CreateEventType, EventType};
use sacristy_db::models::field_definition::CreateFieldDefinition;
use sacristy_db::models::master_event::{CreateMasterEvent, MasterEvent};
use sacristy_db::models::parish::Parish;
use sacristy_db::presets;
use sacristy_db::repositories::{
    CustomListRepo, EventPresetRepo, EventTypeRepo, FieldDefinitionRepo, MasterEventRepo,
    ParishRepo,
};
use sacristy_db::resolver;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

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
            name: "Mass".to_string(),
            slug: None,
            description: None,
            system_type: Some("mass-liturgy".to_string()),
        },
    )
    .await
    .expect("event type creation should succeed")
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

// ---------------------------------------------------------------------------
// Master events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_deleted_event_hidden_from_find_by_id(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;
    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;

    let deleted = MasterEventRepo::soft_delete(&pool, parish.id, event.id)
        .await
        .unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    let found = MasterEventRepo::find_by_id(&pool, parish.id, event.id)
        .await
        .unwrap();
    assert!(found.is_none(), "find_by_id should hide soft-deleted events");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;
    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;

    assert!(MasterEventRepo::soft_delete(&pool, parish.id, event.id).await.unwrap());
    assert!(
        !MasterEventRepo::soft_delete(&pool, parish.id, event.id).await.unwrap(),
        "second soft_delete should report no row marked"
    );
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_deleted_preset_hidden_from_list(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;
    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;

    let keep = presets::create_from_event(&pool, parish.id, event.id, "Keep", None, None)
        .await
        .unwrap();
    let drop = presets::create_from_event(&pool, parish.id, event.id, "Drop", None, None)
        .await
        .unwrap();

    assert!(EventPresetRepo::soft_delete(&pool, parish.id, drop.id).await.unwrap());

    let listed = EventPresetRepo::list(&pool, parish.id).await.unwrap();
    let ids: Vec<DbId> = listed.iter().map(|p| p.id).collect();
    assert!(ids.contains(&keep.id));
    assert!(!ids.contains(&drop.id));
}

// ---------------------------------------------------------------------------
// Resolver interaction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_deleted_list_item_is_not_resolved(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;

    let list = CustomListRepo::create(
        &pool,
        parish.id,
        &CreateCustomList {
            name: "Hymns".to_string(),
            slug: "hymns".to_string(),
        },
    )
    .await
    .unwrap();
    let item = CustomListRepo::create_item(
        &pool,
        list.id,
        &CreateCustomListItem {
            value: "Ave Maria".to_string(),
        },
    )
    .await
    .unwrap();

    FieldDefinitionRepo::create(
        &pool,
        &CreateFieldDefinition {
            event_type_id: et.id,
            name: "Hymn".to_string(),
            property_name: "hymn".to_string(),
            field_type: "list_item".to_string(),
            required: false,
            list_id: Some(list.id),
            is_key_person: None,
            is_primary: None,
        },
    )
    .await
    .unwrap();

    let mut values = FieldValues::new();
    values.insert("hymn", FieldValue::from(item.id));
    let event = seed_event(&pool, parish.id, et.id, values).await;

    // Resolves while the item is live.
    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();
    assert!(loaded.resolved_fields["hymn"].resolved_value.is_some());

    // Stops resolving once the item is soft-deleted; the entry remains.
    CustomListRepo::soft_delete_item(&pool, item.id).await.unwrap();
    let reloaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();
    let field = &reloaded.resolved_fields["hymn"];
    assert!(field.resolved_value.is_none());
    assert!(field.raw_value.is_some());
}

// ---------------------------------------------------------------------------
// Usage-guard interaction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_deleted_event_stops_counting_toward_usage(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id).await;

    let field = definitions::create(
        &pool,
        &CreateFieldDefinition {
            event_type_id: et.id,
            name: "Notes".to_string(),
            property_name: "notes".to_string(),
            field_type: "text".to_string(),
            required: false,
            list_id: None,
            is_key_person: None,
            is_primary: None,
        },
    )
    .await
    .unwrap();

    let mut values = FieldValues::new();
    values.insert("notes", FieldValue::from("candles"));
    let event = seed_event(&pool, parish.id, et.id, values).await;

    assert!(definitions::delete(&pool, field.id).await.is_err());

    MasterEventRepo::soft_delete(&pool, parish.id, event.id)
        .await
        .unwrap();
    definitions::delete(&pool, field.id).await.unwrap();
}
