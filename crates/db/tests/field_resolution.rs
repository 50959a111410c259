//! Integration tests for the field value resolver and built-in synthesizer.
//!
//! Exercises the engine against a real database to verify that:
//! - Each reference-typed field dereferences against exactly its table
//! - Content fields only dereference UUID-shaped values
//! - A bad reference never blocks the rest of the resolution pass
//! - Built-in `date`/`time`/`presider`/`mass_intention` keys are merged
//! - Tenant isolation holds for resolver lookups

use sacristy_core::fields::{FieldValue, FieldValues};
use sacristy_core::types::DbId;
use sacristy_db::models::assignment::CreateAssignment;
use sacristy_db::models::calendar_event::CreateCalendarEvent;
use sacristy_db::models::content::CreateContent;
use sacristy_db::models::custom_list::{CreateCustomList, CreateCustomListItem};
use sacristy_db::models::document::CreateDocument;
use sacristy_db::models::event_type::{CreateEventType, EventType};
use sacristy_db::models::field_definition::CreateFieldDefinition;
use sacristy_db::models::group::CreateGroup;
use sacristy_db::models::location::CreateLocation;
use sacristy_db::models::mass_intention::CreateMassIntention;
use sacristy_db::models::master_event::{CreateMasterEvent, MasterEvent};
use sacristy_db::models::parish::Parish;
use sacristy_db::models::person::CreatePerson;
use sacristy_db::models::petition::CreatePetition;
use sacristy_db::repositories::{
    AssignmentRepo, CalendarEventRepo, ContentRepo, CustomListRepo, DocumentRepo, EventTypeRepo,
    FieldDefinitionRepo, GroupRepo, LocationRepo, MassIntentionRepo, MasterEventRepo, ParishRepo,
    PersonRepo, PetitionRepo,
};
use sacristy_db::resolver;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_parish(pool: &PgPool) -> Parish {
    ParishRepo::create(pool, "St. Mary", "Austin", "TX")
        .await
        .expect("parish creation should succeed")
}

async fn seed_event_type(pool: &PgPool, parish_id: DbId, name: &str) -> EventType {
    EventTypeRepo::create(
        pool,
        parish_id,
        &CreateEventType {
            name: name.to_string(),
            slug: None,
            description: None,
            system_type: Some("mass-liturgy".to_string()),
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

fn person(full_name: &str) -> CreatePerson {
    CreatePerson {
        full_name: full_name.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        email: None,
        phone: None,
        gender: None,
    }
}

// ---------------------------------------------------------------------------
// Test: field-type dispatch hits exactly the matching table
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolves_each_reference_type(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id, "Mass").await;

    let reader = PersonRepo::create(&pool, parish.id, &person("Maria Gonzalez"))
        .await
        .unwrap();
    let choir = GroupRepo::create(
        &pool,
        parish.id,
        &CreateGroup {
            name: "Adult Choir".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let chapel = LocationRepo::create(
        &pool,
        parish.id,
        &CreateLocation {
            name: "Main Chapel".to_string(),
            address: None,
        },
    )
    .await
    .unwrap();
    let list = CustomListRepo::create(
        &pool,
        parish.id,
        &CreateCustomList {
            name: "Wedding Songs".to_string(),
            slug: "wedding-songs".to_string(),
        },
    )
    .await
    .unwrap();
    let song = CustomListRepo::create_item(
        &pool,
        list.id,
        &CreateCustomListItem {
            value: "Ave Maria".to_string(),
        },
    )
    .await
    .unwrap();
    let worship_aid = DocumentRepo::create(
        &pool,
        parish.id,
        &CreateDocument {
            file_name: "program.pdf".to_string(),
            file_path: "docs/program.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 1024,
        },
    )
    .await
    .unwrap();
    let hymn = ContentRepo::create(
        &pool,
        parish.id,
        &CreateContent {
            title: "Here I Am, Lord".to_string(),
            body: "Here I am, Lord...".to_string(),
            language: None,
        },
    )
    .await
    .unwrap();
    let petition = PetitionRepo::create(
        &pool,
        parish.id,
        &CreatePetition {
            title: "For the sick".to_string(),
            text: "For all who are sick, we pray...".to_string(),
        },
    )
    .await
    .unwrap();

    for (name, property, ty) in [
        ("First Reader", "first_reader", "person"),
        ("Choir", "choir", "group"),
        ("Venue", "venue", "location"),
        ("Song", "song", "list_item"),
        ("Worship Aid", "worship_aid", "document"),
        ("Entrance Hymn", "entrance_hymn", "content"),
        ("Petition", "petition", "petition"),
        ("Notes", "notes", "text"),
    ] {
        FieldDefinitionRepo::create(&pool, &new_field(et.id, name, property, ty))
            .await
            .unwrap();
    }

    let mut values = FieldValues::new();
    values.insert("first_reader", FieldValue::from(reader.id));
    values.insert("choir", FieldValue::from(choir.id));
    values.insert("venue", FieldValue::from(chapel.id));
    values.insert("song", FieldValue::from(song.id));
    values.insert("worship_aid", FieldValue::from(worship_aid.id));
    values.insert("entrance_hymn", FieldValue::from(hymn.id));
    values.insert("petition", FieldValue::from(petition.id));
    values.insert("notes", FieldValue::from("bring candles"));

    let event = seed_event(&pool, parish.id, et.id, values).await;
    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .expect("event should load");
    let fields = &loaded.resolved_fields;

    assert_eq!(fields["first_reader"].resolved_value.as_ref().unwrap()["full_name"], "Maria Gonzalez");
    assert_eq!(fields["choir"].resolved_value.as_ref().unwrap()["name"], "Adult Choir");
    assert_eq!(fields["venue"].resolved_value.as_ref().unwrap()["name"], "Main Chapel");
    assert_eq!(fields["song"].resolved_value.as_ref().unwrap()["value"], "Ave Maria");
    assert_eq!(fields["worship_aid"].resolved_value.as_ref().unwrap()["file_name"], "program.pdf");
    assert_eq!(fields["entrance_hymn"].resolved_value.as_ref().unwrap()["body"], "Here I am, Lord...");
    assert_eq!(fields["petition"].resolved_value.as_ref().unwrap()["text"], "For all who are sick, we pray...");

    // Scalar types never dereference.
    let notes = &fields["notes"];
    assert!(notes.resolved_value.is_none());
    assert_eq!(notes.raw_value.as_ref().unwrap().as_text(), Some("bring candles"));
}

// ---------------------------------------------------------------------------
// Test: content field resolution by UUID (scenario from the masses view)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_content_field_resolves_by_id(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id, "Mass").await;
    FieldDefinitionRepo::create(
        &pool,
        &new_field(et.id, "Entrance Hymn", "entrance_hymn", "content"),
    )
    .await
    .unwrap();

    let hymn = ContentRepo::create(
        &pool,
        parish.id,
        &CreateContent {
            title: "Amazing Grace".to_string(),
            body: "Amazing grace, how sweet the sound".to_string(),
            language: None,
        },
    )
    .await
    .unwrap();

    let mut values = FieldValues::new();
    values.insert("entrance_hymn", FieldValue::from(hymn.id));
    let event = seed_event(&pool, parish.id, et.id, values).await;

    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();
    let resolved = loaded.resolved_fields["entrance_hymn"]
        .resolved_value
        .as_ref()
        .expect("content should resolve");
    assert_eq!(resolved["id"], serde_json::json!(hymn.id));
}

/// Legacy content values were free text; those must stay unresolved instead
/// of being looked up.
#[sqlx::test(migrations = "../../migrations")]
async fn test_content_field_ignores_legacy_free_text(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id, "Mass").await;
    FieldDefinitionRepo::create(
        &pool,
        &new_field(et.id, "Entrance Hymn", "entrance_hymn", "content"),
    )
    .await
    .unwrap();

    let mut values = FieldValues::new();
    values.insert("entrance_hymn", FieldValue::from("Amazing Grace (trad.)"));
    let event = seed_event(&pool, parish.id, et.id, values).await;

    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();
    let field = &loaded.resolved_fields["entrance_hymn"];
    assert!(field.resolved_value.is_none());
    assert_eq!(field.raw_value.as_ref().unwrap().as_text(), Some("Amazing Grace (trad.)"));
}

// ---------------------------------------------------------------------------
// Test: partial-failure isolation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_bad_reference_does_not_block_other_fields(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id, "Mass").await;

    for (name, property, ty) in [
        ("First Reader", "first_reader", "person"),
        ("Second Reader", "second_reader", "person"),
        ("Notes", "notes", "text"),
    ] {
        FieldDefinitionRepo::create(&pool, &new_field(et.id, name, property, ty))
            .await
            .unwrap();
    }

    let reader = PersonRepo::create(&pool, parish.id, &person("Maria Gonzalez"))
        .await
        .unwrap();

    let mut values = FieldValues::new();
    values.insert("first_reader", FieldValue::from(reader.id));
    // Dangling reference: no such person exists.
    values.insert("second_reader", FieldValue::from(Uuid::new_v4()));
    values.insert("notes", FieldValue::from("incense"));

    let event = seed_event(&pool, parish.id, et.id, values).await;
    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();
    let fields = &loaded.resolved_fields;

    // One entry per definition, with only the dangling one unresolved.
    assert!(fields.contains_key("first_reader"));
    assert!(fields.contains_key("second_reader"));
    assert!(fields.contains_key("notes"));
    assert!(fields["first_reader"].resolved_value.is_some());
    assert!(fields["second_reader"].resolved_value.is_none());
    assert!(fields["second_reader"].raw_value.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_absent_value_yields_entry_without_resolution(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id, "Mass").await;
    FieldDefinitionRepo::create(&pool, &new_field(et.id, "Homilist", "homilist", "person"))
        .await
        .unwrap();

    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;
    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();

    let field = &loaded.resolved_fields["homilist"];
    assert!(field.raw_value.is_none());
    assert!(field.resolved_value.is_none());
}

// ---------------------------------------------------------------------------
// Test: tenant isolation of lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_cross_parish_reference_stays_unresolved(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let other_parish = ParishRepo::create(&pool, "St. Jude", "Dallas", "TX")
        .await
        .unwrap();
    let outsider = PersonRepo::create(&pool, other_parish.id, &person("Someone Else"))
        .await
        .unwrap();

    let et = seed_event_type(&pool, parish.id, "Mass").await;
    FieldDefinitionRepo::create(&pool, &new_field(et.id, "Lector", "lector", "person"))
        .await
        .unwrap();

    let mut values = FieldValues::new();
    values.insert("lector", FieldValue::from(outsider.id));
    let event = seed_event(&pool, parish.id, et.id, values).await;

    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();
    assert!(loaded.resolved_fields["lector"].resolved_value.is_none());
}

// ---------------------------------------------------------------------------
// Test: built-in synthesized fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_built_in_fields_are_synthesized(pool: PgPool) {
    let parish = seed_parish(&pool).await;
    let et = seed_event_type(&pool, parish.id, "Mass").await;

    let ceremony_def = FieldDefinitionRepo::create(&pool, &{
        let mut f = new_field(et.id, "Ceremony", "ceremony", "calendar_event");
        f.is_primary = Some(true);
        f
    })
    .await
    .unwrap();
    let presider_def =
        FieldDefinitionRepo::create(&pool, &new_field(et.id, "Presider", "presider", "person"))
            .await
            .unwrap();

    let event = seed_event(&pool, parish.id, et.id, FieldValues::new()).await;

    let start = chrono::NaiveDateTime::parse_from_str("2025-06-14T15:30:00", "%Y-%m-%dT%H:%M:%S")
        .unwrap()
        .and_utc();
    CalendarEventRepo::create(
        &pool,
        parish.id,
        &CreateCalendarEvent {
            master_event_id: event.id,
            field_definition_id: Some(ceremony_def.id),
            start_datetime: Some(start),
            end_datetime: None,
            location_id: None,
            is_all_day: None,
            show_on_calendar: Some(true),
        },
    )
    .await
    .unwrap();

    let celebrant = PersonRepo::create(&pool, parish.id, &person("Fr. John Riley"))
        .await
        .unwrap();
    AssignmentRepo::create(
        &pool,
        parish.id,
        &CreateAssignment {
            master_event_id: event.id,
            person_id: celebrant.id,
            field_definition_id: presider_def.id,
            notes: None,
        },
    )
    .await
    .unwrap();

    MassIntentionRepo::create(
        &pool,
        parish.id,
        &CreateMassIntention {
            offered_for: "In memory of Rosa Martinez".to_string(),
            requested_by_id: None,
            note: None,
            master_event_id: Some(event.id),
        },
    )
    .await
    .unwrap();

    let loaded = resolver::load_event_with_relations(&pool, parish.id, event.id)
        .await
        .unwrap()
        .unwrap();
    let fields = &loaded.resolved_fields;

    assert_eq!(fields["date"].raw_value.as_ref().unwrap().as_text(), Some("2025-06-14"));
    assert_eq!(fields["time"].raw_value.as_ref().unwrap().as_text(), Some("3:30 PM"));
    assert_eq!(
        fields["presider"].resolved_value.as_ref().unwrap()["full_name"],
        "Fr. John Riley"
    );
    assert_eq!(
        fields["mass_intention"].resolved_value.as_ref().unwrap()["offered_for"],
        "In memory of Rosa Martinez"
    );
    assert_eq!(fields["mass_intention"].field_type.as_str(), "mass-intention");
}
