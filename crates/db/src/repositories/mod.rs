//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every tenant-owned query
//! filters on `parish_id` and `deleted_at IS NULL` explicitly.

pub mod assignment_repo;
pub mod calendar_event_repo;
pub mod content_repo;
pub mod custom_list_repo;
pub mod document_repo;
pub mod event_preset_repo;
pub mod event_type_repo;
pub mod field_definition_repo;
pub mod group_repo;
pub mod location_repo;
pub mod mass_intention_repo;
pub mod master_event_repo;
pub mod parish_repo;
pub mod person_repo;
pub mod petition_repo;
pub mod script_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use calendar_event_repo::CalendarEventRepo;
pub use content_repo::ContentRepo;
pub use custom_list_repo::CustomListRepo;
pub use document_repo::DocumentRepo;
pub use event_preset_repo::EventPresetRepo;
pub use event_type_repo::EventTypeRepo;
pub use field_definition_repo::FieldDefinitionRepo;
pub use group_repo::GroupRepo;
pub use location_repo::LocationRepo;
pub use mass_intention_repo::MassIntentionRepo;
pub use master_event_repo::MasterEventRepo;
pub use parish_repo::ParishRepo;
pub use person_repo::PersonRepo;
pub use petition_repo::PetitionRepo;
pub use script_repo::ScriptRepo;
pub use user_repo::UserRepo;
