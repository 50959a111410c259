//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod assignment;
pub mod calendar_event;
pub mod content;
pub mod custom_list;
pub mod document;
pub mod event_preset;
pub mod event_type;
pub mod field_definition;
pub mod group;
pub mod location;
pub mod mass_intention;
pub mod master_event;
pub mod parish;
pub mod person;
pub mod petition;
pub mod script;
pub mod user;
