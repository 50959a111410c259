//! HTTP handlers, one module per resource.

pub mod auth;
pub mod calendar_events;
pub mod event_types;
pub mod field_definitions;
pub mod masses;
pub mod master_events;
pub mod presets;
pub mod scripts;
