//! Pure domain logic for the sacristy parish back-office.
//!
//! This crate has zero internal deps so it can be used by the repository
//! layer, the API, and any future CLI tooling. It contains the field type
//! system and validation, the placeholder key map and script rendering,
//! preset-data construction, role constants, and the error taxonomy.

pub mod error;
pub mod fields;
pub mod placeholders;
pub mod preset;
pub mod roles;
pub mod types;
