//! Field type system for dynamic event schemas.
//!
//! An event type owns an ordered list of field definitions; each concrete
//! event stores a `field_values` map from `property_name` to a raw value
//! (scalar or entity-reference id). The resolver dereferences reference-typed
//! values against the matching entity table and produces [`ResolvedField`]
//! entries keyed by `property_name`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// The declared type of an input field definition.
///
/// The serialized names are the values stored in the
/// `input_field_definitions.type` column and embedded in resolved-field
/// payloads. `MassIntention` keeps its historical kebab-case spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    RichText,
    Number,
    YesNo,
    Date,
    Time,
    Datetime,
    Person,
    Group,
    Location,
    ListItem,
    Document,
    Content,
    Petition,
    CalendarEvent,
    #[serde(rename = "mass-intention")]
    MassIntention,
    Spacer,
}

impl FieldType {
    /// The stored column value for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::RichText => "rich_text",
            FieldType::Number => "number",
            FieldType::YesNo => "yes_no",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Person => "person",
            FieldType::Group => "group",
            FieldType::Location => "location",
            FieldType::ListItem => "list_item",
            FieldType::Document => "document",
            FieldType::Content => "content",
            FieldType::Petition => "petition",
            FieldType::CalendarEvent => "calendar_event",
            FieldType::MassIntention => "mass-intention",
            FieldType::Spacer => "spacer",
        }
    }

    /// Parse a stored column value. Returns `None` for unknown names so
    /// callers can decide between rejection (writes) and pass-through (reads).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "text" => FieldType::Text,
            "rich_text" => FieldType::RichText,
            "number" => FieldType::Number,
            "yes_no" => FieldType::YesNo,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "datetime" => FieldType::Datetime,
            "person" => FieldType::Person,
            "group" => FieldType::Group,
            "location" => FieldType::Location,
            "list_item" => FieldType::ListItem,
            "document" => FieldType::Document,
            "content" => FieldType::Content,
            "petition" => FieldType::Petition,
            "calendar_event" => FieldType::CalendarEvent,
            "mass-intention" => FieldType::MassIntention,
            "spacer" => FieldType::Spacer,
            _ => return None,
        })
    }

    /// Whether raw values of this type are dereferenced against an entity
    /// table by the resolver. Calendar-event fields are not: their data lives
    /// in `calendar_events` rows, not in `field_values`.
    pub fn is_dereferenceable(self) -> bool {
        matches!(
            self,
            FieldType::Person
                | FieldType::Group
                | FieldType::Location
                | FieldType::ListItem
                | FieldType::Document
                | FieldType::Content
                | FieldType::Petition
        )
    }
}

// ---------------------------------------------------------------------------
// Built-in synthesized field keys
// ---------------------------------------------------------------------------

/// Key of the synthesized ISO calendar date field.
pub const BUILTIN_DATE: &str = "date";
/// Key of the synthesized 12-hour clock time field.
pub const BUILTIN_TIME: &str = "time";
/// Key of the synthesized presider field, and the `property_name` of the
/// assignment definition it is derived from.
pub const BUILTIN_PRESIDER: &str = "presider";
/// Key of the synthesized mass-intention field.
pub const BUILTIN_MASS_INTENTION: &str = "mass_intention";

// ---------------------------------------------------------------------------
// Definition validation
// ---------------------------------------------------------------------------

/// Maximum length for a field definition name.
pub const MAX_FIELD_NAME_LEN: usize = 200;

/// Validate a field definition's human label.
pub fn validate_field_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Field name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_FIELD_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Field name too long: {} chars (max {MAX_FIELD_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a `property_name`: lowercase ascii, digits and underscores,
/// starting with a letter. These are template variable names and JSONB keys.
pub fn validate_property_name(property_name: &str) -> Result<(), CoreError> {
    let mut chars = property_name.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_lowercase()
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid property name '{property_name}': use lowercase letters, digits and underscores, starting with a letter"
        )))
    }
}

/// Validate the cross-field flag rules for a definition:
///
/// - `is_key_person` is only valid on `person` fields.
/// - `is_primary` is only valid on `calendar_event` fields.
///
/// Primary-uniqueness across an event type is a storage-level check and is
/// enforced by the definition store, not here.
pub fn validate_field_flags(
    field_type: FieldType,
    is_key_person: bool,
    is_primary: bool,
) -> Result<(), CoreError> {
    if is_key_person && field_type != FieldType::Person {
        return Err(CoreError::Validation(
            "is_key_person can only be set on person fields".to_string(),
        ));
    }
    if is_primary && field_type != FieldType::CalendarEvent {
        return Err(CoreError::Validation(
            "is_primary can only be set on calendar_event fields".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Raw field values
// ---------------------------------------------------------------------------

/// A single raw value stored under a `property_name` key: a scalar or an
/// entity-reference id (stored as its string form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as an entity-reference id. Only UUID-shaped text
    /// qualifies; anything else (legacy free text, scalars) returns `None`.
    pub fn reference_id(&self) -> Option<DbId> {
        self.as_text().and_then(|s| s.parse().ok())
    }

    /// Display form for template substitution. `None` for null values so the
    /// renderer can fall back to its placeholder text.
    pub fn to_display(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            FieldValue::Text(s) => {
                if s.is_empty() {
                    None
                } else {
                    Some(s.clone())
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<DbId> for FieldValue {
    fn from(id: DbId) -> Self {
        FieldValue::Text(id.to_string())
    }
}

/// The `field_values` map of a master event: `property_name` -> raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(pub BTreeMap<String, FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property_name: &str) -> Option<&FieldValue> {
        self.0.get(property_name)
    }

    pub fn insert(&mut self, property_name: impl Into<String>, value: FieldValue) {
        self.0.insert(property_name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject keys that are not defined for the owning event type. Called at
    /// write boundaries so the blob's shape can be trusted on reads.
    pub fn validate_keys<'a, I>(&self, allowed: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let allowed: BTreeSet<&str> = allowed.into_iter().collect();
        for key in self.0.keys() {
            if !allowed.contains(key.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Unknown field '{key}' for this event type"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resolved field values
// ---------------------------------------------------------------------------

/// A transient, request-scoped projection of one field: the stored raw value
/// alongside the dereferenced entity (when the type is dereferenceable and
/// the lookup succeeded). Never persisted, produced fresh on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedField {
    /// Human label of the definition (used by script placeholders).
    pub field_name: String,
    pub field_type: FieldType,
    pub raw_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_value: Option<serde_json::Value>,
}

/// The canonical resolved map, keyed by `property_name`.
pub type ResolvedFields = BTreeMap<String, ResolvedField>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // --- FieldType ---

    #[test]
    fn field_type_round_trips_through_names() {
        for name in [
            "text",
            "rich_text",
            "number",
            "yes_no",
            "date",
            "time",
            "datetime",
            "person",
            "group",
            "location",
            "list_item",
            "document",
            "content",
            "petition",
            "calendar_event",
            "mass-intention",
            "spacer",
        ] {
            let ty = FieldType::from_name(name).expect(name);
            assert_eq!(ty.as_str(), name);
        }
        assert_eq!(FieldType::from_name("bogus"), None);
    }

    #[test]
    fn field_type_serde_uses_stored_names() {
        assert_eq!(
            serde_json::to_value(FieldType::MassIntention).unwrap(),
            json!("mass-intention")
        );
        assert_eq!(
            serde_json::to_value(FieldType::ListItem).unwrap(),
            json!("list_item")
        );
        let ty: FieldType = serde_json::from_value(json!("calendar_event")).unwrap();
        assert_eq!(ty, FieldType::CalendarEvent);
    }

    #[test]
    fn dereferenceable_types() {
        assert!(FieldType::Person.is_dereferenceable());
        assert!(FieldType::Content.is_dereferenceable());
        assert!(FieldType::Petition.is_dereferenceable());
        assert!(!FieldType::Text.is_dereferenceable());
        assert!(!FieldType::CalendarEvent.is_dereferenceable());
        assert!(!FieldType::Spacer.is_dereferenceable());
    }

    // --- Validation ---

    #[test]
    fn validate_field_name_rejects_empty_and_long() {
        assert!(validate_field_name("Entrance Hymn").is_ok());
        assert!(validate_field_name("").is_err());
        assert!(validate_field_name(&"x".repeat(MAX_FIELD_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn validate_property_name_enforces_shape() {
        assert!(validate_property_name("entrance_hymn").is_ok());
        assert!(validate_property_name("reader2").is_ok());
        assert!(validate_property_name("").is_err());
        assert!(validate_property_name("Entrance Hymn").is_err());
        assert!(validate_property_name("2nd_reader").is_err());
        assert!(validate_property_name("first-reader").is_err());
    }

    #[test]
    fn key_person_flag_requires_person_type() {
        assert!(validate_field_flags(FieldType::Person, true, false).is_ok());
        let err = validate_field_flags(FieldType::Text, true, false).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn primary_flag_requires_calendar_event_type() {
        assert!(validate_field_flags(FieldType::CalendarEvent, false, true).is_ok());
        let err = validate_field_flags(FieldType::Person, false, true).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    // --- FieldValue ---

    #[test]
    fn field_value_serde_is_untagged() {
        let values: FieldValues = serde_json::from_value(json!({
            "entrance_hymn": "b34c7c2e-2f6b-4e4c-9d4e-1f8f3e1c2a3b",
            "pew_count": 12,
            "has_incense": true,
            "notes": null,
        }))
        .unwrap();

        assert_matches!(values.get("has_incense"), Some(FieldValue::Bool(true)));
        assert_matches!(values.get("pew_count"), Some(FieldValue::Number(_)));
        assert_matches!(values.get("notes"), Some(FieldValue::Null));
        assert!(values.get("entrance_hymn").unwrap().reference_id().is_some());
    }

    #[test]
    fn reference_id_requires_uuid_shape() {
        assert!(FieldValue::from("not-a-uuid").reference_id().is_none());
        assert!(FieldValue::Number(42.0).reference_id().is_none());

        let id = uuid::Uuid::new_v4();
        assert_eq!(FieldValue::from(id).reference_id(), Some(id));
    }

    #[test]
    fn display_formats_scalars() {
        assert_eq!(FieldValue::Null.to_display(), None);
        assert_eq!(FieldValue::Text(String::new()).to_display(), None);
        assert_eq!(FieldValue::Bool(true).to_display().unwrap(), "true");
        assert_eq!(FieldValue::Number(3.0).to_display().unwrap(), "3");
        assert_eq!(FieldValue::Number(2.5).to_display().unwrap(), "2.5");
    }

    // --- FieldValues ---

    #[test]
    fn validate_keys_rejects_unknown_properties() {
        let mut values = FieldValues::new();
        values.insert("entrance_hymn", FieldValue::from("x"));
        values.insert("mystery_field", FieldValue::from("y"));

        assert!(values.validate_keys(["entrance_hymn", "mystery_field"]).is_ok());
        let err = values.validate_keys(["entrance_hymn"]).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("mystery_field"));
    }
}
