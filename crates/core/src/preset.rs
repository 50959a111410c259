//! Event preset data construction and validation.
//!
//! A preset is a reusable snapshot of a master event's configuration: the
//! raw field values plus, per calendar-event field, the *shape* of the slot
//! (location, all-day flag, day span). Presets represent a template, not a
//! historical record: absolute start/end datetimes are never stored, so
//! applying a preset lets the user pick new dates while inheriting
//! everything else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fields::FieldValues;
use crate::types::{DbId, Timestamp};

/// Milliseconds per day, the unit of the `duration_days` ceiling.
const MS_PER_DAY: i64 = 86_400_000;

/// Maximum length for a preset name.
pub const MAX_PRESET_NAME_LEN: usize = 200;

/// Maximum length for a preset description.
pub const MAX_PRESET_DESCRIPTION_LEN: usize = 5000;

// ---------------------------------------------------------------------------
// Preset data
// ---------------------------------------------------------------------------

/// Shape of one calendar-event field inside a preset: everything about the
/// slot except when it happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarFieldShape {
    pub location_id: Option<DbId>,
    pub is_all_day: bool,
    pub duration_days: Option<i64>,
}

/// The `preset_data` JSONB payload of an event preset.
///
/// `calendar_events` is keyed by the field definition's human `name` -- the
/// same label convention script placeholders use (see
/// [`crate::placeholders::PlaceholderKeyMap`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetData {
    #[serde(default)]
    pub field_values: FieldValues,
    #[serde(default)]
    pub calendar_events: BTreeMap<String, CalendarFieldShape>,
}

/// Input for one calendar-event field when snapshotting a live event.
#[derive(Debug, Clone)]
pub struct CalendarShapeInput {
    /// Human `name` of the owning field definition.
    pub field_name: String,
    pub location_id: Option<DbId>,
    pub is_all_day: bool,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl PresetData {
    /// Build preset data from a live event's raw field values and its
    /// calendar-event slots. Raw values are copied as stored (resolved
    /// entities are re-resolved against current data at use-time); concrete
    /// datetimes are reduced to a day-span count.
    pub fn from_event_parts<I>(field_values: FieldValues, calendar_slots: I) -> Self
    where
        I: IntoIterator<Item = CalendarShapeInput>,
    {
        let calendar_events = calendar_slots
            .into_iter()
            .map(|slot| {
                let duration = match (slot.is_all_day, slot.start, slot.end) {
                    (true, Some(start), Some(end)) => Some(duration_days(start, end)),
                    _ => None,
                };
                (
                    slot.field_name,
                    CalendarFieldShape {
                        location_id: slot.location_id,
                        is_all_day: slot.is_all_day,
                        duration_days: duration,
                    },
                )
            })
            .collect();

        Self {
            field_values,
            calendar_events,
        }
    }
}

/// Day span of an all-day slot: `ceil(|end - start| / 86_400_000 ms)`.
pub fn duration_days(start: Timestamp, end: Timestamp) -> i64 {
    let ms = (end - start).num_milliseconds().abs();
    (ms + MS_PER_DAY - 1) / MS_PER_DAY
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a preset name: non-empty and within length limit.
pub fn validate_preset_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Preset name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_PRESET_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Preset name too long: {} chars (max {MAX_PRESET_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a preset description length.
pub fn validate_preset_description(description: &str) -> Result<(), CoreError> {
    if description.len() > MAX_PRESET_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Preset description too long: {} chars (max {MAX_PRESET_DESCRIPTION_LEN})",
            description.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldValue;
    fn ts(s: &str) -> Timestamp {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .expect("valid test timestamp")
            .and_utc()
    }

    // --- duration_days ---

    #[test]
    fn duration_of_exact_day_spans() {
        // Midnight-aligned spans divide evenly: no ceiling adjustment.
        assert_eq!(duration_days(ts("2025-06-01T00:00:00"), ts("2025-06-03T00:00:00")), 2);
        assert_eq!(duration_days(ts("2025-03-01T00:00:00"), ts("2025-03-04T00:00:00")), 3);
    }

    #[test]
    fn duration_rounds_partial_days_up() {
        assert_eq!(duration_days(ts("2025-06-01T00:00:00"), ts("2025-06-02T06:00:00")), 2);
        assert_eq!(duration_days(ts("2025-06-01T09:00:00"), ts("2025-06-01T10:00:00")), 1);
    }

    #[test]
    fn duration_is_symmetric_and_zero_for_equal_ends() {
        assert_eq!(duration_days(ts("2025-06-03T00:00:00"), ts("2025-06-01T00:00:00")), 2);
        assert_eq!(duration_days(ts("2025-06-01T00:00:00"), ts("2025-06-01T00:00:00")), 0);
    }

    // --- from_event_parts ---

    fn values_with(key: &str, value: &str) -> FieldValues {
        let mut values = FieldValues::new();
        values.insert(key, FieldValue::from(value));
        values
    }

    #[test]
    fn snapshot_keeps_shape_and_drops_datetimes() {
        let data = PresetData::from_event_parts(
            values_with("entrance_hymn", "4a8a1b7e-6f0f-4c2a-8a8e-9a4d2a3b4c5d"),
            [CalendarShapeInput {
                field_name: "Retreat".to_string(),
                location_id: None,
                is_all_day: true,
                start: Some(ts("2025-03-01T00:00:00")),
                end: Some(ts("2025-03-04T00:00:00")),
            }],
        );

        let shape = &data.calendar_events["Retreat"];
        assert!(shape.is_all_day);
        assert_eq!(shape.duration_days, Some(3));

        // No absolute dates or times may survive anywhere in the payload.
        let json = serde_json::to_string(&data).expect("serializable");
        assert!(!json.contains("2025"));
        assert!(!json.contains("datetime"));
    }

    #[test]
    fn timed_slots_have_no_duration() {
        let data = PresetData::from_event_parts(
            FieldValues::new(),
            [CalendarShapeInput {
                field_name: "Ceremony".to_string(),
                location_id: None,
                is_all_day: false,
                start: Some(ts("2025-06-14T15:30:00")),
                end: Some(ts("2025-06-14T16:30:00")),
            }],
        );
        assert_eq!(data.calendar_events["Ceremony"].duration_days, None);
    }

    #[test]
    fn all_day_slot_without_end_has_no_duration() {
        let data = PresetData::from_event_parts(
            FieldValues::new(),
            [CalendarShapeInput {
                field_name: "Feast".to_string(),
                location_id: None,
                is_all_day: true,
                start: Some(ts("2025-06-14T00:00:00")),
                end: None,
            }],
        );
        assert_eq!(data.calendar_events["Feast"].duration_days, None);
    }

    // --- validation ---

    #[test]
    fn preset_name_validation() {
        assert!(validate_preset_name("Sunday 9am Mass").is_ok());
        assert!(validate_preset_name("").is_err());
        assert!(validate_preset_name(&"x".repeat(MAX_PRESET_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn preset_description_validation() {
        assert!(validate_preset_description("Standard Sunday setup").is_ok());
        assert!(validate_preset_description(&"x".repeat(MAX_PRESET_DESCRIPTION_LEN + 1)).is_err());
    }
}
