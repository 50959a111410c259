//! Placeholder key mapping and script template rendering.
//!
//! Two keying conventions coexist: storage and the resolver key by
//! `property_name` (machine key, e.g. `entrance_hymn`), while script bodies
//! embed the human label literally (e.g. `{{Entrance Hymn}}`). All
//! translation between the two happens here, through [`PlaceholderKeyMap`];
//! call sites must never re-derive the pairing ad hoc.
//!
//! Supported placeholder syntaxes:
//!
//! - `{{Field Name}}` -- value substitution
//! - `{{Field Name.property}}` -- dotted lookup into the resolved entity
//! - `{{Field Name | male text | female text}}` -- gendered text based on the
//!   resolved person's gender
//! - `{{parish.name}}`, `{{parish.city}}`, `{{parish.state}}`,
//!   `{{parish.city_state}}` -- parish info
//!
//! Unresolvable placeholders render as the literal string `empty`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::fields::{FieldType, ResolvedField, ResolvedFields};

/// Rendered stand-in for a placeholder that has no value.
const EMPTY: &str = "empty";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder regex is valid"))
}

// ---------------------------------------------------------------------------
// Key map
// ---------------------------------------------------------------------------

/// Bidirectional `name` <-> `property_name` pairing for one event type,
/// built once from its field definitions.
///
/// The canonical resolved map is keyed by `property_name`; rendering
/// translates a human-label placeholder through this map, falling back to
/// the literal key so `{{date}}`, `{{presider}}` and direct property-name
/// placeholders keep working.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderKeyMap {
    name_to_property: BTreeMap<String, String>,
    property_to_name: BTreeMap<String, String>,
}

impl PlaceholderKeyMap {
    /// Build from `(name, property_name)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut map = Self::default();
        for (name, property) in pairs {
            let (name, property) = (name.into(), property.into());
            map.name_to_property.insert(name.clone(), property.clone());
            map.property_to_name.insert(property, name);
        }
        map
    }

    /// Translate a placeholder key to the canonical `property_name`. Keys
    /// that are not a known human label pass through unchanged.
    pub fn property_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.name_to_property
            .get(key)
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Reverse lookup: the human label for a `property_name`, if defined.
    pub fn name_for(&self, property_name: &str) -> Option<&str> {
        self.property_to_name.get(property_name).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Parish info
// ---------------------------------------------------------------------------

/// Parish fields exposed to `{{parish.*}}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParishInfo {
    pub name: String,
    pub city: String,
    pub state: String,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Substitute every `{{...}}` placeholder in `content` from the resolved
/// field map, translating human-label keys through `keymap`.
pub fn render_template(
    content: &str,
    fields: &ResolvedFields,
    keymap: &PlaceholderKeyMap,
    parish: Option<&ParishInfo>,
) -> String {
    placeholder_regex()
        .replace_all(content, |caps: &regex::Captures<'_>| {
            render_placeholder(&caps[1], fields, keymap, parish)
        })
        .into_owned()
}

fn render_placeholder(
    inner: &str,
    fields: &ResolvedFields,
    keymap: &PlaceholderKeyMap,
    parish: Option<&ParishInfo>,
) -> String {
    let parts: Vec<&str> = inner.split('|').map(str::trim).collect();

    if parts.len() == 3 {
        return render_gendered(parts[0], parts[1], parts[2], fields, keymap);
    }

    let key = parts[0];

    if let Some(rest) = key.strip_prefix("parish.") {
        return render_parish(rest, parish);
    }

    let (field_key, property_path) = match key.find('.') {
        Some(idx) if idx > 0 => (&key[..idx], Some(&key[idx + 1..])),
        _ => (key, None),
    };

    match fields.get(keymap.property_for(field_key)) {
        Some(field) => display_value(field, property_path),
        None => EMPTY.to_string(),
    }
}

fn render_parish(field: &str, parish: Option<&ParishInfo>) -> String {
    let Some(parish) = parish else {
        return EMPTY.to_string();
    };
    let value = match field {
        "name" => parish.name.clone(),
        "city" => parish.city.clone(),
        "state" => parish.state.clone(),
        "city_state" => {
            if !parish.city.is_empty() && !parish.state.is_empty() {
                format!("{}, {}", parish.city, parish.state)
            } else if !parish.city.is_empty() {
                parish.city.clone()
            } else {
                parish.state.clone()
            }
        }
        _ => String::new(),
    };
    if value.is_empty() {
        EMPTY.to_string()
    } else {
        value
    }
}

/// `{{Field | male text | female text}}`: pick by the resolved person's
/// gender; unknown gender renders both variants joined with a slash.
fn render_gendered(
    key: &str,
    male_text: &str,
    female_text: &str,
    fields: &ResolvedFields,
    keymap: &PlaceholderKeyMap,
) -> String {
    // A dotted key still selects the same person; the path is irrelevant here.
    let field_key = key.split('.').next().unwrap_or(key);

    let gender = fields
        .get(keymap.property_for(field_key))
        .and_then(|f| f.resolved_value.as_ref())
        .and_then(|v| v.get("gender"))
        .and_then(|g| g.as_str())
        .map(str::to_ascii_lowercase);

    match gender.as_deref() {
        Some("male") => male_text.to_string(),
        Some("female") => female_text.to_string(),
        _ => format!("{male_text}/{female_text}"),
    }
}

/// Per-type display formatting of one resolved field.
fn display_value(field: &ResolvedField, property_path: Option<&str>) -> String {
    let resolved = field.resolved_value.as_ref();

    let text = match field.field_type {
        FieldType::Person => resolved.and_then(|person| match property_path {
            Some(path) => person.get(path).and_then(json_to_text),
            None => person.get("full_name").and_then(json_to_text),
        }),
        FieldType::CalendarEvent => resolved.and_then(|ce| display_calendar_event(ce, property_path)),
        FieldType::Date => field
            .raw_value
            .as_ref()
            .and_then(|v| v.to_display())
            .map(|d| format_date_pretty(&d)),
        FieldType::Location | FieldType::Group => {
            resolved.and_then(|v| v.get("name")).and_then(json_to_text)
        }
        FieldType::ListItem => resolved.and_then(|v| v.get("value")).and_then(json_to_text),
        FieldType::Document => resolved
            .and_then(|v| v.get("file_name"))
            .and_then(json_to_text),
        FieldType::Content => resolved
            .and_then(|v| v.get("body"))
            .and_then(json_to_text)
            // Legacy content values were free text rather than library ids.
            .or_else(|| field.raw_value.as_ref().and_then(|v| v.to_display())),
        FieldType::Petition => resolved.and_then(|v| v.get("text")).and_then(json_to_text),
        // `{{mass_intention.offered_for}}` and friends read the intention
        // record directly.
        FieldType::MassIntention => match property_path {
            Some(path) => resolved.and_then(|v| v.get(path)).and_then(json_to_text),
            None => resolved
                .and_then(|v| v.get("offered_for"))
                .and_then(json_to_text),
        },
        _ => field.raw_value.as_ref().and_then(|v| v.to_display()),
    };

    text.unwrap_or_else(|| EMPTY.to_string())
}

fn display_calendar_event(ce: &serde_json::Value, property_path: Option<&str>) -> Option<String> {
    let start = ce
        .get("date")
        .and_then(json_to_text)
        .or_else(|| ce.get("start_datetime").and_then(json_to_text));

    match property_path {
        Some("date") | None => start.map(|s| format_date_pretty(&s)),
        Some("time") => {
            let value = ce
                .get("time")
                .and_then(json_to_text)
                .or_else(|| ce.get("start_datetime").and_then(json_to_text))?;
            let time_part = match value.split_once('T') {
                Some((_, time)) => time,
                None => value.as_str(),
            };
            Some(time_part.chars().take(5).collect())
        }
        Some("location") => ce
            .get("location")
            .and_then(|l| l.get("name"))
            .and_then(json_to_text),
        Some(path) => ce.get(path).and_then(json_to_text),
    }
}

fn json_to_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Format an ISO date (or the date part of an ISO datetime) as a long-form
/// English date, e.g. `2025-06-01` -> `June 1, 2025`. Unparseable input is
/// returned unchanged.
pub fn format_date_pretty(value: &str) -> String {
    let date_part = value.split('T').next().unwrap_or(value);
    match chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldValue;
    use serde_json::json;

    fn field(
        name: &str,
        ty: FieldType,
        raw: Option<FieldValue>,
        resolved: Option<serde_json::Value>,
    ) -> ResolvedField {
        ResolvedField {
            field_name: name.to_string(),
            field_type: ty,
            raw_value: raw,
            resolved_value: resolved,
        }
    }

    fn sample_fields() -> (ResolvedFields, PlaceholderKeyMap) {
        let mut fields = ResolvedFields::new();
        fields.insert(
            "entrance_hymn".to_string(),
            field(
                "Entrance Hymn",
                FieldType::Content,
                Some(FieldValue::from("4a8a1b7e-6f0f-4c2a-8a8e-9a4d2a3b4c5d")),
                Some(json!({"title": "Here I Am, Lord", "body": "Here I am, Lord..."})),
            ),
        );
        fields.insert(
            "first_reader".to_string(),
            field(
                "First Reader",
                FieldType::Person,
                Some(FieldValue::from("7e0d8f94-1111-4f4e-8c2a-2b3c4d5e6f70")),
                Some(json!({"full_name": "Maria Gonzalez", "first_name": "Maria", "gender": "female"})),
            ),
        );
        fields.insert(
            "ceremony".to_string(),
            field(
                "Ceremony",
                FieldType::CalendarEvent,
                None,
                Some(json!({
                    "start_datetime": "2025-06-14T15:30:00Z",
                    "location": {"name": "Main Chapel"},
                })),
            ),
        );
        fields.insert(
            "notes".to_string(),
            field("Notes", FieldType::Text, Some(FieldValue::from("bring candles")), None),
        );
        fields.insert(
            "date".to_string(),
            field("date", FieldType::Date, Some(FieldValue::from("2025-06-14")), None),
        );

        let keymap = PlaceholderKeyMap::from_pairs([
            ("Entrance Hymn", "entrance_hymn"),
            ("First Reader", "first_reader"),
            ("Ceremony", "ceremony"),
            ("Notes", "notes"),
        ]);
        (fields, keymap)
    }

    #[test]
    fn keymap_translates_names_and_passes_through_properties() {
        let keymap = PlaceholderKeyMap::from_pairs([("Entrance Hymn", "entrance_hymn")]);
        assert_eq!(keymap.property_for("Entrance Hymn"), "entrance_hymn");
        assert_eq!(keymap.property_for("entrance_hymn"), "entrance_hymn");
        assert_eq!(keymap.property_for("date"), "date");
        assert_eq!(keymap.name_for("entrance_hymn"), Some("Entrance Hymn"));
    }

    #[test]
    fn renders_human_label_and_property_name_placeholders() {
        let (fields, keymap) = sample_fields();
        let out = render_template("{{Notes}} / {{notes}}", &fields, &keymap, None);
        assert_eq!(out, "bring candles / bring candles");
    }

    #[test]
    fn renders_content_body() {
        let (fields, keymap) = sample_fields();
        let out = render_template("{{Entrance Hymn}}", &fields, &keymap, None);
        assert_eq!(out, "Here I am, Lord...");
    }

    #[test]
    fn renders_person_with_dotted_path() {
        let (fields, keymap) = sample_fields();
        let out = render_template(
            "{{First Reader}} ({{First Reader.first_name}})",
            &fields,
            &keymap,
            None,
        );
        assert_eq!(out, "Maria Gonzalez (Maria)");
    }

    #[test]
    fn renders_calendar_event_paths() {
        let (fields, keymap) = sample_fields();
        let out = render_template(
            "{{Ceremony.date}} at {{Ceremony.time}} in {{Ceremony.location}}",
            &fields,
            &keymap,
            None,
        );
        assert_eq!(out, "June 14, 2025 at 15:30 in Main Chapel");
    }

    #[test]
    fn renders_builtin_date_field() {
        let (fields, keymap) = sample_fields();
        let out = render_template("{{date}}", &fields, &keymap, None);
        assert_eq!(out, "June 14, 2025");
    }

    #[test]
    fn unknown_placeholder_renders_empty() {
        let (fields, keymap) = sample_fields();
        let out = render_template("{{No Such Field}}", &fields, &keymap, None);
        assert_eq!(out, "empty");
    }

    #[test]
    fn unresolved_reference_renders_empty() {
        let mut fields = ResolvedFields::new();
        fields.insert(
            "homilist".to_string(),
            field(
                "Homilist",
                FieldType::Person,
                Some(FieldValue::from("0b9c8d7e-2222-4a5b-9c8d-7e6f5a4b3c2d")),
                None,
            ),
        );
        let keymap = PlaceholderKeyMap::from_pairs([("Homilist", "homilist")]);
        assert_eq!(render_template("{{Homilist}}", &fields, &keymap, None), "empty");
    }

    #[test]
    fn renders_parish_placeholders() {
        let (fields, keymap) = sample_fields();
        let parish = ParishInfo {
            name: "St. Mary".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
        };
        let out = render_template(
            "{{parish.name}} -- {{parish.city_state}}",
            &fields,
            &keymap,
            Some(&parish),
        );
        assert_eq!(out, "St. Mary -- Austin, TX");

        let out = render_template("{{parish.name}}", &fields, &keymap, None);
        assert_eq!(out, "empty");
    }

    #[test]
    fn gendered_placeholder_picks_variant() {
        let (fields, keymap) = sample_fields();
        let out = render_template(
            "{{First Reader | his | her}} reading",
            &fields,
            &keymap,
            None,
        );
        assert_eq!(out, "her reading");
    }

    #[test]
    fn gendered_placeholder_without_gender_shows_both() {
        let mut fields = ResolvedFields::new();
        fields.insert(
            "sponsor".to_string(),
            field(
                "Sponsor",
                FieldType::Person,
                None,
                Some(json!({"full_name": "Sam Doe"})),
            ),
        );
        let keymap = PlaceholderKeyMap::from_pairs([("Sponsor", "sponsor")]);
        let out = render_template("{{Sponsor | he | she}}", &fields, &keymap, None);
        assert_eq!(out, "he/she");
    }

    #[test]
    fn mass_intention_placeholders_read_the_intention_record() {
        let mut fields = ResolvedFields::new();
        fields.insert(
            "mass_intention".to_string(),
            field(
                "mass_intention",
                FieldType::MassIntention,
                Some(FieldValue::from("0f4a2e6c-3333-4b5c-8d9e-0a1b2c3d4e5f")),
                Some(json!({"offered_for": "In memory of Rosa Martinez", "note": "anniversary"})),
            ),
        );
        let keymap = PlaceholderKeyMap::default();

        let out = render_template(
            "{{mass_intention}} ({{mass_intention.note}})",
            &fields,
            &keymap,
            None,
        );
        assert_eq!(out, "In memory of Rosa Martinez (anniversary)");
    }

    #[test]
    fn format_date_pretty_falls_back_on_unparseable_input() {
        assert_eq!(format_date_pretty("2025-03-01"), "March 1, 2025");
        assert_eq!(format_date_pretty("2025-03-01T09:00:00Z"), "March 1, 2025");
        assert_eq!(format_date_pretty("whenever"), "whenever");
    }
}
