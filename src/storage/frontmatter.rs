//! YAML frontmatter for collection files
//!
//! The frontmatter holds everything about a collection except its items:
//!
//! ```yaml
//! collection:
//!   name: Guitar Practice
//!   type: music
//!   created_at: 2024-05-01T10:00:00Z
//!   updated_at: 2024-05-01T10:00:00Z
//! fields:
//! - name: song_name
//!   type: text
//!   required: true
//!   options: []
//! ```
//!
//! Key order is fixed by the serde structs below.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::error::FormatError;
use crate::domain::{Collection, Field};

/// Frontmatter delimiter line
pub const DELIMITER: &str = "---";

/// Keys that must be present under `collection`
const REQUIRED_KEYS: [(&str, &str); 4] = [
    ("name", "collection.name"),
    ("type", "collection.type"),
    ("created_at", "collection.created_at"),
    ("updated_at", "collection.updated_at"),
];

#[derive(Debug, Serialize, Deserialize)]
struct CollectionHeader {
    name: String,
    #[serde(rename = "type")]
    collection_type: String,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    collection: CollectionHeader,
    #[serde(default)]
    fields: Vec<Field>,
}

/// Decoded frontmatter: collection metadata plus schema
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub name: String,
    pub collection_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub fields: Vec<Field>,
}

impl Frontmatter {
    /// Builds a collection from this metadata and the given items
    pub fn into_collection(self, items: Vec<crate::domain::Item>) -> Collection {
        Collection {
            name: self.name,
            collection_type: self.collection_type,
            fields: self.fields,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses RFC 3339, or ISO-8601 without an offset (taken as UTC)
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FormatError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| FormatError::InvalidTimestamp(raw.to_string()))
}

/// Renders the opening delimiter and the YAML block
///
/// The closing delimiter is added by the store when it assembles the file.
pub fn encode(collection: &Collection) -> Result<String, FormatError> {
    let document = Document {
        collection: CollectionHeader {
            name: collection.name.clone(),
            collection_type: collection.collection_type.clone(),
            created_at: format_timestamp(collection.created_at),
            updated_at: format_timestamp(collection.updated_at),
        },
        fields: collection.fields.clone(),
    };

    let yaml = serde_yaml::to_string(&document).map_err(FormatError::Yaml)?;

    let mut out = String::with_capacity(yaml.len() + 4);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Parses the YAML between the delimiters
pub fn decode(yaml: &str) -> Result<Frontmatter, FormatError> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(FormatError::Yaml)?;
    let root = value.as_mapping().ok_or(FormatError::NotAMapping)?;

    let header = root
        .get("collection")
        .and_then(|v| v.as_mapping())
        .ok_or(FormatError::MissingKey("collection"))?;

    for (key, label) in REQUIRED_KEYS {
        if !header.contains_key(key) {
            return Err(FormatError::MissingKey(label));
        }
    }

    if let Some(fields) = root.get("fields").and_then(|v| v.as_sequence()) {
        for (index, entry) in fields.iter().enumerate() {
            for key in ["name", "type"] {
                if entry.get(key).is_none() {
                    return Err(FormatError::MissingFieldKey { index, key });
                }
            }
        }
    }

    let document: Document = serde_yaml::from_value(value).map_err(FormatError::Yaml)?;

    Ok(Frontmatter {
        created_at: parse_timestamp(&document.collection.created_at)?,
        updated_at: parse_timestamp(&document.collection.updated_at)?,
        name: document.collection.name,
        collection_type: document.collection.collection_type,
        fields: document.fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldType;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn guitar_practice() -> Collection {
        let mut collection = Collection::new("Guitar Practice", "music").with_fields(vec![
            Field::new("song_name", FieldType::Text).required(),
            Field::new("difficulty", FieldType::Select)
                .with_options(["beginner", "intermediate", "advanced"]),
        ]);
        collection.created_at = fixed_time();
        collection.updated_at = fixed_time();
        collection
    }

    fn body(encoded: &str) -> &str {
        encoded.strip_prefix("---\n").unwrap()
    }

    #[test]
    fn encode_starts_with_delimiter() {
        let encoded = encode(&guitar_practice()).unwrap();
        assert!(encoded.starts_with("---\n"));
        assert!(encoded.ends_with('\n'));
    }

    #[test]
    fn encode_orders_sections_and_keys() {
        let encoded = encode(&guitar_practice()).unwrap();

        let pos = |needle: &str| {
            encoded
                .find(needle)
                .unwrap_or_else(|| panic!("missing {needle:?} in:\n{encoded}"))
        };

        assert!(pos("collection:") < pos("fields:"));
        assert!(pos("  name: Guitar Practice") < pos("  type: music"));
        assert!(pos("  type: music") < pos("created_at:"));
        assert!(pos("created_at:") < pos("updated_at:"));
        assert!(pos("name: song_name") < pos("name: difficulty"));
        assert!(pos("required: true") < pos("required: false"));
    }

    #[test]
    fn roundtrip() {
        let collection = guitar_practice();
        let encoded = encode(&collection).unwrap();
        let decoded = decode(body(&encoded)).unwrap();

        assert_eq!(decoded.name, "Guitar Practice");
        assert_eq!(decoded.collection_type, "music");
        assert_eq!(decoded.created_at, fixed_time());
        assert_eq!(decoded.updated_at, fixed_time());
        assert_eq!(decoded.fields, collection.fields);
    }

    #[test]
    fn roundtrip_preserves_subsecond_timestamps() {
        let mut collection = guitar_practice();
        collection.updated_at = Utc::now();

        let decoded = decode(body(&encode(&collection).unwrap())).unwrap();
        assert_eq!(decoded.updated_at, collection.updated_at);
    }

    #[test]
    fn names_needing_quotes_survive() {
        let mut collection = guitar_practice();
        collection.name = "Test/Collection<>:|?* # not a comment".to_string();

        let decoded = decode(body(&encode(&collection).unwrap())).unwrap();
        assert_eq!(decoded.name, collection.name);
    }

    #[test]
    fn decode_defaults_required_and_options() {
        let yaml = r#"
collection:
  name: Books
  type: reading
  created_at: '2024-01-02T03:04:05.123456'
  updated_at: '2024-01-02T03:04:05+00:00'
fields:
  - name: title
    type: text
"#;
        let decoded = decode(yaml).unwrap();

        assert_eq!(decoded.fields.len(), 1);
        assert!(!decoded.fields[0].required);
        assert!(decoded.fields[0].options.is_empty());
        assert_eq!(
            decoded.created_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
    }

    #[test]
    fn decode_without_fields_section() {
        let yaml = "collection:\n  name: A\n  type: b\n  created_at: 2024-05-01T10:00:00Z\n  updated_at: 2024-05-01T10:00:00Z\n";
        let decoded = decode(yaml).unwrap();
        assert!(decoded.fields.is_empty());
    }

    #[test]
    fn decode_rejects_non_mapping() {
        assert!(matches!(decode("- a\n- b\n"), Err(FormatError::NotAMapping)));
        assert!(matches!(decode("just text"), Err(FormatError::NotAMapping)));
    }

    #[test]
    fn decode_rejects_missing_collection_keys() {
        let yaml = "collection:\n  type: b\n  created_at: 2024-05-01T10:00:00Z\n  updated_at: 2024-05-01T10:00:00Z\n";
        assert!(matches!(
            decode(yaml),
            Err(FormatError::MissingKey("collection.name"))
        ));

        assert!(matches!(
            decode("fields: []\n"),
            Err(FormatError::MissingKey("collection"))
        ));
    }

    #[test]
    fn decode_rejects_field_without_type() {
        let yaml = r#"
collection:
  name: A
  type: b
  created_at: 2024-05-01T10:00:00Z
  updated_at: 2024-05-01T10:00:00Z
fields:
  - name: ok
    type: text
  - name: broken
"#;
        assert!(matches!(
            decode(yaml),
            Err(FormatError::MissingFieldKey { index: 1, key: "type" })
        ));
    }

    #[test]
    fn decode_rejects_bad_timestamp() {
        let yaml = "collection:\n  name: A\n  type: b\n  created_at: yesterday\n  updated_at: 2024-05-01T10:00:00Z\n";
        assert!(matches!(
            decode(yaml),
            Err(FormatError::InvalidTimestamp(ref s)) if s == "yesterday"
        ));
    }

    #[test]
    fn decode_reports_yaml_syntax_errors() {
        assert!(matches!(
            decode("collection: [unclosed\n"),
            Err(FormatError::Yaml(_))
        ));
    }
}
