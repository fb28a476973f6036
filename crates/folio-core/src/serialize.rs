//! Conversion of records into JSON-safe mappings.
//!
//! Only fields on a kind's allow-list are ever emitted. Unset fields are
//! left out rather than written as `null`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Number, Value as Json};

use crate::humanize::format_datetime_utc;
use crate::model::Record;
use crate::types::Value;

/// Largest integer a double-precision float represents exactly.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Characters left unescaped in blob keys, matching URL path quoting.
const BLOB_KEY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'/');

/// Serialize a record through its kind's allow-list.
///
/// # Example
///
/// ```
/// use folio_core::{Kind, Record, RecordKey, to_json};
///
/// let post = Record::new(Kind::Post)
///     .with_key(RecordKey::id(Kind::Post, 7))
///     .with("title", "Hello");
/// let json = to_json(&post);
/// assert_eq!(json["id"], 7);
/// assert_eq!(json["title"], "Hello");
/// assert!(!json.contains_key("text"));
/// ```
pub fn to_json(record: &Record) -> Map<String, Json> {
    let schema = record.schema();
    schema
        .exposed()
        .filter_map(|field| {
            value_to_json(&schema.resolve(record, field)).map(|v| (field.to_string(), v))
        })
        .collect()
}

/// Serialize a list of records.
pub fn to_json_list<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<Json> {
    records.into_iter().map(|r| Json::Object(to_json(r))).collect()
}

/// Convert one property value. Returns `None` for `Null`.
///
/// Integers beyond ±(2^53 − 1) become decimal strings so JavaScript
/// clients do not lose precision.
pub fn value_to_json(value: &Value) -> Option<Json> {
    let json = match value {
        Value::Null => return None,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => int_to_json(*i),
        Value::Float(f) => Json::Number(Number::from_f64(*f)?),
        Value::Text(s) => Json::String(s.clone()),
        Value::DateTime(dt) => Json::String(format_datetime_utc(dt)),
        Value::Key(key) => Json::String(key.to_urlsafe()),
        Value::Blob(blob) => Json::String(utf8_percent_encode(blob.as_str(), BLOB_KEY).to_string()),
        Value::GeoPt(pt) => Json::String(pt.to_string()),
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|item| value_to_json(item).unwrap_or(Json::Null))
                .collect(),
        ),
        Value::Record(nested) => Json::Object(to_json(nested)),
    };
    Some(json)
}

fn int_to_json(i: i64) -> Json {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&i) {
        Json::Number(i.into())
    } else {
        Json::String(i.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlobKey, GeoPt, Kind, RecordKey};
    use chrono::{TimeZone, Utc};

    fn post() -> Record {
        Record::new(Kind::Post)
            .with_key(RecordKey::id(Kind::Post, 12))
            .with_created(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap())
            .with("title", "Parsing in Rust")
            .with("tags", vec!["rust", "parsing"])
            .with("is_public", true)
    }

    #[test]
    fn only_allow_listed_fields() {
        let record = post().with("draft_notes", "secret");
        let json = to_json(&record);
        let schema = record.schema();

        assert!(json.keys().all(|k| schema.is_exposed(k)));
        assert!(!json.contains_key("draft_notes"));
    }

    #[test]
    fn every_set_allow_listed_field_appears() {
        let record = post();
        let json = to_json(&record);
        let schema = record.schema();

        for field in schema.exposed() {
            let present = !schema.resolve(&record, field).is_null();
            assert_eq!(json.contains_key(field), present, "field {}", field);
        }
    }

    #[test]
    fn identity_fields() {
        let json = to_json(&post());
        assert_eq!(json["id"], 12);
        assert_eq!(json["created"], "2020-01-02 03:04:05 UTC");
        assert_eq!(
            json["key"],
            Json::String(RecordKey::id(Kind::Post, 12).to_urlsafe())
        );
        assert!(!json.contains_key("modified"));
    }

    #[test]
    fn missing_key_omits_id() {
        let json = to_json(&Record::new(Kind::Post).with("title", "draft"));
        assert!(!json.contains_key("id"));
        assert!(!json.contains_key("key"));
        assert_eq!(json["title"], "draft");
    }

    #[test]
    fn named_key_id_is_string() {
        let record = Record::new(Kind::Config).with_key(RecordKey::named(Kind::Config, "master"));
        assert_eq!(to_json(&record)["id"], "master");
    }

    #[test]
    fn large_integers_become_strings() {
        let big = Record::new(Kind::File).with("size", 1_i64 << 60);
        assert_eq!(to_json(&big)["size"], Json::String("1152921504606846976".into()));

        let small = Record::new(Kind::File).with("size", 42_i64);
        assert_eq!(to_json(&small)["size"], Json::Number(42.into()));
    }

    #[test]
    fn safe_integer_boundary() {
        assert!(value_to_json(&Value::Int(MAX_SAFE_INTEGER)).unwrap().is_number());
        assert!(value_to_json(&Value::Int(MAX_SAFE_INTEGER + 1)).unwrap().is_string());
        assert!(value_to_json(&Value::Int(-MAX_SAFE_INTEGER)).unwrap().is_number());
        assert!(value_to_json(&Value::Int(-MAX_SAFE_INTEGER - 1)).unwrap().is_string());
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(
            value_to_json(&Value::Blob(BlobKey::new("AMI fa/b+c"))).unwrap(),
            "AMI%20fa/b%2Bc"
        );
        assert_eq!(
            value_to_json(&Value::Blob(BlobKey::new("~user/a_b-c.d"))).unwrap(),
            "%7Euser/a_b-c.d"
        );
        assert_eq!(
            value_to_json(&Value::GeoPt(GeoPt::new(59.93, 30.31))).unwrap(),
            "59.93,30.31"
        );
        assert_eq!(value_to_json(&Value::Null), None);
    }

    #[test]
    fn lists_convert_elementwise() {
        let keys = Value::from(vec![
            RecordKey::id(Kind::File, 1),
            RecordKey::id(Kind::File, 2),
        ]);
        let json = value_to_json(&keys).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], RecordKey::id(Kind::File, 2).to_urlsafe());
    }

    #[test]
    fn nested_records_use_their_own_allow_list() {
        let owner = Record::new(Kind::User)
            .with_key(RecordKey::id(Kind::User, 3))
            .with("name", "Alexander")
            .with("federated_id", "github:42");

        let json = value_to_json(&Value::from(owner)).unwrap();
        assert_eq!(json["name"], "Alexander");
        assert_eq!(json["id"], 3);
        assert!(json.get("federated_id").is_none());
    }
}
