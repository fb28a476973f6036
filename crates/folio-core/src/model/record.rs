//! The record type.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Schema;
use crate::types::{Kind, RecordKey, Value};

/// A structured entity persisted in the datastore.
///
/// Records carry their kind, an optional key (absent until first stored),
/// the implicit `created`/`modified` timestamps and a set of named
/// property values. Which of those reach the outside world is decided by
/// the kind's [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<RecordKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modified: Option<DateTime<Utc>>,
    #[serde(default)]
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty, unsaved record of the given kind.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            key: None,
            created: None,
            modified: None,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style key setter.
    pub fn with_key(mut self, key: RecordKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Builder-style creation timestamp.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    pub fn key(&self) -> Option<&RecordKey> {
        self.key.as_ref()
    }

    pub fn set_key(&mut self, key: RecordKey) {
        self.key = Some(key);
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// Deploy version that first stored the record.
    pub fn version(&self) -> Option<i64> {
        self.get("version").and_then(Value::as_i64)
    }

    pub fn set_created(&mut self, created: DateTime<Utc>) {
        self.created = Some(created);
    }

    /// Stamp the implicit timestamps for a write at `now`: `created` is set
    /// once, `modified` on every write.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created.is_none() {
            self.created = Some(now);
        }
        self.modified = Some(now);
    }

    /// Set a stored property. Setting `Null` removes it.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        if value.is_null() {
            self.fields.remove(name);
        } else {
            self.fields.insert(name.to_string(), value);
        }
    }

    /// Get a stored property.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a property by name, including the implicit timestamps.
    ///
    /// Returns `Null` for anything unset.
    pub fn property(&self, name: &str) -> Value {
        match name {
            "created" => self.created.into(),
            "modified" => self.modified.into(),
            _ => self.fields.get(name).cloned().unwrap_or(Value::Null),
        }
    }

    /// Text property shortcut.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Iterate stored properties.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn touch_sets_created_once() {
        let first = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();

        let mut record = Record::new(Kind::Post);
        record.touch(first);
        record.touch(second);

        assert_eq!(record.created(), Some(first));
        assert_eq!(record.modified(), Some(second));
    }

    #[test]
    fn setting_null_removes() {
        let mut record = Record::new(Kind::Post).with("title", "hello");
        assert_eq!(record.text("title"), Some("hello"));

        record.set("title", Value::Null);
        assert!(record.get("title").is_none());
        assert_eq!(record.property("title"), Value::Null);
    }

    #[test]
    fn implicit_timestamps_are_properties() {
        let created = Utc.with_ymd_and_hms(2021, 5, 4, 3, 2, 1).unwrap();
        let record = Record::new(Kind::Post).with_created(created);
        assert_eq!(record.property("created"), Value::DateTime(created));
        assert_eq!(record.property("modified"), Value::Null);
    }
}
