//! Record key type.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Kind;
use crate::error::{Error, InvalidInputError};

/// The identifier part of a key: a numeric id or a string name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyId {
    /// Numeric id allocated by the datastore.
    Id(i64),
    /// Caller-chosen name (e.g. the `master` config record).
    Name(String),
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Id(id) => write!(f, "{}", id),
            KeyId::Name(name) => f.write_str(name),
        }
    }
}

/// A key identifying a single record.
///
/// Keys travel over the wire as an opaque URL-safe string.
///
/// # Example
///
/// ```
/// use folio_core::{Kind, RecordKey};
///
/// let key = RecordKey::id(Kind::Post, 42);
/// let encoded = key.to_urlsafe();
/// assert_eq!(RecordKey::from_urlsafe(&encoded).unwrap(), key);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    kind: Kind,
    id: KeyId,
}

impl RecordKey {
    /// Create a key with a numeric id.
    pub fn id(kind: Kind, id: i64) -> Self {
        Self {
            kind,
            id: KeyId::Id(id),
        }
    }

    /// Create a key with a string name.
    pub fn named(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: KeyId::Name(name.into()),
        }
    }

    /// Returns the kind of the keyed record.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the id or name.
    pub fn key_id(&self) -> &KeyId {
        &self.id
    }

    /// Encode the key as an opaque URL-safe string.
    pub fn to_urlsafe(&self) -> String {
        let raw = match &self.id {
            KeyId::Id(id) => format!("{}:i:{}", self.kind, id),
            KeyId::Name(name) => format!("{}:n:{}", self.kind, name),
        };
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    /// Decode a key produced by [`RecordKey::to_urlsafe`].
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid encoded key.
    pub fn from_urlsafe(s: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| InvalidInputError::Key {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(s.trim())
            .map_err(|_| invalid("not URL-safe base64"))?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid("not UTF-8"))?;

        let parts: Vec<&str> = raw.splitn(3, ':').collect();
        if parts.len() != 3 {
            return Err(invalid("must have format '<kind>:<i|n>:<id>'").into());
        }

        let kind: Kind = parts[0].parse()?;
        let id = match parts[1] {
            "i" => KeyId::Id(parts[2].parse().map_err(|_| invalid("id is not an integer"))?),
            "n" if !parts[2].is_empty() => KeyId::Name(parts[2].to_string()),
            "n" => return Err(invalid("name cannot be empty").into()),
            _ => return Err(invalid("unknown id tag").into()),
        };

        Ok(Self { kind, id })
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            KeyId::Id(id) => write!(f, "{}({})", self.kind, id),
            KeyId::Name(name) => write!(f, "{}('{}')", self.kind, name),
        }
    }
}

impl FromStr for RecordKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_urlsafe(s)
    }
}
