//! Per-kind schemas: declared properties, computed properties and the
//! allow-list of fields exposed to external clients.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::Record;
use crate::error::{Error, QueryError};
use crate::humanize::{UTC_FORMAT, format_size};
use crate::types::{BlobKey, GeoPt, KeyId, Kind, RecordKey, Value};

/// Fields every kind exposes.
pub const IDENTITY_FIELDS: &[&str] = &["key", "id", "version", "created", "modified"];

const IMAGE_TYPES: &[&str] = &[
    "image/bmp",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/tiff",
    "image/x-icon",
];

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Key(Kind),
    Blob,
    GeoPt,
    /// Repeated property; filters compare against single elements.
    List(&'static FieldType),
    Record(Kind),
}

impl FieldType {
    fn describe(&self) -> String {
        match self {
            FieldType::Bool => "a boolean".to_string(),
            FieldType::Int => "an integer".to_string(),
            FieldType::Float => "a number".to_string(),
            FieldType::Text => "text".to_string(),
            FieldType::DateTime => "a 'YYYY-MM-DD HH:MM:SS UTC' or RFC 3339 timestamp".to_string(),
            FieldType::Key(kind) => format!("a {} key", kind),
            FieldType::Blob => "a blob key".to_string(),
            FieldType::GeoPt => "'lat,lon'".to_string(),
            FieldType::List(inner) => inner.describe(),
            FieldType::Record(kind) => format!("an embedded {}", kind),
        }
    }

    /// Read a textual value (typically a URL parameter) as this type.
    ///
    /// Booleans follow the form convention: `true`, `yes` and `1` are true,
    /// anything else is false.
    pub fn parse(&self, field: &str, raw: &str) -> Result<Value, Error> {
        let invalid = || {
            Error::Query(QueryError::InvalidFilterValue {
                field: field.to_string(),
                value: raw.to_string(),
                expected: self.describe(),
            })
        };

        let value = match self {
            FieldType::Bool => {
                Value::Bool(matches!(raw.to_lowercase().as_str(), "true" | "yes" | "1"))
            }
            FieldType::Int => Value::Int(raw.trim().parse().map_err(|_| invalid())?),
            FieldType::Float => Value::Float(raw.trim().parse().map_err(|_| invalid())?),
            FieldType::Text => Value::Text(raw.to_string()),
            FieldType::DateTime => Value::DateTime(parse_datetime(raw).ok_or_else(invalid)?),
            FieldType::Key(kind) => {
                let key = RecordKey::from_urlsafe(raw).map_err(|_| invalid())?;
                if key.kind() != *kind {
                    return Err(invalid());
                }
                Value::Key(key)
            }
            FieldType::Blob => Value::Blob(BlobKey::new(raw)),
            FieldType::GeoPt => {
                let (lat, lon) = raw.split_once(',').ok_or_else(invalid)?;
                let lat = lat.trim().parse().map_err(|_| invalid())?;
                let lon = lon.trim().parse().map_err(|_| invalid())?;
                Value::GeoPt(GeoPt::new(lat, lon))
            }
            FieldType::List(inner) => inner.parse(field, raw)?,
            FieldType::Record(_) => return Err(invalid()),
        };
        Ok(value)
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, UTC_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A stored property declaration.
#[derive(Debug, Clone, Copy)]
pub struct Property {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Property {
    const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// A property derived from other properties at read time.
#[derive(Debug, Clone, Copy)]
pub struct Computed {
    pub name: &'static str,
    pub ty: FieldType,
    pub compute: fn(&Record) -> Value,
}

/// Schema descriptor for one kind.
#[derive(Debug)]
pub struct Schema {
    pub kind: Kind,
    pub properties: &'static [Property],
    pub computed: &'static [Computed],
    /// Kind-specific allow-list; [`IDENTITY_FIELDS`] are always added.
    pub exposed: &'static [&'static str],
}

const BASE_PROPERTIES: &[Property] = &[
    Property::new("version", FieldType::Int),
    Property::new("created", FieldType::DateTime),
    Property::new("modified", FieldType::DateTime),
];

impl Schema {
    /// Type of a queryable field: base, declared or computed.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        BASE_PROPERTIES
            .iter()
            .chain(self.properties)
            .find(|p| p.name == name)
            .map(|p| p.ty)
            .or_else(|| self.computed.iter().find(|c| c.name == name).map(|c| c.ty))
    }

    /// The full allow-list, identity fields first.
    pub fn exposed(&self) -> impl Iterator<Item = &'static str> + '_ {
        IDENTITY_FIELDS.iter().chain(self.exposed).copied()
    }

    pub fn is_exposed(&self, name: &str) -> bool {
        self.exposed().any(|f| f == name)
    }

    /// Resolve a field of `record`, including `key`, `id` and computed
    /// properties. Unset fields resolve to `Null`.
    pub fn resolve(&self, record: &Record, name: &str) -> Value {
        match name {
            "key" => record.key().cloned().into(),
            "id" => match record.key().map(RecordKey::key_id) {
                Some(KeyId::Id(id)) => Value::Int(*id),
                Some(KeyId::Name(name)) => Value::Text(name.clone()),
                None => Value::Null,
            },
            _ => match self.computed.iter().find(|c| c.name == name) {
                Some(computed) => (computed.compute)(record),
                None => record.property(name),
            },
        }
    }
}

impl Kind {
    /// The static schema descriptor of this kind.
    pub fn schema(&self) -> &'static Schema {
        match self {
            Kind::Post => &POST,
            Kind::File => &FILE,
            Kind::Folder => &FOLDER,
            Kind::User => &USER,
            Kind::Config => &CONFIG,
        }
    }
}

static POST: Schema = Schema {
    kind: Kind::Post,
    properties: &[
        Property::new("title", FieldType::Text),
        Property::new("short_text", FieldType::Text),
        Property::new("text", FieldType::Text),
        Property::new("is_public", FieldType::Bool),
        Property::new("markdown", FieldType::Bool),
        Property::new("tags", FieldType::List(&FieldType::Text)),
    ],
    computed: &[],
    exposed: &["title", "short_text", "text", "is_public", "markdown", "tags"],
};

static FILE: Schema = Schema {
    kind: Kind::File,
    properties: &[
        Property::new("uid", FieldType::Text),
        Property::new("title", FieldType::Text),
        Property::new("description", FieldType::Text),
        Property::new("owner", FieldType::Key(Kind::User)),
        Property::new("is_public", FieldType::Bool),
        Property::new("url", FieldType::Text),
        Property::new("blob_key", FieldType::Blob),
        Property::new("filename", FieldType::Text),
        Property::new("size", FieldType::Int),
        Property::new("content_type", FieldType::Text),
    ],
    computed: &[
        Computed {
            name: "human_readable_size",
            ty: FieldType::Text,
            compute: file_human_readable_size,
        },
        Computed {
            name: "ext",
            ty: FieldType::Text,
            compute: file_ext,
        },
        Computed {
            name: "is_image",
            ty: FieldType::Bool,
            compute: file_is_image,
        },
        Computed {
            name: "title_filename",
            ty: FieldType::Text,
            compute: file_title_filename,
        },
    ],
    exposed: &[
        "uid",
        "title",
        "description",
        "owner",
        "is_public",
        "url",
        "blob_key",
        "filename",
        "size",
        "content_type",
        "human_readable_size",
        "ext",
        "is_image",
        "title_filename",
    ],
};

static FOLDER: Schema = Schema {
    kind: Kind::Folder,
    properties: &[
        Property::new("title", FieldType::Text),
        Property::new("is_public", FieldType::Bool),
        Property::new("files", FieldType::List(&FieldType::Key(Kind::File))),
    ],
    computed: &[],
    exposed: &["title", "is_public", "files"],
};

static USER: Schema = Schema {
    kind: Kind::User,
    properties: &[
        Property::new("name", FieldType::Text),
        Property::new("username", FieldType::Text),
        Property::new("email", FieldType::Text),
        Property::new("admin", FieldType::Bool),
        Property::new("active", FieldType::Bool),
        Property::new("verified", FieldType::Bool),
        Property::new("provider", FieldType::Text),
        Property::new("federated_id", FieldType::Text),
    ],
    computed: &[],
    exposed: &[
        "name", "username", "email", "admin", "active", "verified", "provider",
    ],
};

static CONFIG: Schema = Schema {
    kind: Kind::Config,
    properties: &[
        Property::new("brand_name", FieldType::Text),
        Property::new("analytics_id", FieldType::Text),
        Property::new("announcement_html", FieldType::Text),
        Property::new("announcement_type", FieldType::Text),
        Property::new("feedback_email", FieldType::Text),
        Property::new("base_url", FieldType::Text),
        Property::new("default_page_size", FieldType::Int),
        Property::new("feed_limit", FieldType::Int),
        Property::new("google_site_id", FieldType::Text),
        Property::new("recaptcha_public_key", FieldType::Text),
        Property::new("recaptcha_private_key", FieldType::Text),
        Property::new("search_api_key", FieldType::Text),
        Property::new("flask_secret_key", FieldType::Text),
    ],
    computed: &[],
    exposed: &[
        "brand_name",
        "analytics_id",
        "announcement_html",
        "announcement_type",
        "feedback_email",
        "base_url",
        "default_page_size",
        "feed_limit",
        "google_site_id",
        "recaptcha_public_key",
    ],
};

fn file_human_readable_size(record: &Record) -> Value {
    match record.get("size").and_then(Value::as_i64) {
        Some(size) if size >= 0 => Value::Text(format_size(size as u64, 2)),
        _ => Value::Null,
    }
}

fn file_ext(record: &Record) -> Value {
    match record.text("filename") {
        Some(filename) => Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .into(),
        None => Value::Null,
    }
}

fn file_is_image(record: &Record) -> Value {
    let content_type = record.text("content_type").unwrap_or("");
    Value::Bool(IMAGE_TYPES.contains(&content_type))
}

fn file_title_filename(record: &Record) -> Value {
    let ext = file_ext(record);
    let ext = ext.as_str().unwrap_or("");
    match (record.text("title"), record.text("filename")) {
        (Some(title), _) if !title.is_empty() && !ext.is_empty() => {
            Value::Text(format!("{}.{}", title, ext))
        }
        (_, Some(filename)) if !filename.is_empty() => Value::Text(filename.to_string()),
        _ => record.property("uid"),
    }
}
