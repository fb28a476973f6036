//! Site configuration.
//!
//! Configuration lives in the `Config` record named `master`. It is read
//! once by the caller and passed by reference to whatever needs it.

use serde::{Deserialize, Serialize};

use crate::model::Record;
use crate::types::{Kind, RecordKey, Value};

/// Name of the configuration record.
pub const MASTER_CONFIG: &str = "master";

/// Page size used when a query does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 64;

/// Number of entries in syndication feeds.
pub const DEFAULT_FEED_LIMIT: usize = 20;

/// Kind of the site-wide announcement banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    #[default]
    Info,
    Warning,
    Success,
    Danger,
}

impl AnnouncementType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "success" => Some(Self::Success),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }
}

/// Settings threaded explicitly into retrieval and rendering helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub brand_name: String,
    pub default_page_size: usize,
    pub feed_limit: usize,
    pub analytics_id: String,
    pub announcement_html: String,
    pub announcement_type: AnnouncementType,
    pub feedback_email: String,
    /// Public origin, used for absolute `more_url` links.
    pub base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand_name: "folio".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            feed_limit: DEFAULT_FEED_LIMIT,
            analytics_id: String::new(),
            announcement_html: String::new(),
            announcement_type: AnnouncementType::default(),
            feedback_email: String::new(),
            base_url: None,
        }
    }
}

impl SiteConfig {
    /// Key of the configuration record.
    pub fn master_key() -> RecordKey {
        RecordKey::named(Kind::Config, MASTER_CONFIG)
    }

    /// Build from a `Config` record, defaulting whatever it leaves unset.
    /// Non-positive sizes fall back to the defaults.
    pub fn from_record(record: &Record) -> Self {
        let defaults = Self::default();
        let text = |name: &str, default: String| {
            record
                .text(name)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or(default)
        };
        let size = |name: &str, default: usize| {
            record
                .get(name)
                .and_then(Value::as_i64)
                .filter(|n| *n > 0)
                .map(|n| n as usize)
                .unwrap_or(default)
        };

        Self {
            brand_name: text("brand_name", defaults.brand_name),
            default_page_size: size("default_page_size", defaults.default_page_size),
            feed_limit: size("feed_limit", defaults.feed_limit),
            analytics_id: text("analytics_id", defaults.analytics_id),
            announcement_html: text("announcement_html", defaults.announcement_html),
            announcement_type: record
                .text("announcement_type")
                .and_then(AnnouncementType::parse)
                .unwrap_or(defaults.announcement_type),
            feedback_email: text("feedback_email", defaults.feedback_email),
            base_url: record
                .text("base_url")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Build from an optional record, as returned by a datastore lookup.
    pub fn from_optional(record: Option<&Record>) -> Self {
        record.map(Self::from_record).unwrap_or_default()
    }

    /// Whether a site-wide announcement should be shown.
    pub fn has_announcement(&self) -> bool {
        !self.announcement_html.trim().is_empty()
    }
}
