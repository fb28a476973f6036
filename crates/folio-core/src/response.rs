//! JSON response envelopes handed back to clients.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value as Json};
use url::Url;

use crate::humanize::format_datetime_utc;
use crate::model::Record;
use crate::retrieve::Page;
use crate::serialize::{to_json, to_json_list};

const SUCCESS: &str = "success";

/// Query parameter carrying the continuation cursor.
pub const CURSOR_PARAM: &str = "cursor";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse {
    pub status: &'static str,
    pub count: usize,
    pub now: String,
    pub result: Vec<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more_url: Option<String>,
}

impl ListResponse {
    /// Wrap a page. `request_url`, when known, is used to build `more_url`.
    pub fn from_page(page: &Page, request_url: Option<&Url>, now: DateTime<Utc>) -> Self {
        let result = to_json_list(&page.records);
        let more_url = match (&page.next_cursor, request_url) {
            (Some(cursor), Some(base)) => Some(more_url(base, cursor).to_string()),
            _ => None,
        };
        Self {
            status: SUCCESS,
            count: result.len(),
            now: format_datetime_utc(&now),
            result,
            more_cursor: page.next_cursor.clone(),
            more_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResponse {
    pub status: &'static str,
    pub now: String,
    pub result: Map<String, Json>,
}

impl ItemResponse {
    pub fn new(record: &Record, now: DateTime<Utc>) -> Self {
        Self {
            status: SUCCESS,
            now: format_datetime_utc(&now),
            result: to_json(record),
        }
    }
}

/// `base` with its `cursor` parameter set to `cursor`; other parameters
/// keep their order.
pub fn more_url(base: &Url, cursor: &str) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(name, _)| *name != CURSOR_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(CURSOR_PARAM, cursor);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Kind, RecordKey};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn more_url_replaces_cursor() {
        let base = Url::parse("https://example.org/api/post/?order=-created&cursor=old&limit=5")
            .unwrap();
        let url = more_url(&base, "next");
        assert_eq!(
            url.as_str(),
            "https://example.org/api/post/?order=-created&limit=5&cursor=next"
        );
    }

    #[test]
    fn more_url_adds_cursor() {
        let base = Url::parse("https://example.org/api/post/").unwrap();
        assert_eq!(
            more_url(&base, "abc").as_str(),
            "https://example.org/api/post/?cursor=abc"
        );
    }

    #[test]
    fn list_envelope_shape() {
        let page = Page {
            records: vec![
                Record::new(Kind::Post)
                    .with_key(RecordKey::id(Kind::Post, 1))
                    .with("title", "One"),
            ],
            next_cursor: Some("tok".to_string()),
        };
        let base = Url::parse("https://example.org/api/post/").unwrap();
        let response = ListResponse::from_page(&page, Some(&base), now());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["count"], 1);
        assert_eq!(json["now"], "2024-03-01 08:30:00 UTC");
        assert_eq!(json["result"][0]["title"], "One");
        assert_eq!(json["more_cursor"], "tok");
        assert_eq!(json["more_url"], "https://example.org/api/post/?cursor=tok");
    }

    #[test]
    fn last_page_omits_continuation() {
        let response = ListResponse::from_page(&Page::default(), None, now());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json.get("more_cursor").is_none());
        assert!(json.get("more_url").is_none());
    }

    #[test]
    fn item_envelope() {
        let record = Record::new(Kind::Post)
            .with_key(RecordKey::id(Kind::Post, 3))
            .with("title", "Three");
        let json = serde_json::to_value(ItemResponse::new(&record, now())).unwrap();
        assert_eq!(json["result"]["id"], 3);
        assert!(json.get("count").is_none());
    }
}
