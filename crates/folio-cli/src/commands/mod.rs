//! Subcommand implementations.

pub mod ago;
pub mod archive;
pub mod config;
pub mod delete;
pub mod find;
pub mod get;
pub mod list;
pub mod put;
pub mod size;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use folio_core::model::FieldType;
use folio_core::{Datastore, Kind, QuerySpec, Record, RecordKey, SiteConfig, retrieve};

/// Parse a kind name, case-insensitively.
pub fn parse_kind(raw: &str) -> Result<Kind> {
    raw.parse::<Kind>()
        .with_context(|| format!("Unknown kind '{}'", raw))
}

/// Split a `field=value` argument.
pub fn split_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => bail!("Expected FIELD=VALUE, got '{}'", raw),
    }
}

/// Group `field=value` arguments by field, keeping first-seen order.
pub fn group_assignments(raw: &[String]) -> Result<Vec<(String, Vec<String>)>> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for item in raw {
        let (field, value) = split_assignment(item)?;
        match grouped.iter_mut().find(|(f, _)| f == field) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((field.to_string(), vec![value.to_string()])),
        }
    }
    Ok(grouped)
}

/// Key of `kind` from an id argument: numeric ids first, names otherwise.
pub fn key_for(kind: Kind, id: &str) -> RecordKey {
    match id.parse::<i64>() {
        Ok(id) => RecordKey::id(kind, id),
        Err(_) => RecordKey::named(kind, id),
    }
}

/// Key from either a URL-safe key or a kind plus id.
pub fn resolve_key(target: &str, id: Option<&str>) -> Result<RecordKey> {
    match id {
        Some(id) => Ok(key_for(parse_kind(target)?, id)),
        None => RecordKey::from_urlsafe(target).context("Invalid record key"),
    }
}

/// Parse a timestamp in the display format or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    FieldType::DateTime
        .parse("timestamp", raw)?
        .as_datetime()
        .context("Not a timestamp")
}

/// Follow cursors until the query is exhausted.
pub async fn fetch_all<S>(store: &S, config: &SiteConfig, spec: &QuerySpec) -> Result<Vec<Record>>
where
    S: Datastore + ?Sized,
{
    let mut records = Vec::new();
    let mut cursor = None;
    loop {
        let page = retrieve(store, config, &spec.clone().cursor(cursor))
            .await
            .context("Failed to retrieve records")?;
        records.extend(page.records);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(records),
        }
    }
}
