//! Query specifications and their compiled form.
//!
//! Route handlers describe what they want with a [`QuerySpec`]: the kind,
//! an order spec string, equality filters, an optional archive period, a
//! page size and a cursor. Compiling it against the kind's schema yields
//! a [`Query`], which is what a [`Datastore`](crate::Datastore) executes.

mod filter;
mod order;
mod period;

use std::cmp::Ordering;

use sha2::{Digest, Sha256};

pub use filter::{Equality, FilterValue, compile_filters};
pub use order::{SortKey, parse_order};
pub use period::Period;

use crate::Result;
use crate::model::{Record, Schema};
use crate::types::Kind;

/// Order applied when a spec does not name one.
pub const DEFAULT_ORDER: &str = "-created";

/// A caller's description of a page of records.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    kind: Kind,
    order: Option<String>,
    filters: Vec<(String, FilterValue)>,
    period: Option<Period>,
    limit: Option<usize>,
    cursor: Option<String>,
}

impl QuerySpec {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            order: None,
            filters: Vec::new(),
            period: None,
            limit: None,
            cursor: None,
        }
    }

    /// Comma-separated order spec, e.g. `-created,title`.
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Add an equality filter.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Restrict to records created within `period`.
    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Page size; zero means the configured default.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume after a cursor returned by an earlier page of the same query.
    pub fn cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn requested_limit(&self) -> Option<usize> {
        self.limit.filter(|l| *l > 0)
    }

    pub fn requested_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }

    /// Type-check the order and filters against the kind's schema.
    ///
    /// # Errors
    ///
    /// Fails on unknown order or filter fields and on filter values that do
    /// not fit their property.
    pub fn compile(&self) -> Result<Query> {
        let schema = self.kind.schema();
        let order = parse_order(schema, self.order.as_deref().unwrap_or(DEFAULT_ORDER))?;
        let filters = compile_filters(schema, &self.filters)?;
        Ok(Query {
            kind: self.kind,
            order,
            filters,
            period: self.period,
        })
    }
}

/// A type-checked query, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: Kind,
    pub order: Vec<SortKey>,
    pub filters: Vec<Equality>,
    pub period: Option<Period>,
}

impl Query {
    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    /// Fingerprint of the query shape. Cursors remember it so they are
    /// only resumed against the query that issued them.
    ///
    /// Computed over a canonical byte encoding with SHA-256, so cursors
    /// stay valid across rebuilds.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.as_str());
        for key in &self.order {
            hasher.update(if key.descending { b"\x01-" } else { b"\x01+" });
            hasher.update(&key.field);
        }
        for filter in &self.filters {
            hasher.update(b"\x02");
            hasher.update(&filter.field);
            hasher.update(b"\x00");
            hasher.update(serde_json::to_vec(&filter.value).unwrap_or_default());
        }
        if let Some(period) = &self.period {
            hasher.update(b"\x03");
            hasher.update(period.from.timestamp().to_be_bytes());
            hasher.update(period.to.timestamp().to_be_bytes());
        }
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head)
    }

    /// Check a record against the kind, the filters and the period.
    pub fn matches(&self, record: &Record) -> bool {
        if record.kind() != self.kind {
            return false;
        }
        let schema = self.schema();
        if !self.filters.iter().all(|f| f.matches(schema, record)) {
            return false;
        }
        match (&self.period, record.created()) {
            (Some(period), Some(created)) => period.contains(&created),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// Compare two records by the successive sort keys, then by key so
    /// the order is total and pages never overlap.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let schema = self.schema();
        for key in &self.order {
            let ord = schema
                .resolve(a, &key.field)
                .sort_cmp(&schema.resolve(b, &key.field));
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.key().cmp(&b.key())
    }

    /// Filter and sort a candidate set in memory.
    pub fn apply(&self, records: impl IntoIterator<Item = Record>) -> Vec<Record> {
        let mut matched: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();
        matched.sort_by(|a, b| self.compare(a, b));
        matched
    }
}
