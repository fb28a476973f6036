//! Datastore trait.

use async_trait::async_trait;

use crate::Result;
use crate::model::Record;
use crate::query::Query;
use crate::types::RecordKey;

/// One slice of a query's results as returned by a backend.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// Records in query order.
    pub records: Vec<Record>,
    /// Whether further results exist past this slice.
    pub more: bool,
}

/// A document datastore holding records by kind.
///
/// Implementations own persistence; consistency of pages under concurrent
/// writes is whatever the backend natively provides.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Fetch a record by key.
    async fn get(&self, key: &RecordKey) -> Result<Option<Record>>;

    /// Store a record, allocating a key when it has none.
    ///
    /// Stamps `created` on first write and `modified` on every write.
    async fn put(&self, record: Record) -> Result<RecordKey>;

    /// Delete a record. Deleting a missing record is not an error.
    async fn delete(&self, key: &RecordKey) -> Result<()>;

    /// Execute `query`, skipping `offset` results and returning at most
    /// `limit`.
    async fn fetch_page(&self, query: &Query, offset: usize, limit: usize)
    -> Result<FetchedPage>;
}
