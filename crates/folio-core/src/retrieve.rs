//! Cursor-paginated retrieval.

use tracing::{debug, instrument};

use crate::Result;
use crate::config::SiteConfig;
use crate::model::Record;
use crate::query::{FilterValue, QuerySpec};
use crate::traits::Datastore;
use crate::types::{Cursor, Kind, RecordKey, Value};

/// A page of records plus the cursor of the next page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<Record>,
    /// Present only when more records exist past this page.
    pub next_cursor: Option<String>,
}

/// Fetch one page of `spec` from `store`.
///
/// The page size falls back to `config.default_page_size`. Following
/// `next_cursor` with the same spec visits every matching record exactly
/// once, in query order.
///
/// # Errors
///
/// Unknown order/filter fields fail before the store is touched. A cursor
/// that does not decode, or that was issued for a different query shape,
/// fails with [`QueryError::InvalidCursor`](crate::error::QueryError);
/// callers restart from the first page (see [`Error::is_invalid_cursor`](crate::Error::is_invalid_cursor)).
#[instrument(skip(store, config, spec), fields(kind = %spec.kind()))]
pub async fn retrieve<S>(store: &S, config: &SiteConfig, spec: &QuerySpec) -> Result<Page>
where
    S: Datastore + ?Sized,
{
    let query = spec.compile()?;
    let shape = query.fingerprint();
    let limit = spec.requested_limit().unwrap_or(config.default_page_size).max(1);

    let offset = match spec.requested_cursor() {
        Some(raw) => Cursor::from_websafe(raw)?.resume(shape)?,
        None => 0,
    };

    let fetched = store.fetch_page(&query, offset, limit).await?;
    let next_cursor = fetched
        .more
        .then(|| Cursor::new(offset + fetched.records.len(), shape).to_websafe());

    debug!(
        offset,
        limit,
        count = fetched.records.len(),
        more = fetched.more,
        "Retrieved page"
    );

    Ok(Page {
        records: fetched.records,
        next_cursor,
    })
}

/// Fetch the first record whose `field` equals `value`.
pub async fn retrieve_one_by<S>(
    store: &S,
    kind: Kind,
    field: &str,
    value: impl Into<Value>,
) -> Result<Option<Record>>
where
    S: Datastore + ?Sized,
{
    let query = QuerySpec::new(kind)
        .filter(field, FilterValue::One(value.into()))
        .compile()?;
    let fetched = store.fetch_page(&query, 0, 1).await?;
    Ok(fetched.records.into_iter().next())
}

/// Fetch a record by its numeric id given as text.
///
/// Text that is not an integer yields `None`.
pub async fn retrieve_by_id<S>(store: &S, kind: Kind, id: &str) -> Result<Option<Record>>
where
    S: Datastore + ?Sized,
{
    match id.trim().parse::<i64>() {
        Ok(id) => store.get(&RecordKey::id(kind, id)).await,
        Err(_) => Ok(None),
    }
}

/// Fetch a record by URL-safe key. Keys that do not decode yield `None`.
pub async fn retrieve_by_urlsafe<S>(store: &S, key: &str) -> Result<Option<Record>>
where
    S: Datastore + ?Sized,
{
    match RecordKey::from_urlsafe(key) {
        Ok(key) => store.get(&key).await,
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    use crate::query::{Period, Query};
    use crate::traits::FetchedPage;

    /// In-memory store executing queries with [`Query::apply`].
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<BTreeMap<RecordKey, Record>>,
    }

    #[async_trait]
    impl Datastore for MemoryStore {
        async fn get(&self, key: &RecordKey) -> Result<Option<Record>> {
            Ok(self.records.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, mut record: Record) -> Result<RecordKey> {
            let mut records = self.records.lock().unwrap();
            let key = match record.key() {
                Some(key) => key.clone(),
                None => RecordKey::id(record.kind(), records.len() as i64 + 1),
            };
            record.set_key(key.clone());
            records.insert(key.clone(), record);
            Ok(key)
        }

        async fn delete(&self, key: &RecordKey) -> Result<()> {
            self.records.lock().unwrap().remove(key);
            Ok(())
        }

        async fn fetch_page(
            &self,
            query: &Query,
            offset: usize,
            limit: usize,
        ) -> Result<FetchedPage> {
            let all = query.apply(self.records.lock().unwrap().values().cloned());
            let more = all.len() > offset + limit;
            let records = all.into_iter().skip(offset).take(limit).collect();
            Ok(FetchedPage { records, more })
        }
    }

    async fn seeded(count: i64) -> MemoryStore {
        let store = MemoryStore::default();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        for i in 0..count {
            let record = Record::new(Kind::Post)
                .with_created(start + Duration::days(i))
                .with("title", format!("post {}", i))
                .with("is_public", i % 2 == 0);
            store.put(record).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn following_cursors_visits_everything_once() {
        let store = seeded(10).await;
        let config = SiteConfig::default();
        let spec = QuerySpec::new(Kind::Post).order("-created").limit(3);

        let mut seen = Vec::new();
        let mut cursor = None;
        let mut pages = 0;
        loop {
            let page = retrieve(&store, &config, &spec.clone().cursor(cursor))
                .await
                .unwrap();
            assert!(page.records.len() <= 3);
            seen.extend(page.records.iter().map(|r| r.created().unwrap()));
            pages += 1;
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(pages, 4);
        assert_eq!(seen.len(), 10);
        assert!(seen.windows(2).all(|w| w[0] > w[1]));
    }

    #[tokio::test]
    async fn exact_multiple_has_no_trailing_cursor() {
        let store = seeded(4).await;
        let spec = QuerySpec::new(Kind::Post).limit(2);
        let config = SiteConfig::default();

        let first = retrieve(&store, &config, &spec).await.unwrap();
        let second = retrieve(&store, &config, &spec.clone().cursor(first.next_cursor))
            .await
            .unwrap();
        assert_eq!(second.records.len(), 2);
        assert!(second.next_cursor.is_none());
    }

    #[tokio::test]
    async fn limit_defaults_to_config() {
        let store = seeded(5).await;
        let config = SiteConfig {
            default_page_size: 2,
            ..SiteConfig::default()
        };

        let page = retrieve(&store, &config, &QuerySpec::new(Kind::Post))
            .await
            .unwrap();
        assert_eq!(page.records.len(), 2);
        assert!(page.next_cursor.is_some());

        let page = retrieve(&store, &config, &QuerySpec::new(Kind::Post).limit(0))
            .await
            .unwrap();
        assert_eq!(page.records.len(), 2);
    }

    #[tokio::test]
    async fn cursor_from_other_query_is_rejected() {
        let store = seeded(6).await;
        let config = SiteConfig::default();

        let page = retrieve(&store, &config, &QuerySpec::new(Kind::Post).limit(2))
            .await
            .unwrap();
        let foreign = QuerySpec::new(Kind::Post)
            .filter("is_public", true)
            .limit(2)
            .cursor(page.next_cursor);

        let err = retrieve(&store, &config, &foreign).await.unwrap_err();
        assert!(err.is_invalid_cursor());
    }

    #[tokio::test]
    async fn garbage_cursor_is_rejected() {
        let store = seeded(1).await;
        let spec = QuerySpec::new(Kind::Post).cursor(Some("%%%".to_string()));
        let err = retrieve(&store, &SiteConfig::default(), &spec)
            .await
            .unwrap_err();
        assert!(err.is_invalid_cursor());
    }

    #[tokio::test]
    async fn unknown_fields_fail_fast() {
        let store = seeded(1).await;
        let config = SiteConfig::default();

        let spec = QuerySpec::new(Kind::Post).order("-rating");
        assert!(retrieve(&store, &config, &spec).await.is_err());

        let spec = QuerySpec::new(Kind::Post).filter("author", "me");
        assert!(retrieve(&store, &config, &spec).await.is_err());
    }

    #[tokio::test]
    async fn filters_and_periods_apply() {
        let store = seeded(40).await;
        let config = SiteConfig::default();

        let spec = QuerySpec::new(Kind::Post)
            .filter("is_public", "true")
            .period(Period::month(2020, Some(1)).unwrap());
        let page = retrieve(&store, &config, &spec).await.unwrap();

        assert_eq!(page.records.len(), 16);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn lookup_helpers() {
        let store = seeded(3).await;

        let found = retrieve_one_by(&store, Kind::Post, "title", "post 1")
            .await
            .unwrap()
            .unwrap();
        let key = found.key().unwrap().clone();

        assert!(
            retrieve_by_id(&store, Kind::Post, "2")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            retrieve_by_id(&store, Kind::Post, "two")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(
            retrieve_by_urlsafe(&store, &key.to_urlsafe())
                .await
                .unwrap()
                .as_ref(),
            Some(&found)
        );
        assert!(
            retrieve_by_urlsafe(&store, "nonsense")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            retrieve_one_by(&store, Kind::Post, "title", "missing")
                .await
                .unwrap()
                .is_none()
        );
    }
}
