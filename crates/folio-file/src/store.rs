//! Filesystem storage: one JSON document per record.
//!
//! Layout under the root directory:
//!
//! ```text
//! records/<Kind>/i-<id>.json      numeric ids
//! records/<Kind>/n-<hex>.json     named keys, name hex-encoded
//! ids.json                        last allocated id per kind
//! ids.lock                        exclusive lock for id allocation
//! ```

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use folio_core::error::{Error, InvalidInputError, StorageError};
use folio_core::query::Query;
use folio_core::traits::{Datastore, FetchedPage};
use folio_core::types::{KeyId, Kind, RecordKey};
use folio_core::{Record, Result};

fn corrupt(path: &Path, err: impl ToString) -> Error {
    Error::Storage(StorageError::Corrupt {
        location: path.display().to_string(),
        message: err.to_string(),
    })
}

fn encode_err(err: serde_json::Error) -> Error {
    Error::Storage(StorageError::Serialization {
        message: err.to_string(),
    })
}

/// Filesystem-backed document datastore.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    version: i64,
}

impl FileStore {
    /// Create a store rooted at the given directory. Nothing is created
    /// until the first write.
    ///
    /// New records are stamped with the time the store was opened as
    /// their `version` unless [`FileStore::with_version`] sets one.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            version: Utc::now().timestamp(),
        }
    }

    /// Version stamped on records stored for the first time, typically
    /// the build timestamp of the running binary.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self, kind: Kind) -> PathBuf {
        self.root.join("records").join(kind.as_str())
    }

    fn ids_path(&self) -> PathBuf {
        self.root.join("ids.json")
    }

    fn ids_lock_path(&self) -> PathBuf {
        self.root.join("ids.lock")
    }

    fn file_name(id: &KeyId) -> String {
        match id {
            KeyId::Id(id) => format!("i-{}.json", id),
            // Hex keeps arbitrary names safe on case-insensitive filesystems.
            KeyId::Name(name) => {
                let hex: String = name.bytes().map(|b| format!("{:02x}", b)).collect();
                format!("n-{}.json", hex)
            }
        }
    }

    fn record_path(&self, key: &RecordKey) -> PathBuf {
        self.kind_dir(key.kind()).join(Self::file_name(key.key_id()))
    }

    /// Allocate the next numeric id for `kind`.
    ///
    /// Held under an exclusive lock so concurrent writers never share an
    /// id. Ids already taken by explicit keys are skipped.
    fn allocate_id(&self, kind: Kind) -> Result<i64> {
        fs::create_dir_all(&self.root)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.ids_lock_path())?;
        lock_file.lock_exclusive()?;

        let ids_path = self.ids_path();
        let mut ids: BTreeMap<Kind, i64> = match fs::read_to_string(&ids_path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| corrupt(&ids_path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let mut next = ids.get(&kind).copied().unwrap_or(0) + 1;
        while self.record_path(&RecordKey::id(kind, next)).exists() {
            next += 1;
        }
        ids.insert(kind, next);

        let content = serde_json::to_string_pretty(&ids).map_err(encode_err)?;
        write_atomic(&ids_path, &content)?;

        lock_file.unlock()?;

        debug!(kind = %kind, id = next, "Allocated id");
        Ok(next)
    }

    async fn read_record(&self, path: &Path) -> Result<Option<Record>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_str(&content).map_err(|e| corrupt(path, e))?;
        Ok(Some(record))
    }

    /// Load every record of a kind. Unreadable documents are skipped.
    async fn load_kind(&self, kind: Kind) -> Result<Vec<Record>> {
        let dir = self.kind_dir(kind);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match self.read_record(&path).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable record"),
            }
        }
        Ok(records)
    }
}

/// Write through a uniquely named temp file and rename into place.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl Datastore for FileStore {
    #[instrument(skip_all, fields(key = %key))]
    async fn get(&self, key: &RecordKey) -> Result<Option<Record>> {
        self.read_record(&self.record_path(key)).await
    }

    #[instrument(skip_all, fields(kind = %record.kind()))]
    async fn put(&self, mut record: Record) -> Result<RecordKey> {
        let key = match record.key() {
            Some(key) if key.kind() == record.kind() => key.clone(),
            Some(key) => {
                return Err(Error::InvalidInput(InvalidInputError::Key {
                    value: key.to_string(),
                    reason: format!("key does not belong to a {} record", record.kind()),
                }));
            }
            None => RecordKey::id(record.kind(), self.allocate_id(record.kind())?),
        };
        record.set_key(key.clone());

        let path = self.record_path(&key);
        if record.created().is_none() || record.version().is_none() {
            if let Some(stored) = self.read_record(&path).await? {
                if let (None, Some(created)) = (record.created(), stored.created()) {
                    record.set_created(created);
                }
                if let (None, Some(version)) = (record.version(), stored.version()) {
                    record.set("version", version);
                }
            }
        }
        record.touch(Utc::now());
        if record.version().is_none() {
            record.set("version", self.version);
        }

        if record.kind() == Kind::File && record.get("uid").is_none() {
            record.set("uid", Uuid::new_v4().simple().to_string());
        }

        let content = serde_json::to_string_pretty(&record).map_err(encode_err)?;
        write_atomic(&path, &content)?;

        debug!(key = %key, "Stored record");
        Ok(key)
    }

    #[instrument(skip_all, fields(key = %key))]
    async fn delete(&self, key: &RecordKey) -> Result<()> {
        let path = self.record_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted record");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, query), fields(kind = %query.kind))]
    async fn fetch_page(&self, query: &Query, offset: usize, limit: usize) -> Result<FetchedPage> {
        let matched = query.apply(self.load_kind(query.kind).await?);
        let more = matched.len() > offset.saturating_add(limit);
        let records: Vec<Record> = matched.into_iter().skip(offset).take(limit).collect();

        debug!(offset, limit, count = records.len(), more, "Fetched page");
        Ok(FetchedPage { records, more })
    }
}
