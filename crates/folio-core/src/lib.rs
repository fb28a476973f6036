//! folio-core - content model and read path of the folio site
//!
//! Records of a few fixed kinds (posts, files, folders, users, site
//! configuration) are read through a [`Datastore`], paged with opaque
//! cursors, and serialized through per-kind allow-lists.
//!
//! # Example
//!
//! ```no_run
//! use folio_core::{Datastore, Kind, QuerySpec, SiteConfig, retrieve, to_json};
//!
//! # async fn example(store: &dyn Datastore) -> folio_core::Result<()> {
//! let config = SiteConfig::default();
//! let spec = QuerySpec::new(Kind::Post)
//!     .order("-created")
//!     .filter("is_public", true)
//!     .limit(10);
//!
//! let page = retrieve(store, &config, &spec).await?;
//! for record in &page.records {
//!     println!("{}", serde_json::Value::Object(to_json(record)));
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod humanize;
pub mod model;
pub mod query;
pub mod response;
pub mod retrieve;
pub mod serialize;
pub mod traits;
pub mod types;

// Re-export primary types at crate root for convenience
pub use archive::{Archive, ArchiveMonth, ArchiveYear, Dated, TagRank, Tagged};
pub use config::SiteConfig;
pub use error::Error;
pub use model::{Record, Schema};
pub use query::{Period, Query, QuerySpec};
pub use response::{ItemResponse, ListResponse};
pub use retrieve::{Page, retrieve, retrieve_by_id, retrieve_by_urlsafe, retrieve_one_by};
pub use serialize::to_json;
pub use traits::{Datastore, FetchedPage};
pub use types::{Cursor, Kind, RecordKey, Value};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
