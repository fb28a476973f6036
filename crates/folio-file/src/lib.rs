//! folio-file - Filesystem-backed document datastore.
//!
//! Stands in for the managed datastore during development and in tests.

mod store;

pub use store::FileStore;
