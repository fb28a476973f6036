//! Core traits for folio backends.

mod datastore;

pub use datastore::{Datastore, FetchedPage};
