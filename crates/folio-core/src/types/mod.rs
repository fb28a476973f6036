//! Core folio types.
//!
//! These types validate their invariants at construction time, so a key
//! or cursor that exists is always well-formed.

mod cursor;
mod key;
mod kind;
mod value;

pub use cursor::Cursor;
pub use key::{KeyId, RecordKey};
pub use kind::Kind;
pub use value::{BlobKey, GeoPt, Value};
