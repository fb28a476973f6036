//! Records and their per-kind schemas.

mod record;
mod schema;

pub use record::Record;
pub use schema::{Computed, FieldType, IDENTITY_FIELDS, Property, Schema};
