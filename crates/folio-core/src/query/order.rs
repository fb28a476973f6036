//! Order specifications.

use crate::error::{Error, QueryError};
use crate::model::Schema;

/// One sort key of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Parse a comma-separated order spec such as `-created,title`.
///
/// A leading `-` sorts that field descending. Empty segments are ignored.
///
/// # Errors
///
/// Returns [`QueryError::UnknownOrderField`] for a field the kind does not
/// declare.
pub fn parse_order(schema: &Schema, spec: &str) -> Result<Vec<SortKey>, Error> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let key = match segment.strip_prefix('-') {
                Some(field) => SortKey::desc(field.trim()),
                None => SortKey::asc(segment),
            };
            if schema.field_type(&key.field).is_none() {
                return Err(QueryError::UnknownOrderField {
                    kind: schema.kind.to_string(),
                    field: key.field,
                }
                .into());
            }
            Ok(key)
        })
        .collect()
}
