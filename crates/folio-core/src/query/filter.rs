//! Equality filters.

use crate::error::{Error, QueryError};
use crate::model::{FieldType, Record, Schema};
use crate::types::Value;

/// A filter argument: one value, or several values that must all match.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    One(Value),
    /// Expands to one equality filter per element, combined with AND.
    Many(Vec<Value>),
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        FilterValue::One(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::One(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::One(value.into())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.into())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::One(value.into())
    }
}

impl FilterValue {
    /// Several values, each becoming its own equality filter.
    pub fn all<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        FilterValue::Many(values.into_iter().map(Into::into).collect())
    }
}

/// A compiled `field == value` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Equality {
    pub field: String,
    pub value: Value,
}

impl Equality {
    /// Check the filter against a record. Repeated properties match when
    /// any element equals the value.
    pub fn matches(&self, schema: &Schema, record: &Record) -> bool {
        schema.resolve(record, &self.field).matches(&self.value)
    }
}

/// Expand and type-check filters against a kind.
///
/// `Null` filter values are skipped. Text values given for non-text
/// properties are parsed as the property's type, so URL parameters can be
/// passed through as they arrive.
///
/// # Errors
///
/// Returns [`QueryError::UnknownFilterField`] for a field the kind does not
/// declare, or [`QueryError::InvalidFilterValue`] when a text value cannot
/// be read as the property's type.
pub fn compile_filters(
    schema: &Schema,
    filters: &[(String, FilterValue)],
) -> Result<Vec<Equality>, Error> {
    let mut compiled = Vec::new();
    for (field, filter) in filters {
        let ty = schema
            .field_type(field)
            .ok_or_else(|| QueryError::UnknownFilterField {
                kind: schema.kind.to_string(),
                field: field.clone(),
            })?;

        let values: &[Value] = match filter {
            FilterValue::One(value) => std::slice::from_ref(value),
            FilterValue::Many(values) => values,
        };

        for value in values.iter().filter(|v| !v.is_null()) {
            compiled.push(Equality {
                field: field.clone(),
                value: coerce(ty, field, value)?,
            });
        }
    }
    Ok(compiled)
}

fn coerce(ty: FieldType, field: &str, value: &Value) -> Result<Value, Error> {
    let textual = matches!(ty, FieldType::Text)
        || matches!(ty, FieldType::List(inner) if *inner == FieldType::Text);
    match value {
        Value::Text(raw) if !textual => ty.parse(field, raw),
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    fn filters(items: Vec<(&str, FilterValue)>) -> Vec<(String, FilterValue)> {
        items
            .into_iter()
            .map(|(f, v)| (f.to_string(), v))
            .collect()
    }

    #[test]
    fn scalar_becomes_one_equality() {
        let compiled = compile_filters(
            Kind::Post.schema(),
            &filters(vec![("is_public", true.into())]),
        )
        .unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].value, Value::Bool(true));
    }

    #[test]
    fn sequence_becomes_repeated_equalities() {
        let compiled = compile_filters(
            Kind::Post.schema(),
            &filters(vec![("tags", FilterValue::all(["rust", "web"]))]),
        )
        .unwrap();
        assert_eq!(compiled.len(), 2);
        assert!(compiled.iter().all(|e| e.field == "tags"));
    }

    #[test]
    fn text_is_coerced_to_property_type() {
        let compiled = compile_filters(
            Kind::File.schema(),
            &filters(vec![("is_public", "yes".into()), ("size", "10".into())]),
        )
        .unwrap();
        assert_eq!(compiled[0].value, Value::Bool(true));
        assert_eq!(compiled[1].value, Value::Int(10));
    }

    #[test]
    fn null_values_are_skipped() {
        let compiled = compile_filters(
            Kind::Post.schema(),
            &filters(vec![("title", FilterValue::One(Value::Null))]),
        )
        .unwrap();
        assert!(compiled.is_empty());
    }

    #[test]
    fn unknown_field_fails_fast() {
        let err = compile_filters(
            Kind::Post.schema(),
            &filters(vec![("author", "me".into())]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Query(QueryError::UnknownFilterField { .. })
        ));
    }

    #[test]
    fn bad_value_is_reported() {
        let err = compile_filters(Kind::File.schema(), &filters(vec![("size", "big".into())]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Query(QueryError::InvalidFilterValue { .. })
        ));
    }
}
