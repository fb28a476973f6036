//! Opaque pagination cursor.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::fmt;

use crate::error::{Error, QueryError};

/// A resumable position within the results of one query shape.
///
/// On the wire the cursor is an opaque URL-safe string. It carries the
/// fingerprint of the query that produced it, so a cursor replayed against
/// a different filter or order is rejected instead of paging through the
/// wrong result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    offset: usize,
    shape: u64,
}

impl Cursor {
    pub(crate) fn new(offset: usize, shape: u64) -> Self {
        Self { offset, shape }
    }

    /// Number of results preceding the resumption point.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Encode as a string that survives a URL query parameter unchanged.
    pub fn to_websafe(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{:016x}", self.offset, self.shape))
    }

    /// Decode a cursor produced by [`Cursor::to_websafe`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidCursor`] if the string does not decode.
    pub fn from_websafe(s: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| {
            Error::Query(QueryError::InvalidCursor {
                reason: reason.to_string(),
            })
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(s.trim())
            .map_err(|_| invalid("not URL-safe base64"))?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid("not UTF-8"))?;

        let (offset, shape) = raw
            .split_once(':')
            .ok_or_else(|| invalid("malformed cursor"))?;
        let offset = offset
            .parse()
            .map_err(|_| invalid("offset is not a number"))?;
        let shape =
            u64::from_str_radix(shape, 16).map_err(|_| invalid("bad query fingerprint"))?;

        Ok(Self { offset, shape })
    }

    /// Resume against a query, returning the offset to continue from.
    pub(crate) fn resume(&self, shape: u64) -> Result<usize, Error> {
        if self.shape != shape {
            return Err(QueryError::InvalidCursor {
                reason: "cursor belongs to a different query".to_string(),
            }
            .into());
        }
        Ok(self.offset)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_websafe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn websafe_roundtrip() {
        let cursor = Cursor::new(128, 0xdead_beef);
        let encoded = cursor.to_websafe();
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(Cursor::from_websafe(&encoded).unwrap(), cursor);
    }

    #[test]
    fn garbage_is_invalid_cursor() {
        let err = Cursor::from_websafe("not a cursor").unwrap_err();
        assert!(err.is_invalid_cursor());

        let err = Cursor::from_websafe(&URL_SAFE_NO_PAD.encode("12")).unwrap_err();
        assert!(err.is_invalid_cursor());
    }

    #[test]
    fn resume_rejects_other_shape() {
        let cursor = Cursor::new(10, 1);
        assert_eq!(cursor.resume(1).unwrap(), 10);
        assert!(cursor.resume(2).unwrap_err().is_invalid_cursor());
    }
}
