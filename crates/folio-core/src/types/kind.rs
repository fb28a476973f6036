//! Record kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The kind (collection) a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// A blog post.
    Post,
    /// A downloadable portfolio file.
    File,
    /// A folder grouping portfolio files.
    Folder,
    /// A signed-in site user.
    User,
    /// Site configuration.
    Config,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 5] = [Kind::Post, Kind::File, Kind::Folder, Kind::User, Kind::Config];

    /// Returns the kind name used in keys and storage paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Post => "Post",
            Kind::File => "File",
            Kind::Folder => "Folder",
            Kind::User => "User",
            Kind::Config => "Config",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                InvalidInputError::Kind {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("post".parse::<Kind>().unwrap(), Kind::Post);
        assert_eq!("Folder".parse::<Kind>().unwrap(), Kind::Folder);
    }

    #[test]
    fn unknown_kind_fails() {
        let err = "comment".parse::<Kind>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(InvalidInputError::Kind { .. })));
    }
}
