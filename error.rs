use core::fmt;

use crate::Value;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by registry queries and member deserialization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The declarations of an enum type are structurally invalid.
    #[error("{enum_name} analyze failed: {reason}")]
    Discovery {
        enum_name: &'static str,
        reason: String,
    },

    /// The requested name or value is not declared on the enum type.
    #[error("{key} not defined in {enum_name}")]
    NotFound { enum_name: &'static str, key: Key },

    /// Serialized member data lacks a required field.
    #[error("malformed {enum_name} member data: missing field `{field}`")]
    MalformedData {
        enum_name: &'static str,
        field: &'static str,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Key of a failed lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Name(String),
    Value(Value),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Value(value) => fmt::Display::fmt(value, f),
        }
    }
}
