//! Strongly-typed value objects used by domain entities.
//!
//! Identifiers and slugs coming from route paths are checked here so that the
//! services never build an API URL out of an unvalidated value.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(EventId, "Identifier the content API assigns to an event.");

/// URL slug of an event, used as its canonical public address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct EventSlug(String);

impl EventSlug {
    /// Trims the slug and rejects empty values or embedded path separators.
    pub fn new<S: Into<String>>(slug: S) -> Result<Self, TypeConstraintError> {
        let slug = slug.into().trim().to_string();
        if slug.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if slug.contains('/') {
            return Err(TypeConstraintError::InvalidValue(slug));
        }
        Ok(Self(slug))
    }

    /// Borrow the slug as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventSlug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EventSlug {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventSlug> for String {
    fn from(value: EventSlug) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_rejects_non_positive_values() {
        assert_eq!(EventId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(EventId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(EventId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn event_id_deserializes_from_number() {
        let id: EventId = serde_json::from_str("12").unwrap();
        assert_eq!(id.get(), 12);
        assert!(serde_json::from_str::<EventId>("0").is_err());
    }

    #[test]
    fn event_slug_is_trimmed_and_checked() {
        assert_eq!(EventSlug::new("  jazz-night ").unwrap().as_str(), "jazz-night");
        assert_eq!(EventSlug::new("   "), Err(TypeConstraintError::EmptyString));
        assert!(matches!(
            EventSlug::new("a/b"),
            Err(TypeConstraintError::InvalidValue(_))
        ));
    }
}
