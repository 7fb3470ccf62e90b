//! Error type shared by the map, its comparator objects and its views.

use thiserror::Error;

/// Failures surfaced by `ComparatorMap` and its views.
///
/// Every variant is returned synchronously to the immediate caller; the map
/// never retries or recovers on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    /// A key argument was null where a key is required.
    #[error("the key argument must not be null")]
    NullKey,

    /// A probe value could not be treated as the map's key type when the
    /// strategy had to be invoked on it.
    #[error("value is not of the map's key type `{expected}`")]
    TypeMismatch { expected: &'static str },

    /// The operation has no meaning for the view it was called on.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    /// An element could not be stored in a caller-supplied array because
    /// the array's element type does not match.
    #[error("element cannot be stored in an array of `{expected}`")]
    ArrayStore { expected: &'static str },

    /// A backing-store factory handed out a store that already holds entries.
    #[error("backing store factory must return a new, empty store")]
    StoreNotEmpty,
}

impl MapError {
    pub(crate) fn type_mismatch<K>() -> Self {
        MapError::TypeMismatch {
            expected: core::any::type_name::<K>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MapError;

    #[test]
    fn type_mismatch_names_expected_type() {
        let e = MapError::type_mismatch::<String>();
        assert_eq!(
            e,
            MapError::TypeMismatch {
                expected: "alloc::string::String"
            }
        );
        assert!(e.to_string().contains("alloc::string::String"));
    }

    #[test]
    fn unsupported_message_carries_reason() {
        let e = MapError::Unsupported("values need a key");
        assert_eq!(e.to_string(), "operation not supported: values need a key");
    }
}
