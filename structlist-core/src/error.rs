//! Error types for structlist operations

use alloc::string::String;

/// Errors that can occur while mutating or reading a list field
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum ListError {
    /// Wrong arity, keyword, or argument type; rejected before any mutation
    #[cfg_attr(feature = "std", error("{0}"))]
    Usage(String),

    /// A resolved index fell outside the list
    #[cfg_attr(feature = "std", error("{context} index out of range: {index} (len {len})"))]
    IndexOutOfRange {
        /// The operation that rejected the index ("list", "pop", "list assignment").
        context: &'static str,
        /// The index as the caller supplied it.
        index: i64,
        /// The list length at the time of the call.
        len: usize,
    },

    /// `pop` on an empty list
    #[cfg_attr(feature = "std", error("pop from empty list"))]
    PopFromEmpty,

    /// No element equal to the probe value
    #[cfg_attr(feature = "std", error("{0}: x not in list"))]
    NotFound(&'static str),

    /// Slice with a step of zero
    #[cfg_attr(feature = "std", error("slice step cannot be zero"))]
    ZeroStep,

    /// Extended slice assignment with the wrong number of items
    #[cfg_attr(
        feature = "std",
        error("attempt to assign sequence of size {actual} to extended slice of size {expected}")
    )]
    SliceSizeMismatch {
        /// Number of positions addressed by the slice.
        expected: usize,
        /// Number of items supplied.
        actual: usize,
    },

    /// Operand cannot be iterated
    #[cfg_attr(feature = "std", error("'{0}' object is not iterable"))]
    NotIterable(&'static str),

    /// Sort found two elements it cannot order
    #[cfg_attr(
        feature = "std",
        error("'<' not supported between instances of '{left}' and '{right}'")
    )]
    Incomparable {
        /// Type name of the left operand.
        left: &'static str,
        /// Type name of the right operand.
        right: &'static str,
    },

    /// A value cannot be coerced to the declared element type
    #[cfg_attr(feature = "std", error("Invalid {expected} value: got {found}"))]
    Conversion {
        /// Display form of the declared field type.
        expected: String,
        /// Description of the offending value.
        found: String,
    },

    /// Storage type cannot hold values of the declared field type
    #[cfg_attr(feature = "std", error("storage '{storage}' cannot back a field of type {field_type}"))]
    StorageMismatch {
        /// Name of the Rust storage type.
        storage: &'static str,
        /// Display form of the declared field type.
        field_type: String,
    },

    /// Result would exceed the maximum sequence length
    #[cfg_attr(feature = "std", error("list of length {len} exceeds maximum {max}"))]
    TooLarge {
        /// Requested length (saturated on overflow).
        len: usize,
        /// The configured limit.
        max: usize,
    },
}

impl ListError {
    /// Shorthand for a usage error with a formatted message
    pub fn usage(message: impl Into<String>) -> Self {
        ListError::Usage(message.into())
    }

    /// True for errors raised by the element converter
    pub fn is_conversion(&self) -> bool {
        matches!(self, ListError::Conversion { .. })
    }
}
