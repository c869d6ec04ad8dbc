use thiserror::Error;

use crate::types::Kind;

/// Shape violations reported by [`crate::destination::validate_slice_destination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DestinationError {
    /// The destination is not a pointer (or reference) at all.
    #[error("argument must be a pointer")]
    ExpectingPointer,

    /// The destination points at something other than a sequence.
    #[error("argument must be a pointer to a slice")]
    ExpectingSlicePointer,

    /// The sequence element is neither a record nor a string-keyed map.
    #[error("argument must be a slice of maps or structs")]
    ExpectingSliceMapStruct,
}

/// Failure of a strict string conversion.
///
/// The lenient entry points in [`crate::convert`] never surface this; they substitute
/// the destination's zero value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The input could not be parsed as the destination kind.
    #[error("cannot convert {input:?} to {kind:?}")]
    Malformed { kind: Kind, input: String },

    /// The destination kind has no scalar representation.
    #[error("conversion to {kind:?} is not supported")]
    Unsupported { kind: Kind },
}

/// Errors raised while populating records from rows of column values.
#[derive(Debug, Error)]
pub enum BindError {
    /// The bulk destination failed the shape guard.
    #[error("invalid destination: {0}")]
    Destination(#[from] DestinationError),

    /// The converted value does not fit the Rust type of the target field.
    #[error("column {column:?} cannot be stored in a field of type {expected}")]
    TypeMismatch { column: String, expected: &'static str },

    /// A field path did not lead to an assignable field.
    #[error("field path {path:?} does not address a field of {record}")]
    InvalidPath { record: &'static str, path: Vec<usize> },
}

impl BindError {
    /// Attaches the column name to a mismatch raised deep inside generated assignment code.
    pub fn with_column(self, column: &str) -> Self {
        match self {
            BindError::TypeMismatch { expected, .. } => BindError::TypeMismatch {
                column: column.to_string(),
                expected,
            },
            other => other,
        }
    }
}

pub type BindResult<T> = Result<T, BindError>;
