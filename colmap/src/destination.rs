use crate::errors::DestinationError;
use crate::types::{Described, Kind, TypeDescriptor};

/// Checks that a bulk destination is a pointer to a sequence of records or maps.
///
/// Callers run this before populating results in bulk; it converts nothing. Map elements
/// are accepted whatever their key type.
pub fn validate_slice_destination(dst: &TypeDescriptor) -> Result<(), DestinationError> {
    let TypeDescriptor::Pointer(target) = dst else {
        return Err(DestinationError::ExpectingPointer);
    };
    let TypeDescriptor::Sequence(element) = target.as_ref() else {
        return Err(DestinationError::ExpectingSlicePointer);
    };
    match element.kind() {
        Kind::Record | Kind::Map => Ok(()),
        _ => Err(DestinationError::ExpectingSliceMapStruct),
    }
}

/// [`validate_slice_destination`] for the static type of `dst`.
///
/// `&mut Vec<T>` describes itself as a pointer to a sequence.
pub fn validate_destination<D: Described>(_dst: &D) -> Result<(), DestinationError> {
    validate_slice_destination(&D::type_descriptor())
}
