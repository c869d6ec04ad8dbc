//! Record auto-registration via inventory crate.
//!
//! `#[derive(Record)]` submits a [`RecordRegistration`] for every non-generic record, so
//! descriptors can be looked up by type name without naming the type.

use std::any::TypeId;

use crate::resolve::{FieldPath, get_struct_field_index};
use crate::types::RecordDescriptor;

/// Metadata submitted to the inventory by the derive macro.
pub struct RecordRegistration {
    /// The TypeId of the record struct
    pub type_id: fn() -> TypeId,
    /// The name of the record type (e.g., "Person")
    pub type_name: &'static str,
    /// Function to get the record descriptor
    pub descriptor_fn: fn() -> &'static RecordDescriptor,
}

impl RecordRegistration {
    pub const fn new(
        type_id: fn() -> TypeId,
        type_name: &'static str,
        descriptor_fn: fn() -> &'static RecordDescriptor,
    ) -> Self {
        Self {
            type_id,
            type_name,
            descriptor_fn,
        }
    }
}

inventory::collect!(RecordRegistration);

/// All registered records.
pub fn registered_records() -> impl Iterator<Item = &'static RecordRegistration> {
    inventory::iter::<RecordRegistration>()
}

pub fn registered_names() -> Vec<&'static str> {
    let mut names: Vec<_> = registered_records().map(|r| r.type_name).collect();
    names.sort_unstable();
    names
}

/// Descriptor of a registered record by type name.
pub fn lookup(type_name: &str) -> Option<&'static RecordDescriptor> {
    registered_records()
        .find(|r| r.type_name == type_name)
        .map(|r| (r.descriptor_fn)())
}

/// Descriptor of a registered record by `TypeId`.
pub fn lookup_type<T: 'static>() -> Option<&'static RecordDescriptor> {
    let wanted = TypeId::of::<T>();
    registered_records()
        .find(|r| (r.type_id)() == wanted)
        .map(|r| (r.descriptor_fn)())
}

/// Resolves `column` against the record registered under `type_name`.
///
/// Returns `None` both for unknown records and for columns without a field.
pub fn resolve(type_name: &str, column: &str) -> Option<FieldPath> {
    lookup(type_name).and_then(|descriptor| get_struct_field_index(descriptor, column))
}
