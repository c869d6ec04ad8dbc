//! colmap core library.
//!
//! Maps columns of tabular data onto record fields: tag parsing, field resolution
//! (including inline embedded records), string-to-value coercion, the bulk destination
//! guard, and row binding for types deriving [`Record`].

extern crate self as colmap;

pub mod bind;
pub mod config;
pub mod convert;
pub mod destination;
pub mod errors;
pub mod examples;
pub mod registry;
pub mod resolve;
pub mod tags;
pub mod types;
pub mod value;

pub use bind::{bind_column, bind_row, bind_rows};
pub use config::ResolverConfig;
pub use convert::{string_to_kind, string_to_type, try_string_to_kind, try_string_to_type};
pub use destination::{validate_destination, validate_slice_destination};
pub use errors::*;
pub use resolve::{FieldPath, Resolver, TagRule, compare_column_to_field, get_struct_field_index};
pub use tags::{StructTag, TagOptions, parse_tag};
pub use types::{Described, FieldDescriptor, Kind, Record, RecordDescriptor, RecordRef, TypeDescriptor};
pub use value::{FromValue, Value};

pub use colmap_macros::Record;

// Re-export inventory for auto-registration in the record derive macro
pub use inventory;
