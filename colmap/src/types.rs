use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::errors::BindResult;
use crate::tags::StructTag;
use crate::value::Value;

/// Underlying representation of a destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint,
    Float32,
    Float64,
    String,
    /// Generic/untyped destination; receives the raw string.
    Any,
    Record,
    Sequence,
    Map,
    Pointer,
}

/// Describes the shape of a field type.
///
/// `#[derive(Record)]` emits these for every field. Descriptors can
/// also be assembled by hand for types the derive does not cover.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Primitive(Kind),
    Any,
    /// Elapsed time. Reports [`Kind::Int64`] as its underlying kind.
    Duration,
    /// Calendar timestamp. Reports [`Kind::Record`] as its underlying kind.
    Timestamp,
    Record(RecordRef),
    Sequence(Box<TypeDescriptor>),
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Pointer(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn kind(&self) -> Kind {
        match self {
            TypeDescriptor::Primitive(kind) => *kind,
            TypeDescriptor::Any => Kind::Any,
            TypeDescriptor::Duration => Kind::Int64,
            TypeDescriptor::Timestamp | TypeDescriptor::Record(_) => Kind::Record,
            TypeDescriptor::Sequence(_) => Kind::Sequence,
            TypeDescriptor::Map { .. } => Kind::Map,
            TypeDescriptor::Pointer(_) => Kind::Pointer,
        }
    }

    /// The record this type describes, if it is a record type.
    ///
    /// Timestamps share the record kind but carry no field list, so they return `None`.
    pub fn as_record(&self) -> Option<&RecordDescriptor> {
        match self {
            TypeDescriptor::Record(record) => Some(record.get()),
            _ => None,
        }
    }

    /// Strips every pointer layer.
    pub fn pointee(&self) -> &TypeDescriptor {
        let mut current = self;
        while let TypeDescriptor::Pointer(inner) = current {
            current = inner;
        }
        current
    }

    pub fn pointer_to(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer(Box::new(inner))
    }

    pub fn sequence_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(element))
    }

    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }
}

/// Lazily dereferenced handle to a record descriptor.
///
/// Generated code hands out a loader function so that self-referential types (through
/// `Box` or `Vec`) can be described without building an infinite value.
#[derive(Clone)]
pub enum RecordRef {
    Static(fn() -> &'static RecordDescriptor),
    Shared(Arc<RecordDescriptor>),
}

impl RecordRef {
    pub fn get(&self) -> &RecordDescriptor {
        match self {
            RecordRef::Static(load) => load(),
            RecordRef::Shared(descriptor) => descriptor,
        }
    }
}

impl fmt::Debug for RecordRef {
    // Only the name: descriptors may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.get().name).finish()
    }
}

/// Declared fields of a record type, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Follows a field path, descending through record-typed fields.
    pub fn field_at(&self, path: &[usize]) -> Option<&FieldDescriptor> {
        let (first, rest) = path.split_first()?;
        let field = self.fields.get(*first)?;
        if rest.is_empty() {
            Some(field)
        } else {
            field.ty.as_record()?.field_at(rest)
        }
    }

    /// Wraps an owned descriptor as a record type.
    pub fn into_type(self) -> TypeDescriptor {
        TypeDescriptor::Record(RecordRef::Shared(Arc::new(self)))
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    /// Unexported fields never take part in column matching.
    pub exported: bool,
    pub tag: StructTag,
    pub ty: TypeDescriptor,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            exported: true,
            tag: StructTag::new(),
            ty,
        }
    }

    /// Marks the field unexported.
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    pub fn with_tag(mut self, tag: StructTag) -> Self {
        self.tag = tag;
        self
    }

    /// Parses `key:"value"` annotations and attaches them.
    pub fn tagged(self, source: &str) -> Self {
        self.with_tag(StructTag::parse(source))
    }
}

/// Types that can describe their own shape.
pub trait Described {
    fn type_descriptor() -> TypeDescriptor;
}

/// Records that columns can be bound to.
///
/// This trait is implemented by `#[derive(Record)]`.
pub trait Record: Described {
    fn record_descriptor() -> &'static RecordDescriptor;

    /// Stores `value` in the field addressed by `path`.
    fn assign(&mut self, path: &[usize], value: Value) -> BindResult<()>;
}

macro_rules! describe_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Described for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::Primitive(Kind::$kind)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Uint,
    f32 => Float32,
    f64 => Float64,
    String => String,
    str => String,
}

impl Described for Value {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Any
    }
}

impl Described for serde_json::Value {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Any
    }
}

impl Described for TimeDelta {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Duration
    }
}

impl Described for std::time::Duration {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Duration
    }
}

impl Described for DateTime<Utc> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Timestamp
    }
}

impl Described for NaiveDateTime {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Timestamp
    }
}

impl<T: Described> Described for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence_of(T::type_descriptor())
    }
}

impl<T: Described> Described for [T] {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence_of(T::type_descriptor())
    }
}

impl<K: Described, V: Described, S> Described for HashMap<K, V, S> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map_of(K::type_descriptor(), V::type_descriptor())
    }
}

impl<K: Described, V: Described> Described for BTreeMap<K, V> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map_of(K::type_descriptor(), V::type_descriptor())
    }
}

impl<T: Described + ?Sized> Described for Box<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::pointer_to(T::type_descriptor())
    }
}

impl<T: Described> Described for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::pointer_to(T::type_descriptor())
    }
}

impl<T: Described + ?Sized> Described for &T {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::pointer_to(T::type_descriptor())
    }
}

impl<T: Described + ?Sized> Described for &mut T {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::pointer_to(T::type_descriptor())
    }
}
