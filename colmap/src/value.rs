use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::types::Kind;

/// A typed value produced from a raw column string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Destination has no scalar representation.
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    #[serde(serialize_with = "serialize_duration")]
    Duration(TimeDelta),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// The zero value of a kind, used when a lenient conversion fails.
    pub fn zero(kind: Kind) -> Self {
        match kind {
            Kind::Bool => Value::Bool(false),
            Kind::Int8 => Value::I8(0),
            Kind::Int16 => Value::I16(0),
            Kind::Int32 => Value::I32(0),
            Kind::Int64 => Value::I64(0),
            Kind::Int => Value::Isize(0),
            Kind::Uint8 => Value::U8(0),
            Kind::Uint16 => Value::U16(0),
            Kind::Uint32 => Value::U32(0),
            Kind::Uint64 => Value::U64(0),
            Kind::Uint => Value::Usize(0),
            Kind::Float32 => Value::F32(0.0),
            Kind::Float64 => Value::F64(0.0),
            Kind::String | Kind::Any => Value::String(String::new()),
            Kind::Sequence => Value::Bytes(Vec::new()),
            Kind::Record | Kind::Map | Kind::Pointer => Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Isize(_) => "isize",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Usize(_) => "usize",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Duration(_) => "duration",
            Value::Timestamp(_) => "timestamp",
        }
    }
}

fn serialize_duration<S: Serializer>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    match duration.num_nanoseconds() {
        Some(nanos) => serializer.serialize_i64(nanos),
        None => serializer.serialize_i64(duration.num_milliseconds().saturating_mul(1_000_000)),
    }
}

/// Extracts a Rust value from a coerced [`Value`].
pub trait FromValue: Sized {
    const TYPE_NAME: &'static str;
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! from_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_variant! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<u8> => Bytes,
    TimeDelta => Duration,
    DateTime<Utc> => Timestamp,
}

impl FromValue for std::time::Duration {
    const TYPE_NAME: &'static str = "std::time::Duration";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Duration(delta) => delta.to_std().ok(),
            _ => None,
        }
    }
}

impl FromValue for NaiveDateTime {
    const TYPE_NAME: &'static str = "NaiveDateTime";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(ts) => Some(ts.naive_utc()),
            _ => None,
        }
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "Value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for serde_json::Value {
    const TYPE_NAME: &'static str = "serde_json::Value";

    fn from_value(value: Value) -> Option<Self> {
        serde_json::to_value(value).ok()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Box::new)
    }
}

// A single column never carries a whole map.
impl<K, V, S> FromValue for HashMap<K, V, S> {
    const TYPE_NAME: &'static str = "HashMap";

    fn from_value(_value: Value) -> Option<Self> {
        None
    }
}

impl<K, V> FromValue for BTreeMap<K, V> {
    const TYPE_NAME: &'static str = "BTreeMap";

    fn from_value(_value: Value) -> Option<Self> {
        None
    }
}
