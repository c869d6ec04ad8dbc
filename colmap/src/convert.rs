//! String to typed value coercion.
//!
//! The lenient entry points ([`string_to_type`], [`string_to_kind`]) never fail: a value
//! that cannot be parsed for its destination degrades to the destination's zero value.
//! Callers that need to tell a genuine zero from a failed parse use the `try_` variants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use log::debug;

use crate::errors::ConvertError;
use crate::types::{Kind, TypeDescriptor};
use crate::value::Value;

/// Naive layouts, interpreted as UTC. `%.f` also accepts a missing fraction.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const NANOS_PER_UNIT: &[(&str, i128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Converts `src` for a destination type, substituting a zero value on failure.
///
/// The zero timestamp is the Unix epoch (1970-01-01T00:00:00Z).
pub fn string_to_type(src: &str, dst: &TypeDescriptor) -> Value {
    try_string_to_type(src, dst).unwrap_or_else(|err| {
        debug!("falling back to zero value: {err}");
        zero_value(dst)
    })
}

/// Converts `src` for a destination type.
///
/// Durations and timestamps are recognized by type; everything else dispatches on the
/// destination's underlying kind.
pub fn try_string_to_type(src: &str, dst: &TypeDescriptor) -> Result<Value, ConvertError> {
    match dst {
        TypeDescriptor::Duration => parse_duration(src).map(Value::Duration).ok_or_else(|| ConvertError::Malformed {
            kind: dst.kind(),
            input: src.to_string(),
        }),
        TypeDescriptor::Timestamp => parse_timestamp(src).map(Value::Timestamp).ok_or_else(|| ConvertError::Malformed {
            kind: dst.kind(),
            input: src.to_string(),
        }),
        other => try_string_to_kind(src, other.kind()),
    }
}

/// Converts `src` for a destination kind, substituting the kind's zero value on failure.
pub fn string_to_kind(src: &str, kind: Kind) -> Value {
    try_string_to_kind(src, kind).unwrap_or_else(|err| {
        debug!("falling back to zero value: {err}");
        Value::zero(kind)
    })
}

pub fn try_string_to_kind(src: &str, kind: Kind) -> Result<Value, ConvertError> {
    let malformed = || ConvertError::Malformed {
        kind,
        input: src.to_string(),
    };
    let trimmed = src.trim();

    let value = match kind {
        Kind::Any => Value::String(src.to_string()),
        Kind::String => Value::String(src.to_string()),
        Kind::Bool => Value::Bool(parse_bool(trimmed).ok_or_else(malformed)?),
        Kind::Int8 => Value::I8(trimmed.parse().map_err(|_| malformed())?),
        Kind::Int16 => Value::I16(trimmed.parse().map_err(|_| malformed())?),
        Kind::Int32 => Value::I32(trimmed.parse().map_err(|_| malformed())?),
        Kind::Int64 => Value::I64(trimmed.parse().map_err(|_| malformed())?),
        Kind::Int => Value::Isize(trimmed.parse().map_err(|_| malformed())?),
        Kind::Uint8 => Value::U8(trimmed.parse().map_err(|_| malformed())?),
        Kind::Uint16 => Value::U16(trimmed.parse().map_err(|_| malformed())?),
        Kind::Uint32 => Value::U32(trimmed.parse().map_err(|_| malformed())?),
        Kind::Uint64 => Value::U64(trimmed.parse().map_err(|_| malformed())?),
        Kind::Uint => Value::Usize(trimmed.parse().map_err(|_| malformed())?),
        Kind::Float32 => Value::F32(trimmed.parse().map_err(|_| malformed())?),
        Kind::Float64 => Value::F64(trimmed.parse().map_err(|_| malformed())?),
        // Sequences receive the raw bytes.
        Kind::Sequence => Value::Bytes(src.as_bytes().to_vec()),
        Kind::Record | Kind::Map | Kind::Pointer => return Err(ConvertError::Unsupported { kind }),
    };

    Ok(value)
}

fn zero_value(dst: &TypeDescriptor) -> Value {
    match dst {
        TypeDescriptor::Duration => Value::Duration(TimeDelta::zero()),
        TypeDescriptor::Timestamp => Value::Timestamp(DateTime::<Utc>::default()),
        other => Value::zero(other.kind()),
    }
}

fn parse_bool(src: &str) -> Option<bool> {
    match src {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parses duration strings such as `"1h30m"`, `"1.5h"`, `"-300ms"`.
///
/// A bare integer is read as nanoseconds.
pub fn parse_duration(src: &str) -> Option<TimeDelta> {
    let trimmed = src.trim();
    let (negative, body) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if body.is_empty() {
        return None;
    }

    let total = if body.bytes().all(|b| b.is_ascii_digit()) {
        body.parse::<i128>().ok()?
    } else {
        parse_duration_units(body)?
    };

    let signed = if negative { -total } else { total };
    let nanos = i64::try_from(signed).ok()?;
    Some(TimeDelta::nanoseconds(nanos))
}

fn parse_duration_units(mut rest: &str) -> Option<i128> {
    let mut total: i128 = 0;

    while !rest.is_empty() {
        let number_len = rest.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(rest.len());
        let (number, after) = rest.split_at(number_len);
        let unit_len = after.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(after.len());
        let (unit, next) = after.split_at(unit_len);

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let scale = NANOS_PER_UNIT.iter().find(|(name, _)| *name == unit).map(|(_, scale)| *scale)?;

        let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut amount = whole.checked_mul(scale)?;
        if !fraction.is_empty() {
            // Beyond 18 digits the fraction no longer affects nanosecond precision.
            let digits = &fraction[..fraction.len().min(18)];
            let numerator: i128 = digits.parse().ok()?;
            amount = amount.checked_add(numerator * scale / 10i128.pow(digits.len() as u32))?;
        }

        total = total.checked_add(amount)?;
        rest = next;
    }

    Some(total)
}

/// Parses a timestamp in any of the recognized layouts.
pub fn parse_timestamp(src: &str) -> Option<DateTime<Utc>> {
    let trimmed = src.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;
    use crate::types::Described;

    #[test]
    fn duration_destination_parses_units() {
        let value = string_to_type("1h2m3s", &TypeDescriptor::Duration);
        assert_eq!(value, Value::Duration(TimeDelta::seconds(3723)));
    }

    #[test]
    fn duration_variants() {
        assert_eq!(parse_duration("1.5h"), Some(TimeDelta::minutes(90)));
        assert_eq!(parse_duration("300ms"), Some(TimeDelta::milliseconds(300)));
        assert_eq!(parse_duration("-2m"), Some(TimeDelta::minutes(-2)));
        assert_eq!(parse_duration("1µs"), Some(TimeDelta::microseconds(1)));
        assert_eq!(parse_duration("1500"), Some(TimeDelta::nanoseconds(1500)));
        assert_eq!(parse_duration("0"), Some(TimeDelta::zero()));
        assert_eq!(parse_duration(".5s"), Some(TimeDelta::milliseconds(500)));
        assert_eq!(parse_duration("1x"), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-"), None);
    }

    #[test]
    fn malformed_duration_is_zero() {
        let value = string_to_type("soon", &TypeDescriptor::Duration);
        assert_eq!(value, Value::Duration(TimeDelta::zero()));
    }

    #[test]
    fn oversized_fractional_duration_is_zero() {
        let hours = i128::MAX / 3_600_000_000_000;
        let src = format!("{hours}.999999999999999999h");
        assert_eq!(parse_duration(&src), None);
        assert_eq!(string_to_type(&src, &TypeDescriptor::Duration), Value::Duration(TimeDelta::zero()));
    }

    #[test]
    fn timestamp_destination_parses_calendar_fields() {
        let Value::Timestamp(ts) = string_to_type("2012-03-04 05:06:07", &TypeDescriptor::Timestamp) else {
            panic!("expected timestamp");
        };
        assert_eq!((ts.year(), ts.month(), ts.day()), (2012, 3, 4));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (5, 6, 7));
    }

    #[test]
    fn timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2014, 1, 2)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .map(|naive| naive.and_utc());
        assert_eq!(parse_timestamp("2014-01-02T10:00:00Z"), expected);
        assert_eq!(parse_timestamp("2014-01-02T12:00:00+02:00"), expected);
        assert_eq!(parse_timestamp("2014/01/02 10:00:00"), expected);
        assert_eq!(parse_timestamp("Thu, 02 Jan 2014 10:00:00 +0000"), expected);
        assert_eq!(parse_timestamp("2014-01-02 10:00:00.000"), expected);
        assert_eq!(
            parse_timestamp("2014-01-02").map(|ts| ts.date_naive()),
            NaiveDate::from_ymd_opt(2014, 1, 2)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn malformed_timestamp_is_epoch() {
        let value = string_to_type("not a date", &TypeDescriptor::Timestamp);
        assert_eq!(value, Value::Timestamp(DateTime::<Utc>::default()));
    }

    #[test]
    fn primitive_kinds() {
        assert_eq!(string_to_type("true", &bool::type_descriptor()), Value::Bool(true));
        assert_eq!(string_to_type("F", &bool::type_descriptor()), Value::Bool(false));
        assert_eq!(string_to_type("42", &i64::type_descriptor()), Value::I64(42));
        assert_eq!(string_to_type(" 7 ", &u8::type_descriptor()), Value::U8(7));
        assert_eq!(string_to_type("2.5", &f64::type_descriptor()), Value::F64(2.5));
        assert_eq!(string_to_type("hi", &String::type_descriptor()), Value::String("hi".into()));
        assert_eq!(string_to_type("ab", &<Vec<u8>>::type_descriptor()), Value::Bytes(b"ab".to_vec()));
    }

    #[test]
    fn any_kind_keeps_raw_string() {
        assert_eq!(string_to_type(" 42 ", &TypeDescriptor::Any), Value::String(" 42 ".into()));
    }

    #[test]
    fn malformed_numbers_degrade_to_zero() {
        assert_eq!(string_to_type("abc", &i32::type_descriptor()), Value::I32(0));
        assert_eq!(string_to_type("300", &u8::type_descriptor()), Value::U8(0));
        assert_eq!(string_to_type("abc", &f32::type_descriptor()), Value::F32(0.0));
        assert_eq!(string_to_type("maybe", &bool::type_descriptor()), Value::Bool(false));
    }

    #[test]
    fn strict_conversion_reports_failures() {
        assert_eq!(
            try_string_to_kind("abc", Kind::Int64),
            Err(ConvertError::Malformed {
                kind: Kind::Int64,
                input: "abc".into()
            })
        );
        assert_eq!(
            try_string_to_type("x", &TypeDescriptor::map_of(TypeDescriptor::Any, TypeDescriptor::Any)),
            Err(ConvertError::Unsupported { kind: Kind::Map })
        );
        assert!(try_string_to_type("5m", &TypeDescriptor::Duration).is_ok());
    }

    #[test]
    fn unsupported_kinds_are_null() {
        let record = crate::types::RecordDescriptor::new("Empty").into_type();
        assert!(string_to_type("x", &record).is_null());
        assert!(string_to_type("x", &TypeDescriptor::pointer_to(TypeDescriptor::Any)).is_null());
    }
}
