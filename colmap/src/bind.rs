//! Populating records from rows of `(column, raw value)` pairs.
//!
//! Each column is resolved to a field path, converted against that field's type and
//! stored through [`Record::assign`]. Columns without a field are skipped; so are values
//! that convert to [`Value::Null`] (record, map and other non-scalar destinations).

use log::{debug, trace};

use crate::convert::string_to_type;
use crate::destination::validate_destination;
use crate::errors::{BindError, BindResult};
use crate::resolve::{Resolver, default_resolver};
use crate::types::Record;
use crate::value::Value;

/// Binds one row into `record` with the default resolver.
///
/// Returns the number of columns that were stored.
pub fn bind_row<R, I, K, V>(record: &mut R, row: I) -> BindResult<usize>
where
    R: Record,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    bind_row_with(default_resolver(), record, row)
}

pub fn bind_row_with<R, I, K, V>(resolver: &Resolver, record: &mut R, row: I) -> BindResult<usize>
where
    R: Record,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let descriptor = R::record_descriptor();
    let mut bound = 0;

    for (column, raw) in row {
        let column = column.as_ref();
        let Some(path) = resolver.field_index(descriptor, column) else {
            trace!("{}: no field for column {column:?}", descriptor.name);
            continue;
        };
        let field = descriptor.field_at(&path).ok_or_else(|| BindError::InvalidPath {
            record: descriptor.name.as_str(),
            path: path.clone(),
        })?;

        let value = string_to_type(raw.as_ref(), field.ty.pointee());
        if value.is_null() {
            debug!("{}: column {column:?} has no scalar form for field {}", descriptor.name, field.name);
            continue;
        }

        record.assign(&path, value).map_err(|err| err.with_column(column))?;
        bound += 1;
    }

    Ok(bound)
}

/// Appends one record per row to `dst`, after checking the destination shape.
///
/// Returns the number of records appended. On error nothing is appended.
pub fn bind_rows<R, Rows, I, K, V>(dst: &mut Vec<R>, rows: Rows) -> BindResult<usize>
where
    R: Record + Default,
    Rows: IntoIterator<Item = I>,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    bind_rows_with(default_resolver(), dst, rows)
}

pub fn bind_rows_with<R, Rows, I, K, V>(resolver: &Resolver, dst: &mut Vec<R>, rows: Rows) -> BindResult<usize>
where
    R: Record + Default,
    Rows: IntoIterator<Item = I>,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    validate_destination(&dst)?;

    // `dst` is left untouched unless every row binds.
    let mut bound = Vec::new();
    for row in rows {
        let mut record = R::default();
        bind_row_with(resolver, &mut record, row)?;
        bound.push(record);
    }

    let appended = bound.len();
    dst.extend(bound);
    Ok(appended)
}

/// Converts and stores a single column, returning `false` when the column has no field.
pub fn bind_column<R: Record>(record: &mut R, column: &str, raw: &str) -> BindResult<bool> {
    bind_row(record, [(column, raw)]).map(|bound| bound == 1)
}

/// Converts `raw` for the field at `path` without storing it.
pub fn convert_for<R: Record>(path: &[usize], raw: &str) -> Option<Value> {
    R::record_descriptor()
        .field_at(path)
        .map(|field| string_to_type(raw, field.ty.pointee()))
}
