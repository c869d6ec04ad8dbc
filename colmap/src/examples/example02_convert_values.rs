use anyhow::{Context, Result, ensure};
use chrono::{Datelike, TimeDelta};

use crate::convert::{string_to_type, try_string_to_type};
use crate::examples::models::Person;
use crate::resolve::get_struct_field_index;
use crate::types::Record;
use crate::value::Value;

/// Example 02 – converting raw strings for the field a column resolved to.
pub fn run() -> Result<()> {
    let person = Person::record_descriptor();

    let convert = |column: &str, raw: &str| -> Result<Value> {
        let path = get_struct_field_index(person, column).with_context(|| format!("no field for {column}"))?;
        let field = person.field_at(&path).context("path leads to a field")?;
        Ok(string_to_type(raw, &field.ty))
    };

    ensure!(convert("years", "42")? == Value::U32(42));
    ensure!(convert("active", "true")? == Value::Bool(true));
    ensure!(convert("session_length", "1h2m3s")? == Value::Duration(TimeDelta::seconds(3723)));

    let Value::Timestamp(created) = convert("created_at", "2014-05-06 07:08:09")? else {
        anyhow::bail!("created_at should convert to a timestamp");
    };
    ensure!((created.year(), created.month(), created.day()) == (2014, 5, 6));

    // Lenient conversion swallows bad input; the strict one reports it.
    ensure!(convert("years", "forty-two")? == Value::U32(0));
    let path = get_struct_field_index(person, "years").context("years resolves")?;
    let field = person.field_at(&path).context("years field")?;
    ensure!(try_string_to_type("forty-two", &field.ty).is_err());
    Ok(())
}
