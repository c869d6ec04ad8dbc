use anyhow::{Result, ensure};

use crate::examples::models::Person;
use crate::resolve::{compare_column_to_field, get_struct_field_index};
use crate::types::Record;

/// Example 01 – resolving column names to field paths.
pub fn run() -> Result<()> {
    let person = Person::record_descriptor();

    // Untagged fields match by normalized name.
    ensure!(get_struct_field_index(person, "FirstName") == Some(vec![1]));
    ensure!(get_struct_field_index(person, "first-name") == Some(vec![1]));

    // The legacy `field` tag renames `age`.
    ensure!(get_struct_field_index(person, "years") == Some(vec![3]));
    ensure!(get_struct_field_index(person, "age").is_none());

    // Inline records are flattened into the parent.
    ensure!(get_struct_field_index(person, "street") == Some(vec![5, 0]));
    ensure!(get_struct_field_index(person, "city_name") == Some(vec![5, 1]));
    ensure!(get_struct_field_index(person, "zip") == Some(vec![5, 2]));

    // Opted-out and private fields are invisible.
    ensure!(get_struct_field_index(person, "id").is_none());
    ensure!(get_struct_field_index(person, "internal_note").is_none());

    ensure!(compare_column_to_field("CreatedAt", "created_at"));
    Ok(())
}
