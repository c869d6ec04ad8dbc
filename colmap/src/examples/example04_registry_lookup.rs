use anyhow::{Context, Result, ensure};

use crate::examples::models::{Address, Person};
use crate::registry;

/// Example 04 – finding derived records by type name.
pub fn run() -> Result<()> {
    let names = registry::registered_names();
    ensure!(names.contains(&"Person") && names.contains(&"Address"));

    let person = registry::lookup("Person").context("Person is registered")?;
    ensure!(person.fields.len() == 9);
    ensure!(registry::lookup_type::<Address>().map(|d| d.name.as_str()) == Some("Address"));

    ensure!(registry::resolve("Person", "city_name") == Some(vec![5, 1]));
    ensure!(registry::resolve("Person", "nope").is_none());
    ensure!(registry::resolve("Nobody", "first_name").is_none());

    // Registered and directly obtained descriptors are the same static.
    ensure!(std::ptr::eq(person, <Person as crate::types::Record>::record_descriptor()));
    Ok(())
}
