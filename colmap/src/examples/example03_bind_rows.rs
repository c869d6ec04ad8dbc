use anyhow::{Result, ensure};
use chrono::TimeDelta;

use crate::bind::{bind_row, bind_rows};
use crate::examples::models::{LegacyAccount, Person};

/// Example 03 – populating records from rows of column values.
pub fn run() -> Result<()> {
    let rows = vec![
        vec![
            ("id", "99"),
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("years", "36"),
            ("active", "t"),
            ("street", "12 St James's Square"),
            ("city_name", "London"),
            ("session_length", "90m"),
            ("created_at", "1843-07-01T00:00:00Z"),
            ("favourite_colour", "green"),
        ],
        vec![("first_name", "Charles"), ("zip", "SW1"), ("years", "unknown")],
    ];

    let mut people: Vec<Person> = Vec::new();
    let appended = bind_rows(&mut people, rows)?;
    ensure!(appended == 2);

    let ada = &people[0];
    ensure!(ada.id == 0, "opted-out column is ignored");
    ensure!(ada.first_name == "Ada" && ada.last_name == "Lovelace");
    ensure!(ada.age == 36 && ada.active);
    ensure!(ada.home.city == "London");
    ensure!(ada.session_length == TimeDelta::minutes(90));
    ensure!(ada.internal_note().is_empty());

    let charles = &people[1];
    ensure!(charles.home.postal_code.as_deref() == Some("SW1"));
    ensure!(charles.age == 0, "unparsable number falls back to zero");

    let mut account = LegacyAccount::default();
    let bound = bind_row(&mut account, [("account_name", "ACME"), ("street", "1 Main St"), ("balance", "10.5")])?;
    ensure!(bound == 3);
    ensure!(account.name == "ACME" && account.billing.street == "1 Main St" && account.balance == 10.5);
    Ok(())
}
