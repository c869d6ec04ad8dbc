//! Record types shared by the examples.

use chrono::{DateTime, TimeDelta, Utc};

use crate::Record;

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Address {
    pub street: String,
    #[record(db = "city_name")]
    pub city: String,
    #[record(db = "zip")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Person {
    #[record(db = "-")]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[record(field = "years")]
    pub age: u32,
    pub active: bool,
    #[record(db = ",inline")]
    pub home: Address,
    pub session_length: TimeDelta,
    pub created_at: DateTime<Utc>,
    internal_note: String,
}

impl Person {
    pub fn internal_note(&self) -> &str {
        &self.internal_note
    }
}

/// Uses the deprecated tag forms.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct LegacyAccount {
    #[record(field = "account_name")]
    pub name: String,
    #[record(inline)]
    pub billing: Address,
    pub balance: f64,
}
