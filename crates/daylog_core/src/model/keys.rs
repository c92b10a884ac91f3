//! Calendar keys for daily, monthly and yearly records.
//!
//! # Responsibility
//! - Parse and format the `YYYY-MM-DD`, `YYYY-MM` and `YYYY` key shapes.
//! - Give records a chronological ordering independent of text form.
//!
//! # Invariants
//! - Text form is always zero-padded and round-trips through `parse`.
//! - `MonthKey::month` is within `1..=12`.
//! - Every key's year is within `0..=9999`, so the text form stays four digits.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a calendar key string has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("invalid day key `{0}`; expected YYYY-MM-DD")]
    Day(String),
    #[error("invalid month key `{0}`; expected YYYY-MM")]
    Month(String),
    #[error("invalid year key `{0}`; expected YYYY")]
    Year(String),
}

/// Calendar date local to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Wraps `date`, returning `None` when its year has no four-digit form.
    pub fn new(date: NaiveDate) -> Option<Self> {
        (0..=9999).contains(&date.year()).then_some(Self(date))
    }

    /// Builds a key from numeric parts, returning `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::new)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn month(self) -> MonthKey {
        MonthKey {
            year: self.0.year(),
            month: self.0.month(),
        }
    }

    pub fn year(self) -> YearKey {
        YearKey(self.0.year())
    }
}

impl FromStr for DayKey {
    type Err = KeyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields; the persisted key shape does not.
        if value.len() != 10 {
            return Err(KeyParseError::Day(value.to_string()));
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| KeyParseError::Day(value.to_string()))
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl TryFrom<String> for DayKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(value: DayKey) -> Self {
        value.to_string()
    }
}

/// Calendar month, `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn year(self) -> YearKey {
        YearKey(self.year)
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Returns whether `day` falls inside this month.
    pub fn contains(self, day: DayKey) -> bool {
        day.month() == self
    }
}

impl FromStr for MonthKey {
    type Err = KeyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let err = || KeyParseError::Month(value.to_string());
        let (year, month) = value.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year = parse_digits(year).ok_or_else(err)?;
        let month = parse_digits(month).ok_or_else(err)?;
        Self::new(year as i32, month).ok_or_else(err)
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// Calendar year, `YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearKey(i32);

impl YearKey {
    pub fn new(year: i32) -> Option<Self> {
        (0..=9999).contains(&year).then_some(Self(year))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl FromStr for YearKey {
    type Err = KeyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() != 4 {
            return Err(KeyParseError::Year(value.to_string()));
        }
        parse_digits(value)
            .map(|year| Self(year as i32))
            .ok_or_else(|| KeyParseError::Year(value.to_string()))
    }
}

impl Display for YearKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl TryFrom<String> for YearKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearKey> for String {
    fn from(value: YearKey) -> Self {
        value.to_string()
    }
}

fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
