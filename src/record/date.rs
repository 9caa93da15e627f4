//! Transaction dates in the `MM/DD/YYYY` text format.

use std::fmt::Display;

use time::{Date, Month};

use crate::Error;

/// A calendar date entered as `MM/DD/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordDate(Date);

impl RecordDate {
    /// Parse a date in the strict form `MM/DD/YYYY`.
    ///
    /// The month and day must have two digits and the year four. The date must
    /// also exist on the calendar, so `02/30/2025` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] if `text` does not match the format.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidDate(text.to_owned());

        let bytes = text.as_bytes();
        let has_shape = bytes.len() == 10
            && bytes[2] == b'/'
            && bytes[5] == b'/'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, byte)| i == 2 || i == 5 || byte.is_ascii_digit());

        if !has_shape {
            return Err(invalid());
        }

        let month: u8 = text[0..2].parse().map_err(|_| invalid())?;
        let day: u8 = text[3..5].parse().map_err(|_| invalid())?;
        let year: i32 = text[6..10].parse().map_err(|_| invalid())?;

        let month = Month::try_from(month).map_err(|_| invalid())?;
        let date = Date::from_calendar_date(year, month, day).map_err(|_| invalid())?;

        Ok(Self(date))
    }
}

impl From<Date> for RecordDate {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl Display for RecordDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04}",
            u8::from(self.0.month()),
            self.0.day(),
            self.0.year()
        )
    }
}

/// A comparable form of a stored date string.
///
/// Stored dates are not guaranteed to be valid. Anything that does not split
/// into three positive numbers sorts as [DateKey::Malformed], which orders
/// before every real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Malformed,
    /// (year, month, day)
    Calendar(i64, i64, i64),
}

impl DateKey {
    pub fn from_text(text: &str) -> Self {
        let mut parts = text.trim().split('/').map(|part| part.trim().parse::<i64>());

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(month)), Some(Ok(day)), Some(Ok(year)), None)
                if month > 0 && day > 0 && year > 0 =>
            {
                DateKey::Calendar(year, month, day)
            }
            _ => DateKey::Malformed,
        }
    }
}
