//! Trip records and the per-city dataset they belong to.

use anyhow::Result;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::calendar::CalendarFields;

/// One bike rental.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    calendar: CalendarFields,
}

impl TripRecord {
    /// Builds a record and derives its calendar fields from `start`.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            start,
            end,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            calendar: CalendarFields::derive(start)?,
        })
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn calendar(&self) -> CalendarFields {
        self.calendar
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Which optional columns the city's source file carries.
///
/// A column can be present yet hold nothing but blanks; that is still
/// "present" and is reported as all-missing rather than absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub gender: bool,
    pub birth_year: bool,
}

impl Schema {
    pub fn full() -> Self {
        Self {
            gender: true,
            birth_year: true,
        }
    }
}

/// All trips for one city, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub city: String,
    pub schema: Schema,
    pub records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: impl Into<String>, schema: Schema, records: Vec<TripRecord>) -> Self {
        Self {
            city: city.into(),
            schema,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
