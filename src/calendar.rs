//! Calendar vocabulary and the fields derived from a trip's start time.
//!
//! [`Month`] and [`DayOfWeek`] are the single source of truth for the names
//! accepted by the filter, offered by the prompt, and produced when a start
//! timestamp is expanded into [`CalendarFields`].

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel option meaning "no constraint on this dimension".
pub const ALL: &str = "All";

/// A closed set of named calendar values, listed in canonical order.
pub trait Vocabulary: Copy + Eq + 'static {
    /// Every value, canonical order.
    const VALUES: &'static [Self];

    fn name(self) -> &'static str;

    /// Option list used for validation: index 0 is [`ALL`], then every value.
    fn options() -> Vec<&'static str> {
        std::iter::once(ALL)
            .chain(Self::VALUES.iter().map(|v| v.name()))
            .collect()
    }

    /// Exact, case-sensitive lookup by canonical name.
    fn from_name(name: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|v| v.name() == name)
    }
}

/// Months covered by the source data. Trips outside January–June are not
/// part of the published datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    /// Maps a 1-based calendar month onto the option list.
    ///
    /// Index 0 of [`Vocabulary::options`] is the "All" sentinel, so the
    /// calendar month doubles as the option index. Months 7–12 have no entry.
    pub fn from_index(month: u32) -> Option<Self> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        Self::VALUES.get(index).copied()
    }
}

impl Vocabulary for Month {
    const VALUES: &'static [Self] = &[
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Vocabulary for DayOfWeek {
    const VALUES: &'static [Self] = &[
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Either a concrete value or the "All" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T: Vocabulary> Selector<T> {
    /// Resolves an entry of [`Vocabulary::options`]. Unknown names give `None`.
    pub fn from_option(option: &str) -> Option<Self> {
        if option == ALL {
            Some(Selector::All)
        } else {
            T::from_name(option).map(Selector::Only)
        }
    }

    pub fn matches(&self, value: T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => *wanted == value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Selector::All => ALL,
            Selector::Only(value) => value.name(),
        }
    }

    /// Phrase used when confirming filters, e.g. `no day filter` or
    /// `filter month is June`.
    pub fn describe(&self, by: &str) -> String {
        match self {
            Selector::All => format!("no {by} filter"),
            Selector::Only(value) => format!("filter {by} is {}", value.name()),
        }
    }
}

/// Calendar fields derived from a start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarFields {
    pub month: Month,
    pub weekday: DayOfWeek,
    pub hour: u8,
}

impl CalendarFields {
    /// Expands `start` into month, weekday and hour.
    ///
    /// # Errors
    ///
    /// Fails when the month lies outside January–June.
    pub fn derive(start: NaiveDateTime) -> Result<Self> {
        let Some(month) = Month::from_index(start.month()) else {
            bail!("{start} falls outside the January-June window");
        };
        let hour = u8::try_from(start.hour())?;

        Ok(Self {
            month,
            weekday: start.weekday().into(),
            hour,
        })
    }
}

/// Parallel month, weekday and hour columns of equal length.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CalendarColumns {
    pub months: Vec<Month>,
    pub weekdays: Vec<DayOfWeek>,
    pub hours: Vec<u8>,
}

/// Derives the calendar columns for a sequence of start timestamps.
pub fn derive_columns(starts: &[NaiveDateTime]) -> Result<CalendarColumns> {
    let mut columns = CalendarColumns {
        months: Vec::with_capacity(starts.len()),
        weekdays: Vec::with_capacity(starts.len()),
        hours: Vec::with_capacity(starts.len()),
    };

    for start in starts {
        let fields = CalendarFields::derive(*start)?;
        columns.months.push(fields.month);
        columns.weekdays.push(fields.weekday);
        columns.hours.push(fields.hour);
    }

    Ok(columns)
}
