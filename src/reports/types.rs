//! Data types produced by the report routines.

use chrono::TimeDelta;
use serde::Serialize;

use crate::calendar::{DayOfWeek, Month};
use crate::filter::FilterCriteria;
use crate::reports::imbalance::StationBalance;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelTimeReport {
    pub month: Month,
    pub weekday: DayOfWeek,
    pub hour: u8,
    /// Top hour within the top weekday, only when it differs from `hour`
    /// and the data spans more than one weekday.
    pub peak_day_hour: Option<u8>,
}

/// A start/end station pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    pub from: String,
    pub to: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub start_station: String,
    pub end_station: String,
    /// The same station tops both the start and end rankings.
    pub same_top_station: bool,
    pub route: Route,
    pub balance: StationBalance,
}

/// Total and average trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationReport {
    /// Sum of all trip durations, kept at millisecond precision.
    pub total_millis: i64,
    pub mean_minutes: f64,
}

impl DurationReport {
    pub fn total(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.total_millis)
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_millis as f64 / 1000.0
    }
}

/// Earliest, average and latest birth year over the present values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub earliest: i32,
    pub mean: f64,
    pub latest: i32,
}

/// What happened when out-of-range birth years were removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearCleaning {
    pub replaced: usize,
    pub before: YearSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenderBreakdown {
    /// The city's data has no gender column.
    Absent,
    Present {
        counts: Vec<(String, usize)>,
        missing: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BirthYearBreakdown {
    /// The city's data has no birth year column.
    Absent,
    Present {
        cleaning: Option<BirthYearCleaning>,
        /// `None` when no birth year survives (all blank or all cleaned).
        summary: Option<YearSummary>,
    },
}

/// Counts of user types, gender, and birth-year extremes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub user_types: Vec<(String, usize)>,
    pub gender: GenderBreakdown,
    pub birth_year: BirthYearBreakdown,
}

/// A report plus the wall-clock time it took to compute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timed<T> {
    pub report: T,
    pub elapsed_secs: f64,
}

/// Every report for one city and filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReport {
    pub city: String,
    pub criteria: FilterCriteria,
    pub trips: usize,
    pub travel_time: Timed<TravelTimeReport>,
    pub stations: Timed<StationReport>,
    pub duration: Timed<DurationReport>,
    pub users: Timed<UserReport>,
}

/// Flat, one-row digest of a [`CityReport`] for CSV output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub city: String,
    pub month_filter: String,
    pub day_filter: String,
    pub trips: usize,
    pub top_month: String,
    pub top_weekday: String,
    pub top_hour: u8,
    pub top_start_station: String,
    pub top_end_station: String,
    pub top_route_from: String,
    pub top_route_to: String,
    pub total_duration_seconds: f64,
    pub mean_duration_minutes: f64,
    pub earliest_birth_year: Option<i32>,
    pub mean_birth_year: Option<f64>,
    pub latest_birth_year: Option<i32>,
}

impl From<&CityReport> for ReportSummary {
    fn from(report: &CityReport) -> Self {
        let time = &report.travel_time.report;
        let stations = &report.stations.report;
        let duration = &report.duration.report;
        let years = match &report.users.report.birth_year {
            BirthYearBreakdown::Present {
                summary: Some(summary),
                ..
            } => Some(summary),
            _ => None,
        };

        ReportSummary {
            city: report.city.clone(),
            month_filter: report.criteria.month.label().to_string(),
            day_filter: report.criteria.day.label().to_string(),
            trips: report.trips,
            top_month: time.month.to_string(),
            top_weekday: time.weekday.to_string(),
            top_hour: time.hour,
            top_start_station: stations.start_station.clone(),
            top_end_station: stations.end_station.clone(),
            top_route_from: stations.route.from.clone(),
            top_route_to: stations.route.to.clone(),
            total_duration_seconds: duration.total_seconds(),
            mean_duration_minutes: duration.mean_minutes,
            earliest_birth_year: years.map(|y| y.earliest),
            mean_birth_year: years.map(|y| y.mean),
            latest_birth_year: years.map(|y| y.latest),
        }
    }
}
