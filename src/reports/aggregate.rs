use anyhow::{Result, ensure};
use std::time::Instant;
use tracing::info;

use crate::dataset::Dataset;
use crate::filter::FilterCriteria;
use crate::reports::duration::duration_report;
use crate::reports::station::station_report;
use crate::reports::time::travel_time_report;
use crate::reports::types::{CityReport, Timed};
use crate::reports::users::user_report;

/// Runs `f` and records how long it took.
pub fn timed<T>(f: impl FnOnce() -> Result<T>) -> Result<Timed<T>> {
    let started = Instant::now();
    let report = f()?;
    Ok(Timed {
        report,
        elapsed_secs: started.elapsed().as_secs_f64(),
    })
}

/// Builds all four reports for an already-filtered dataset.
///
/// # Errors
///
/// Fails when `dataset` holds no trips; callers should check first.
pub fn aggregate_city(dataset: &Dataset, criteria: FilterCriteria) -> Result<CityReport> {
    ensure!(
        !dataset.is_empty(),
        "no trips for {} with {} and {}",
        dataset.city,
        criteria.month.describe("month"),
        criteria.day.describe("day")
    );

    let travel_time = timed(|| travel_time_report(dataset))?;
    let stations = timed(|| station_report(dataset))?;
    let duration = timed(|| duration_report(dataset))?;
    let users = timed(|| user_report(dataset))?;

    info!(
        city = %dataset.city,
        trips = dataset.len(),
        elapsed_secs = travel_time.elapsed_secs
            + stations.elapsed_secs
            + duration.elapsed_secs
            + users.elapsed_secs,
        "City report complete"
    );

    Ok(CityReport {
        city: dataset.city.clone(),
        criteria,
        trips: dataset.len(),
        travel_time,
        stations,
        duration,
        users,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Schema, TripRecord};
    use crate::reports::types::ReportSummary;
    use chrono::{NaiveDateTime, TimeDelta};

    #[test]
    fn test_timed_records_elapsed() {
        let timed = timed(|| Ok(42)).unwrap();
        assert_eq!(timed.report, 42);
        assert!(timed.elapsed_secs >= 0.0);
    }

    #[test]
    fn test_timed_propagates_error() {
        let result: Result<Timed<u8>> = timed(|| anyhow::bail!("boom"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let dataset = Dataset::new("chicago", Schema::full(), vec![]);
        assert!(aggregate_city(&dataset, FilterCriteria::all()).is_err());
    }

    #[test]
    fn test_aggregate_and_summary() {
        let start = NaiveDateTime::parse_from_str("2017-01-05 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let records = vec![
            TripRecord::new(start, start + TimeDelta::seconds(60), "A", "B")
                .unwrap()
                .with_user_type("Subscriber")
                .with_birth_year(1990),
            TripRecord::new(start, start + TimeDelta::seconds(180), "A", "C")
                .unwrap()
                .with_user_type("Customer")
                .with_birth_year(1970),
        ];
        let dataset = Dataset::new("chicago", Schema::full(), records);

        let report = aggregate_city(&dataset, FilterCriteria::all()).unwrap();
        assert_eq!(report.trips, 2);
        assert_eq!(report.stations.report.start_station, "A");
        assert_eq!(report.duration.report.total_millis, 240_000);

        let summary = ReportSummary::from(&report);
        assert_eq!(summary.month_filter, "All");
        assert_eq!(summary.top_month, "January");
        assert_eq!(summary.top_weekday, "Thursday");
        assert_eq!(summary.top_route_to, "B");
        assert_eq!(summary.total_duration_seconds, 240.0);
        assert_eq!(summary.mean_duration_minutes, 2.0);
        assert_eq!(summary.earliest_birth_year, Some(1970));
        assert_eq!(summary.mean_birth_year, Some(1980.0));
    }
}
