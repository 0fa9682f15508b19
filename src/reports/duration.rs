use anyhow::{Result, ensure};
use chrono::TimeDelta;

use crate::dataset::Dataset;
use crate::reports::types::DurationReport;
use crate::reports::utility::round_to;

/// Total time spent on all trips and the mean trip length in minutes.
#[tracing::instrument(skip_all, fields(city = %dataset.city, trips = dataset.len()))]
pub fn duration_report(dataset: &Dataset) -> Result<DurationReport> {
    ensure!(!dataset.is_empty(), "no trips to report durations on");

    let total = dataset
        .iter()
        .map(|r| r.duration())
        .fold(TimeDelta::zero(), |acc, d| acc + d);

    let total_millis = total.num_milliseconds();
    let mean_seconds = total_millis as f64 / 1000.0 / dataset.len() as f64;

    Ok(DurationReport {
        total_millis,
        mean_minutes: round_to(mean_seconds / 60.0, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Schema, TripRecord};
    use chrono::NaiveDateTime;

    #[test]
    fn test_total_and_mean() {
        let report = duration_report(&dataset(&[60, 120, 180])).unwrap();
        assert_eq!(report.total_millis, 360_000);
        assert_eq!(report.total(), TimeDelta::seconds(360));
        assert_eq!(report.mean_minutes, 2.0);
    }

    #[test]
    fn test_fractional_seconds_kept_in_total() {
        let records = vec![trip(TimeDelta::milliseconds(90_500)), trip(TimeDelta::milliseconds(90_250))];
        let report = duration_report(&Dataset::new("chicago", Schema::default(), records)).unwrap();

        assert_eq!(report.total_millis, 180_750);
        assert_eq!(report.total_seconds(), 180.75);
        // 90.375s per trip
        assert_eq!(report.mean_minutes, 1.51);
        assert!((report.total_seconds() / 2.0 / 60.0 - report.mean_minutes).abs() < 0.005);
    }

    #[test]
    fn test_mean_rounded_to_two_places() {
        // 100s / 60 = 1.6666...
        let report = duration_report(&dataset(&[100])).unwrap();
        assert_eq!(report.mean_minutes, 1.67);
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert!(duration_report(&dataset(&[])).is_err());
    }

    fn trip(length: TimeDelta) -> TripRecord {
        let start = NaiveDateTime::parse_from_str("2017-06-01 07:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        TripRecord::new(start, start + length, "A", "B").unwrap()
    }

    fn dataset(seconds: &[i64]) -> Dataset {
        let records = seconds.iter().map(|s| trip(TimeDelta::seconds(*s))).collect();
        Dataset::new("washington", Schema::default(), records)
    }
}
