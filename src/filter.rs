use serde::Serialize;
use tracing::debug;

use crate::calendar::{DayOfWeek, Month, Selector};
use crate::dataset::{Dataset, TripRecord};

/// Month and day constraints chosen for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub month: Selector<Month>,
    pub day: Selector<DayOfWeek>,
}

impl FilterCriteria {
    pub fn new(month: Selector<Month>, day: Selector<DayOfWeek>) -> Self {
        Self { month, day }
    }

    /// No constraint on either dimension.
    pub fn all() -> Self {
        Self::new(Selector::All, Selector::All)
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        let calendar = record.calendar();
        self.month.matches(calendar.month) && self.day.matches(calendar.weekday)
    }
}

/// Returns the records of `dataset` that satisfy `criteria`, in source order.
///
/// The input is left untouched. An empty result is valid: a city's
/// collection window may never cover the requested weekday and month.
pub fn apply(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let records: Vec<TripRecord> = dataset
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect();

    debug!(
        city = %dataset.city,
        month = criteria.month.label(),
        day = criteria.day.label(),
        before = dataset.len(),
        after = records.len(),
        "Filter applied"
    );

    Dataset::new(dataset.city.clone(), dataset.schema, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Schema;
    use chrono::NaiveDateTime;

    #[test]
    fn test_all_all_is_identity() {
        let dataset = sample();
        let filtered = apply(&dataset, &FilterCriteria::all());
        assert_eq!(filtered, dataset);
    }

    #[test]
    fn test_month_only() {
        let dataset = sample();
        let criteria = FilterCriteria::new(Selector::Only(Month::January), Selector::All);
        let filtered = apply(&dataset, &criteria);

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.calendar().month == Month::January));
    }

    #[test]
    fn test_day_only() {
        let dataset = sample();
        let criteria = FilterCriteria::new(Selector::All, Selector::Only(DayOfWeek::Monday));
        let filtered = apply(&dataset, &criteria);

        let stations: Vec<&str> = filtered.iter().map(|r| r.start_station.as_str()).collect();
        assert_eq!(stations, vec!["jan-mon", "feb-mon"]);
    }

    #[test]
    fn test_conjunction() {
        let dataset = sample();
        let criteria = FilterCriteria::new(
            Selector::Only(Month::February),
            Selector::Only(DayOfWeek::Monday),
        );
        let filtered = apply(&dataset, &criteria);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records[0].start_station, "feb-mon");
    }

    #[test]
    fn test_empty_result_is_valid() {
        let dataset = sample();
        let criteria = FilterCriteria::new(
            Selector::Only(Month::June),
            Selector::Only(DayOfWeek::Sunday),
        );
        let filtered = apply(&dataset, &criteria);

        assert!(filtered.is_empty());
        assert_eq!(filtered.schema, dataset.schema);
        assert_eq!(filtered.city, "chicago");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = sample();
        let criteria = FilterCriteria::new(Selector::Only(Month::January), Selector::All);

        let once = apply(&dataset, &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_leaves_input_untouched() {
        let dataset = sample();
        let snapshot = dataset.clone();
        let criteria = FilterCriteria::new(Selector::All, Selector::Only(DayOfWeek::Tuesday));

        let _ = apply(&dataset, &criteria);
        assert_eq!(dataset, snapshot);
    }

    // 2017-01-02 and 2017-02-06 are Mondays
    fn sample() -> Dataset {
        Dataset::new(
            "chicago",
            Schema::full(),
            vec![
                trip("2017-01-02 08:00:00", "jan-mon"),
                trip("2017-01-03 08:00:00", "jan-tue"),
                trip("2017-02-06 08:00:00", "feb-mon"),
                trip("2017-02-07 08:00:00", "feb-tue"),
            ],
        )
    }

    fn trip(start: &str, station: &str) -> TripRecord {
        let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        TripRecord::new(start, start, station, station).unwrap()
    }
}
