use anyhow::{Context, Result, ensure};
use tracing::debug;

use crate::dataset::Dataset;
use crate::reports::imbalance::StationBalance;
use crate::reports::types::{Route, StationReport};
use crate::reports::utility::mode;

/// Most popular start station, end station and route, plus the inflow/outflow
/// balance of the route's start station.
#[tracing::instrument(skip_all, fields(city = %dataset.city, trips = dataset.len()))]
pub fn station_report(dataset: &Dataset) -> Result<StationReport> {
    ensure!(!dataset.is_empty(), "no trips to report stations on");

    let start_station = mode(dataset.iter().map(|r| r.start_station.as_str()))
        .context("start station mode")?
        .to_string();
    let end_station = mode(dataset.iter().map(|r| r.end_station.as_str()))
        .context("end station mode")?
        .to_string();

    let (from, to) = mode(
        dataset
            .iter()
            .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
    )
    .context("route mode")?;
    let route = Route {
        from: from.to_string(),
        to: to.to_string(),
    };

    let balance = station_balance(dataset, &route.from);
    debug!(
        station = %balance.station,
        departures = balance.departures,
        arrivals = balance.arrivals,
        "Station balance computed"
    );

    Ok(StationReport {
        same_top_station: start_station == end_station,
        start_station,
        end_station,
        route,
        balance,
    })
}

/// Counts trips departing from and arriving at `station`.
pub fn station_balance(dataset: &Dataset, station: &str) -> StationBalance {
    let departures = dataset
        .iter()
        .filter(|r| r.start_station == station)
        .count();
    let arrivals = dataset.iter().filter(|r| r.end_station == station).count();

    StationBalance::new(station, departures, arrivals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Schema, TripRecord};
    use crate::reports::imbalance::Imbalance;
    use chrono::NaiveDateTime;

    #[test]
    fn test_empty_dataset_is_rejected() {
        let dataset = Dataset::new("chicago", Schema::default(), vec![]);
        assert!(station_report(&dataset).is_err());
    }

    #[test]
    fn test_top_stations_and_route() {
        let report = station_report(&dataset(&[
            ("Clark St", "Lake St"),
            ("Clark St", "Lake St"),
            ("Clark St", "State St"),
            ("State St", "Clark St"),
        ]))
        .unwrap();

        assert_eq!(report.start_station, "Clark St");
        assert_eq!(report.end_station, "Lake St");
        assert!(!report.same_top_station);
        assert_eq!(
            report.route,
            Route {
                from: "Clark St".into(),
                to: "Lake St".into()
            }
        );
        assert_eq!(report.balance.departures, 3);
        assert_eq!(report.balance.arrivals, 1);
        assert_eq!(report.balance.classify(), Imbalance::NeedsBikes);
    }

    #[test]
    fn test_same_top_station() {
        let report = station_report(&dataset(&[
            ("Lake St", "Lake St"),
            ("Lake St", "Clark St"),
            ("Clark St", "Lake St"),
        ]))
        .unwrap();

        assert_eq!(report.start_station, "Lake St");
        assert_eq!(report.end_station, "Lake St");
        assert!(report.same_top_station);
        assert_eq!(report.balance.classify(), Imbalance::Balanced);
    }

    #[test]
    fn test_route_names_may_contain_separators() {
        // a joined-string key would split these wrongly
        let report = station_report(&dataset(&[
            ("A---B", "C"),
            ("A---B", "C"),
            ("A", "B---C"),
        ]))
        .unwrap();

        assert_eq!(report.route.from, "A---B");
        assert_eq!(report.route.to, "C");
    }

    #[test]
    fn test_route_start_receiving_more_bikes() {
        let report = station_report(&dataset(&[
            ("Dock", "Pier"),
            ("Dock", "Pier"),
            ("Pier", "Dock"),
            ("Beach", "Dock"),
            ("Park", "Dock"),
        ]))
        .unwrap();

        assert_eq!(report.route.from, "Dock");
        assert_eq!(report.balance.departures, 2);
        assert_eq!(report.balance.arrivals, 3);
        assert_eq!(report.balance.classify(), Imbalance::Surplus);
    }

    #[test]
    fn test_dataset_not_modified() {
        let data = dataset(&[("A", "B"), ("B", "A")]);
        let snapshot = data.clone();
        station_report(&data).unwrap();
        assert_eq!(data, snapshot);
    }

    fn dataset(trips: &[(&str, &str)]) -> Dataset {
        let start = NaiveDateTime::parse_from_str("2017-04-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let records = trips
            .iter()
            .map(|(from, to)| TripRecord::new(start, start, *from, *to).unwrap())
            .collect();
        Dataset::new("chicago", Schema::default(), records)
    }
}
