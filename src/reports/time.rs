use anyhow::{Context, Result, ensure};
use tracing::debug;

use crate::dataset::Dataset;
use crate::reports::types::TravelTimeReport;
use crate::reports::utility::{mode, value_counts};

/// Most frequent month, weekday and start hour.
///
/// When the data spans several weekdays, also reports the top hour of the
/// busiest weekday if it differs from the overall top hour.
#[tracing::instrument(skip_all, fields(city = %dataset.city, trips = dataset.len()))]
pub fn travel_time_report(dataset: &Dataset) -> Result<TravelTimeReport> {
    ensure!(!dataset.is_empty(), "no trips to report travel times on");

    let calendars: Vec<_> = dataset.iter().map(|r| r.calendar()).collect();

    let month = mode(calendars.iter().map(|c| c.month)).context("month mode")?;
    let weekdays = value_counts(calendars.iter().map(|c| c.weekday));
    let (weekday, _) = *weekdays.first().context("weekday mode")?;
    let hour = mode(calendars.iter().map(|c| c.hour)).context("hour mode")?;

    let peak_day_hour = if weekdays.len() > 1 {
        let day_hour = mode(
            calendars
                .iter()
                .filter(|c| c.weekday == weekday)
                .map(|c| c.hour),
        )
        .context("hour mode within top weekday")?;
        debug!(%weekday, day_hour, hour, "Compared top weekday hour with overall");
        (day_hour != hour).then_some(day_hour)
    } else {
        None
    };

    Ok(TravelTimeReport {
        month,
        weekday,
        hour,
        peak_day_hour,
    })
}
