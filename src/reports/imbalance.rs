//! Inflow/outflow comparison for a single station.
//!
//! | Condition                          | Flag        | Percentage                  |
//! |------------------------------------|-------------|-----------------------------|
//! | departures >= 1.1 x arrivals       | needs bikes | 100 x (1 - arr / dep)       |
//! | arrivals  >= 1.1 x departures      | surplus     | 100 x (1 - dep / arr)       |
//!
//! Both comparisons are inclusive and evaluated on integers (`10 * a` against
//! `11 * b`) so that exactly 1.1x is not blurred by float rounding.

use serde::Serialize;

/// Trips leaving and reaching a station, with the resulting flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationBalance {
    pub station: String,
    pub departures: usize,
    pub arrivals: usize,
    /// Percentage by which departures outnumber arrivals, when flagged.
    pub deficit_pct: Option<f64>,
    /// Percentage by which arrivals outnumber departures, when flagged.
    pub surplus_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Imbalance {
    NeedsBikes,
    Surplus,
    Balanced,
}

impl StationBalance {
    pub fn new(station: impl Into<String>, departures: usize, arrivals: usize) -> Self {
        Self {
            station: station.into(),
            departures,
            arrivals,
            deficit_pct: deficit_pct(departures, arrivals),
            surplus_pct: surplus_pct(departures, arrivals),
        }
    }

    pub fn classify(&self) -> Imbalance {
        match (self.deficit_pct, self.surplus_pct) {
            (Some(_), _) => Imbalance::NeedsBikes,
            (None, Some(_)) => Imbalance::Surplus,
            (None, None) => Imbalance::Balanced,
        }
    }
}

/// `Some(pct)` when departures are at least 1.1x arrivals.
pub fn deficit_pct(departures: usize, arrivals: usize) -> Option<f64> {
    if departures == 0 {
        return None;
    }
    (departures * 10 >= arrivals * 11)
        .then(|| 100.0 * (1.0 - arrivals as f64 / departures as f64))
}

/// `Some(pct)` when arrivals are at least 1.1x departures.
pub fn surplus_pct(departures: usize, arrivals: usize) -> Option<f64> {
    if arrivals == 0 {
        return None;
    }
    (arrivals * 10 >= departures * 11)
        .then(|| 100.0 * (1.0 - departures as f64 / arrivals as f64))
}
