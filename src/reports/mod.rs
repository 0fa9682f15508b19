//! Descriptive statistics over a filtered trip dataset.
//!
//! Four independent reports (travel time, stations, duration, users) each
//! take a non-empty [`Dataset`](crate::dataset::Dataset) and return
//! structured values; turning them into text is left to [`crate::output`].

pub mod aggregate;
pub mod duration;
pub mod imbalance;
pub mod station;
pub mod time;
pub mod types;
pub mod users;
pub mod utility;

pub use aggregate::aggregate_city;
pub use duration::duration_report;
pub use station::station_report;
pub use time::travel_time_report;
pub use users::user_report;
