pub mod calendar;
pub mod clean;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
