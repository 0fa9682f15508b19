//! Output formatting and persistence for city reports.
//!
//! Supports narrative text, pretty-printed JSON, and CSV summary append.

use anyhow::Result;
use chrono::TimeDelta;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::reports::types::{
    BirthYearBreakdown, CityReport, DurationReport, GenderBreakdown, ReportSummary, StationReport,
    Timed, TravelTimeReport, UserReport,
};
use crate::reports::utility::round_to;
use csv::WriterBuilder;

const RULE_WIDTH: usize = 100;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &CityReport) {
    debug!("{:#?}", report);
}

/// Writes a report as pretty-printed JSON.
pub fn print_json<W: Write>(out: &mut W, report: &CityReport) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Writes every section of `report` as narrative text.
pub fn print_text<W: Write>(out: &mut W, report: &CityReport) -> Result<()> {
    for line in render_report(report) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Appends a [`ReportSummary`] row for `report` to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, report: &CityReport) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(ReportSummary::from(report))?;
    writer.flush()?;

    Ok(())
}

pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// All four sections, each followed by its timing and a rule.
pub fn render_report(report: &CityReport) -> Vec<String> {
    let mut lines = Vec::new();

    section(
        &mut lines,
        "Calculating The Most Frequent Times of Travel...",
        &report.travel_time,
        travel_time_lines,
    );
    section(
        &mut lines,
        "Calculating The Most Popular Stations and Trip...",
        &report.stations,
        station_lines,
    );
    section(
        &mut lines,
        "Calculating Trip Duration...",
        &report.duration,
        duration_lines,
    );
    section(
        &mut lines,
        "Calculating User Stats...",
        &report.users,
        user_lines,
    );

    lines
}

fn section<T>(
    lines: &mut Vec<String>,
    title: &str,
    timed: &Timed<T>,
    render: fn(&T) -> Vec<String>,
) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push(String::new());
    lines.extend(render(&timed.report));
    lines.push(String::new());
    lines.push(elapsed_line(timed.elapsed_secs));
    lines.push(rule());
}

pub fn elapsed_line(elapsed_secs: f64) -> String {
    format!("This took {} seconds.", round_to(elapsed_secs, 5))
}

pub fn travel_time_lines(report: &TravelTimeReport) -> Vec<String> {
    let mut lines = vec![
        format!("The month with the most bike rentals is {}", report.month),
        format!("The day with the most rentals is {}", report.weekday),
        format!(
            "The hour of the day that people ride the most is {}",
            report.hour
        ),
    ];
    if let Some(hour) = report.peak_day_hour {
        lines.push(format!(
            "Particularly interesting, {}'s top hour is {}",
            report.weekday, hour
        ));
    }
    lines
}

pub fn station_lines(report: &StationReport) -> Vec<String> {
    let mut lines = vec![
        format!("The most popular station in town is '{}'", report.start_station),
        format!("Most often, people stop at '{}' station", report.end_station),
    ];
    if report.same_top_station {
        lines.push(format!(
            "This '{}' station seems to be very very popular here",
            report.start_station
        ));
    }
    lines.push(format!(
        "People usually go from '{}' to '{}' station",
        report.route.from, report.route.to
    ));

    let balance = &report.balance;
    if let Some(pct) = balance.deficit_pct {
        lines.push(String::new());
        lines.push(format!(
            "...pssst, if you run the company, '{}' station might need more bikes..",
            balance.station
        ));
        lines.push(counts_line(balance.departures, balance.arrivals));
        lines.push(format!("{pct:.2}% more rides start here than end here"));
    }
    if let Some(pct) = balance.surplus_pct {
        lines.push(String::new());
        lines.push(format!(
            "...pssst, if you run the company, '{}' station might have an excess of bikes..",
            balance.station
        ));
        lines.push(counts_line(balance.departures, balance.arrivals));
        lines.push(format!("{pct:.2}% more trips end here than start from here..."));
    }
    lines
}

fn counts_line(departures: usize, arrivals: usize) -> String {
    format!("{departures} trips start from here and {arrivals} trips end here.")
}

pub fn duration_lines(report: &DurationReport) -> Vec<String> {
    vec![
        format!(
            "Total duration of all trips : {}",
            format_duration(report.total())
        ),
        format!(
            "The average duration per trip : {:.2} minutes",
            report.mean_minutes
        ),
    ]
}

/// Formats a span as `D days HH:MM:SS`.
pub fn format_duration(span: TimeDelta) -> String {
    let sign = if span < TimeDelta::zero() { "-" } else { "" };
    let millis = span.num_milliseconds().unsigned_abs();
    let total = millis / 1_000;
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;
    let seconds = total % 60;
    match millis % 1_000 {
        0 => format!("{sign}{days} days {hours:02}:{minutes:02}:{seconds:02}"),
        frac => format!("{sign}{days} days {hours:02}:{minutes:02}:{seconds:02}.{frac:03}"),
    }
}

pub fn user_lines(report: &UserReport) -> Vec<String> {
    let mut lines = vec![format!(
        "There are {} types of users, here's their type and how many of each:",
        report.user_types.len()
    )];
    lines.extend(count_lines(&report.user_types));
    lines.push(String::new());

    match &report.gender {
        GenderBreakdown::Present { counts, missing } => {
            lines.push("Of the people that rented the bikes, there were:".to_string());
            lines.extend(count_lines(counts));
            if *missing > 0 {
                lines.push(format!(
                    "(You should know that in this column, there are {missing} missing values)"
                ));
            }
        }
        GenderBreakdown::Absent => {
            lines.push("No gender information found in this dataset".to_string());
        }
    }
    lines.push(String::new());

    match &report.birth_year {
        BirthYearBreakdown::Present { cleaning, summary } => {
            lines.push("Let's look at the 'Birth Year' column...".to_string());
            if let Some(cleaning) = cleaning {
                let plural = cleaning.replaced > 1;
                lines.push(format!(
                    "--Hmm.. found {} abnormal value{}, like {}{}.",
                    cleaning.replaced,
                    if plural { "s" } else { "" },
                    cleaning.before.earliest,
                    if plural { ", that's the smallest" } else { "" },
                ));
                lines.push(
                    "--Probably from typos or somebody lied in their profile or something..."
                        .to_string(),
                );
                lines.push(format!(
                    "--I have replaced {} entries with missing values",
                    cleaning.replaced
                ));
                lines.push(String::new());
                lines.push(
                    "Here are the earliest, average and latest year of birth before cleaning the data:"
                        .to_string(),
                );
                lines.push(format!("Earliest year of birth: {}", cleaning.before.earliest));
                lines.push(format!(
                    "The average value of birth years: {}",
                    round_to(cleaning.before.mean, 2)
                ));
                lines.push(format!("The latest year of birth: {}", cleaning.before.latest));
                lines.push(String::new());
                lines.push("And now let's see how the data looks after cleaning:".to_string());
            }
            match summary {
                Some(summary) => {
                    lines.push(format!("The oldest person was born in {}", summary.earliest));
                    lines.push(format!(
                        "The average year of birth {}",
                        round_to(summary.mean, 2)
                    ));
                    lines.push(format!(
                        "The youngest of them all was born in {}",
                        summary.latest
                    ));
                }
                None => lines.push("No usable birth years remain".to_string()),
            }
        }
        BirthYearBreakdown::Absent => {
            lines.push("Couldn't find anything on the birth year of the bike riders".to_string());
        }
    }

    lines
}

fn count_lines(counts: &[(String, usize)]) -> impl Iterator<Item = String> + '_ {
    counts.iter().map(|(name, count)| format!("{name}: {count}"))
}
