//! Interactive selection of city, month and day, with confirmation.
//!
//! Answers are matched on their first three characters, ignoring case, so
//! `wed`, `Wednes` and `WEDNESDAY` all select `Wednesday`.

use anyhow::{Context, Result, bail};
use bikeshare_stats::calendar::{DayOfWeek, Month, Selector, Vocabulary};
use bikeshare_stats::dataset::{Dataset, TripRecord};
use bikeshare_stats::filter::FilterCriteria;
use std::io::{BufRead, Write};
use tracing::debug;

/// How many unmatched answers are tolerated before giving up.
pub const MAX_TRIES: usize = 20;

/// Rows shown per page when browsing raw data.
pub const PAGE_SIZE: usize = 5;

const COMPLAINTS: [&str; 6] = [
    "Ha! Ha! You are funny !",
    "Well that didn't work",
    "Let's try that again.. Properly this time. Look at the options again please.",
    "Hmm... Nope!",
    "I wasn't paying attention, could you repeat that please!",
    "Oh ! I didn't find that in my option list. Try again Please !",
];

/// An option picked from a list, and whether it was typed in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub option: String,
    pub exact: bool,
}

impl Choice {
    pub fn acknowledgement(&self) -> String {
        if self.exact {
            format!("{}. Got it!", self.option)
        } else {
            format!("{}. Close enough !", self.option)
        }
    }
}

/// What the user wants after seeing the selected filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Change,
    Look,
    Exit,
}

/// Matches `input` against `options` on the first three characters,
/// ignoring case. The first matching option wins.
pub fn match_option(input: &str, options: &[&str]) -> Option<Choice> {
    let input = input.trim();
    let key = short(input);
    options
        .iter()
        .find(|option| short(option) == key)
        .map(|option| Choice {
            option: option.to_string(),
            exact: input == *option,
        })
}

fn short(text: &str) -> String {
    text.chars().take(3).collect::<String>().to_lowercase()
}

/// `'Chicago', 'New York City'`
pub fn options_str(options: &[&str]) -> String {
    options
        .iter()
        .map(|o| format!("'{o}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves a month given on the command line.
pub fn month_arg(value: &str) -> Result<Selector<Month>> {
    let options = Month::options();
    let choice = match_option(value, &options)
        .with_context(|| format!("unknown month '{value}', expected one of {}", options_str(&options)))?;
    Selector::from_option(&choice.option).context("month option out of vocabulary")
}

/// Resolves a day given on the command line.
pub fn day_arg(value: &str) -> Result<Selector<DayOfWeek>> {
    let options = DayOfWeek::options();
    let choice = match_option(value, &options)
        .with_context(|| format!("unknown day '{value}', expected one of {}", options_str(&options)))?;
    Selector::from_option(&choice.option).context("day option out of vocabulary")
}

/// Line-oriented prompt over any reader and writer.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("reading answer")?;
        if read == 0 {
            bail!("input closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Asks `message` until the answer matches one of `options`.
    ///
    /// # Errors
    ///
    /// Fails after [`MAX_TRIES`] unmatched answers or when input ends.
    pub fn choose(&mut self, message: &str, options: &[&str]) -> Result<Choice> {
        let mut tries = MAX_TRIES;
        while tries > 0 {
            self.say(message)?;
            let answer = self.read_line()?;
            if let Some(choice) = match_option(&answer, options) {
                debug!(answer = %answer, option = %choice.option, exact = choice.exact, "Answer matched");
                return Ok(choice);
            }

            tries -= 1;
            if tries > 0 {
                let complaint = COMPLAINTS[tries % COMPLAINTS.len()];
                self.say(complaint)?;
                self.say(&format!(
                    "You may try {} more time{}",
                    tries,
                    if tries > 1 { "s" } else { "" }
                ))?;
            }
        }
        bail!("no valid answer after {MAX_TRIES} tries")
    }

    pub fn city(&mut self, cities: &[String]) -> Result<String> {
        let options: Vec<&str> = cities.iter().map(String::as_str).collect();
        let choice = self.choose(
            &format!(
                "\nPlease introduce the name of the city that you would like to see information about:\n(options are: {})",
                options_str(&options)
            ),
            &options,
        )?;
        self.say(&choice.acknowledgement())?;
        Ok(choice.option)
    }

    pub fn month(&mut self) -> Result<Selector<Month>> {
        let options = Month::options();
        let choice = self.choose(
            &format!(
                "\nPlease choose the month you want to filter the dataset by, or type 'all' for no filter\n(options are {})",
                options_str(&options)
            ),
            &options,
        )?;
        self.say(&choice.acknowledgement())?;
        Selector::from_option(&choice.option).context("month option out of vocabulary")
    }

    pub fn day(&mut self) -> Result<Selector<DayOfWeek>> {
        let options = DayOfWeek::options();
        let choice = self.choose(
            &format!(
                "\nLast filtering option, what day would you prefer filtering by, type 'All' for all.\n(options are {})",
                options_str(&options)
            ),
            &options,
        )?;
        self.say(&choice.acknowledgement())?;
        Selector::from_option(&choice.option).context("day option out of vocabulary")
    }

    /// Shows the selection back to the user and asks how to continue.
    pub fn confirm(&mut self, city: &str, criteria: &FilterCriteria) -> Result<Confirmation> {
        self.say(&format!(
            "\nSo, what I've got from you, is:\n{city} for city, {} and {}",
            criteria.month.describe("month"),
            criteria.day.describe("day")
        ))?;
        let choice = self.choose(
            "Is that correct? Type:\n'Yes' to continue, 'No' to change the filters, 'Look' to see the data, 'Exit' to end session.",
            &["Yes", "No", "Look", "Exit"],
        )?;

        Ok(match choice.option.as_str() {
            "No" => Confirmation::Change,
            "Look" => Confirmation::Look,
            "Exit" => Confirmation::Exit,
            _ => Confirmation::Proceed,
        })
    }

    /// Shows the raw rows [`PAGE_SIZE`] at a time until the user stops.
    pub fn page(&mut self, dataset: &Dataset) -> Result<()> {
        for chunk in dataset.records.chunks(PAGE_SIZE) {
            for record in chunk {
                self.say(&row_line(record))?;
            }
            let choice = self.choose(
                "Want to see more?\n'Yes' for more, 'No' to continue to stats",
                &["Yes", "No"],
            )?;
            if choice.option == "No" {
                self.say("Ok then, we shall proceed to the stats.")?;
                break;
            }
        }
        Ok(())
    }

    /// True when the user answers `yes` to restarting.
    pub fn restart(&mut self) -> Result<bool> {
        self.say("\nWould you like to restart? Enter 'yes' or 'no'.")?;
        Ok(self.read_line()?.trim().eq_ignore_ascii_case("yes"))
    }
}

fn row_line(record: &TripRecord) -> String {
    format!(
        "{} | {} | {} -> {} | {} | {} | {}",
        record.start,
        record.end,
        record.start_station,
        record.end_station,
        record.user_type.as_deref().unwrap_or("-"),
        record.gender.as_deref().unwrap_or("-"),
        record
            .birth_year
            .map_or_else(|| "-".to_string(), |year| year.to_string()),
    )
}
