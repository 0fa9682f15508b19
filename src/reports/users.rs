use anyhow::{Result, ensure};
use tracing::{debug, info};

use crate::clean::{BIRTH_YEAR_MAX, BIRTH_YEAR_MIN, clean_column, has_outliers};
use crate::dataset::Dataset;
use crate::reports::types::{
    BirthYearBreakdown, BirthYearCleaning, GenderBreakdown, UserReport, YearSummary,
};
use crate::reports::utility::{mean, value_counts};

/// User type counts, gender counts and birth-year extremes.
///
/// Gender and birth year are only reported when the city's schema carries
/// those columns. Birth years outside 1907–2015 are blanked before the final
/// summary is computed.
#[tracing::instrument(skip_all, fields(city = %dataset.city, trips = dataset.len()))]
pub fn user_report(dataset: &Dataset) -> Result<UserReport> {
    ensure!(!dataset.is_empty(), "no trips to report users on");

    let user_types = value_counts(dataset.iter().filter_map(|r| r.user_type.clone()));

    let gender = if dataset.schema.gender {
        let counts = value_counts(dataset.iter().filter_map(|r| r.gender.clone()));
        let missing = dataset.iter().filter(|r| r.gender.is_none()).count();
        GenderBreakdown::Present { counts, missing }
    } else {
        GenderBreakdown::Absent
    };

    let birth_year = if dataset.schema.birth_year {
        let years: Vec<Option<i32>> = dataset.iter().map(|r| r.birth_year).collect();
        birth_year_breakdown(&years)
    } else {
        BirthYearBreakdown::Absent
    };

    Ok(UserReport {
        user_types,
        gender,
        birth_year,
    })
}

/// Summarises a birth-year column, cleaning it first when it holds
/// implausible years.
pub fn birth_year_breakdown(years: &[Option<i32>]) -> BirthYearBreakdown {
    if !has_outliers(years, BIRTH_YEAR_MIN, BIRTH_YEAR_MAX) {
        return BirthYearBreakdown::Present {
            cleaning: None,
            summary: year_summary(years),
        };
    }

    // outliers exist, so at least one year is present
    let Some(before) = year_summary(years) else {
        return BirthYearBreakdown::Present {
            cleaning: None,
            summary: None,
        };
    };

    let cleaned = clean_column(years, BIRTH_YEAR_MIN, BIRTH_YEAR_MAX);
    info!(
        replaced = cleaned.replaced,
        earliest = before.earliest,
        latest = before.latest,
        "Blanked out-of-range birth years"
    );

    BirthYearBreakdown::Present {
        cleaning: Some(BirthYearCleaning {
            replaced: cleaned.replaced,
            before,
        }),
        summary: year_summary(&cleaned.column),
    }
}

/// Earliest, mean and latest of the present years; `None` if there are none.
pub fn year_summary(years: &[Option<i32>]) -> Option<YearSummary> {
    let present: Vec<i32> = years.iter().flatten().copied().collect();
    let earliest = *present.iter().min()?;
    let latest = *present.iter().max()?;
    let as_f64: Vec<f64> = present.iter().map(|y| f64::from(*y)).collect();

    debug!(count = present.len(), "Birth year summary");
    Some(YearSummary {
        earliest,
        mean: mean(&as_f64),
        latest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Schema, TripRecord};
    use chrono::NaiveDateTime;

    #[test]
    fn test_user_type_counts() {
        let records = vec![
            trip().with_user_type("Customer"),
            trip().with_user_type("Subscriber"),
            trip().with_user_type("Subscriber"),
            trip(),
        ];
        let report = user_report(&Dataset::new("washington", Schema::default(), records)).unwrap();

        assert_eq!(
            report.user_types,
            vec![("Subscriber".to_string(), 2), ("Customer".to_string(), 1)]
        );
        assert_eq!(report.gender, GenderBreakdown::Absent);
        assert_eq!(report.birth_year, BirthYearBreakdown::Absent);
    }

    #[test]
    fn test_gender_counts_and_missing() {
        let records = vec![
            trip().with_gender("Male"),
            trip().with_gender("Female"),
            trip().with_gender("Male"),
            trip(),
        ];
        let schema = Schema {
            gender: true,
            birth_year: false,
        };
        let report = user_report(&Dataset::new("chicago", schema, records)).unwrap();

        assert_eq!(
            report.gender,
            GenderBreakdown::Present {
                counts: vec![("Male".to_string(), 2), ("Female".to_string(), 1)],
                missing: 1,
            }
        );
    }

    #[test]
    fn test_present_but_empty_gender_column() {
        let schema = Schema {
            gender: true,
            birth_year: false,
        };
        let report = user_report(&Dataset::new("chicago", schema, vec![trip(), trip()])).unwrap();

        assert_eq!(
            report.gender,
            GenderBreakdown::Present {
                counts: vec![],
                missing: 2,
            }
        );
    }

    #[test]
    fn test_birth_year_cleaning_end_to_end() {
        let records = [1850, 1995, 2030, 1980]
            .into_iter()
            .map(|y| trip().with_birth_year(y))
            .collect();
        let report = user_report(&Dataset::new("chicago", Schema::full(), records)).unwrap();

        assert_eq!(
            report.birth_year,
            BirthYearBreakdown::Present {
                cleaning: Some(BirthYearCleaning {
                    replaced: 2,
                    before: YearSummary {
                        earliest: 1850,
                        mean: 1963.75,
                        latest: 2030,
                    },
                }),
                summary: Some(YearSummary {
                    earliest: 1980,
                    mean: 1987.5,
                    latest: 1995,
                }),
            }
        );
    }

    #[test]
    fn test_birth_year_without_outliers_skips_cleaning() {
        let years = vec![Some(1990), None, Some(1970)];
        assert_eq!(
            birth_year_breakdown(&years),
            BirthYearBreakdown::Present {
                cleaning: None,
                summary: Some(YearSummary {
                    earliest: 1970,
                    mean: 1980.0,
                    latest: 1990,
                }),
            }
        );
    }

    #[test]
    fn test_birth_year_all_outliers() {
        let years = vec![Some(1800), Some(2100)];
        match birth_year_breakdown(&years) {
            BirthYearBreakdown::Present { cleaning, summary } => {
                assert_eq!(cleaning.unwrap().replaced, 2);
                assert_eq!(summary, None);
            }
            BirthYearBreakdown::Absent => panic!("column is present"),
        }
    }

    #[test]
    fn test_birth_year_all_missing() {
        assert_eq!(
            birth_year_breakdown(&[None, None]),
            BirthYearBreakdown::Present {
                cleaning: None,
                summary: None,
            }
        );
    }

    fn trip() -> TripRecord {
        let start = NaiveDateTime::parse_from_str("2017-02-10 18:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        TripRecord::new(start, start, "A", "B").unwrap()
    }
}
