//! Range-based outlier cleaning for numeric columns.

use serde::Serialize;

/// Bounds applied when a caller has no domain-specific range.
pub const DEFAULT_MIN: i32 = 1900;
pub const DEFAULT_MAX: i32 = 2020;

/// Plausible birth years for riders in the published datasets.
pub const BIRTH_YEAR_MIN: i32 = 1907;
pub const BIRTH_YEAR_MAX: i32 = 2015;

/// A column after cleaning, with the number of values that were replaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningResult<T> {
    pub column: Vec<Option<T>>,
    pub replaced: usize,
}

/// Replaces every present value outside `[min, max]` with `None`.
///
/// Values already missing are kept as they are and are not counted.
pub fn clean_column<T>(column: &[Option<T>], min: T, max: T) -> CleaningResult<T>
where
    T: PartialOrd + Copy,
{
    let mut replaced = 0;
    let column = column
        .iter()
        .map(|value| match value {
            Some(v) if *v < min || *v > max => {
                replaced += 1;
                None
            }
            other => *other,
        })
        .collect();

    CleaningResult { column, replaced }
}

/// [`clean_column`] with the default [`DEFAULT_MIN`]..=[`DEFAULT_MAX`] range.
pub fn clean_with_defaults(column: &[Option<i32>]) -> CleaningResult<i32> {
    clean_column(column, DEFAULT_MIN, DEFAULT_MAX)
}

/// True if any present value lies outside `[min, max]`.
pub fn has_outliers<T: PartialOrd + Copy>(column: &[Option<T>], min: T, max: T) -> bool {
    column.iter().flatten().any(|v| *v < min || *v > max)
}
