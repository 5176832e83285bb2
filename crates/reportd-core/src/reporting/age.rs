//! Age arithmetic.
//!
//! Age is the year difference between the reference date and the birthday,
//! minus one when the reference falls before that year's anniversary. The
//! anniversary check compares `(month, day)` tuples, so a Feb 29 birthday
//! counts as passed on Mar 1 (and not on Feb 28) in non-leap years.

use chrono::{Datelike, NaiveDate};

use crate::reporting::dates::ToReportDate;

/// One date or a sequence of dates; `count_age` broadcasts over sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSet {
    One(NaiveDate),
    Many(Vec<NaiveDate>),
}

impl DateSet {
    /// Normalize any instant-like value to a single calendar date.
    pub fn one(value: impl ToReportDate) -> Self {
        DateSet::One(value.to_report_date())
    }

    /// Normalize a sequence of instant-like values to calendar dates.
    pub fn many<T: ToReportDate>(values: impl IntoIterator<Item = T>) -> Self {
        DateSet::Many(values.into_iter().map(|v| v.to_report_date()).collect())
    }

    fn len(&self) -> usize {
        match self {
            DateSet::One(_) => 1,
            DateSet::Many(dates) => dates.len(),
        }
    }
}

impl From<NaiveDate> for DateSet {
    fn from(date: NaiveDate) -> Self {
        DateSet::One(date)
    }
}

impl From<Vec<NaiveDate>> for DateSet {
    fn from(dates: Vec<NaiveDate>) -> Self {
        DateSet::Many(dates)
    }
}

/// Result of an age computation, scalar or element-wise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeCount {
    One(i32),
    Many(Vec<i32>),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AgeError {
    #[error(
        "the length of reference dates ({references}) must equal 1 or match \
         the number of birthdays ({birthdays})"
    )]
    LengthMismatch { birthdays: usize, references: usize },
}

/// True when the reference date falls on or after that year's anniversary
/// of the birthday.
fn after_anniversary(birthday: NaiveDate, reference: NaiveDate) -> bool {
    (reference.month(), reference.day()) >= (birthday.month(), birthday.day())
}

/// Age of a person born on `birthday` at `reference`.
pub fn single_age_count(birthday: NaiveDate, reference: NaiveDate) -> i32 {
    let years = reference.year() - birthday.year();
    if after_anniversary(birthday, reference) {
        years
    } else {
        years - 1
    }
}

/// Age computation with broadcasting: scalars and sequences combine
/// element-wise; two sequences must have equal length.
pub fn count_age(
    birthday: impl Into<DateSet>,
    reference: impl Into<DateSet>,
) -> Result<AgeCount, AgeError> {
    let birthday = birthday.into();
    let reference = reference.into();
    let result = match (&birthday, &reference) {
        (DateSet::One(bday), DateSet::One(reference)) => {
            AgeCount::One(single_age_count(*bday, *reference))
        }
        (DateSet::Many(bdays), DateSet::One(reference)) => AgeCount::Many(
            bdays
                .iter()
                .map(|bday| single_age_count(*bday, *reference))
                .collect(),
        ),
        (DateSet::One(bday), DateSet::Many(references)) => AgeCount::Many(
            references
                .iter()
                .map(|reference| single_age_count(*bday, *reference))
                .collect(),
        ),
        (DateSet::Many(bdays), DateSet::Many(references)) => {
            if bdays.len() != references.len() {
                return Err(AgeError::LengthMismatch {
                    birthdays: birthday.len(),
                    references: reference.len(),
                });
            }
            AgeCount::Many(
                bdays
                    .iter()
                    .zip(references.iter())
                    .map(|(bday, reference)| single_age_count(*bday, *reference))
                    .collect(),
            )
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn scalar_age_before_and_on_anniversary() {
        let birthday = date(1990, 6, 15);
        assert_eq!(count_age(birthday, date(2024, 6, 14)), Ok(AgeCount::One(33)));
        assert_eq!(count_age(birthday, date(2024, 6, 15)), Ok(AgeCount::One(34)));
    }

    #[test]
    fn age_at_own_birthday_is_zero() {
        let birthday = date(1990, 6, 15);
        assert_eq!(single_age_count(birthday, birthday), 0);
        assert_eq!(single_age_count(birthday, date(1991, 6, 14)), 0);
        assert_eq!(single_age_count(birthday, date(1991, 6, 15)), 1);
    }

    #[test]
    fn broadcast_birthdays_over_one_reference() {
        let birthdays = vec![date(1990, 1, 1), date(1990, 12, 31)];
        assert_eq!(
            count_age(birthdays, date(2024, 6, 15)),
            Ok(AgeCount::Many(vec![34, 33]))
        );
    }

    #[test]
    fn broadcast_one_birthday_over_references() {
        let references = vec![date(2020, 1, 1), date(2020, 6, 15), date(2020, 12, 31)];
        assert_eq!(
            count_age(date(1990, 6, 15), references),
            Ok(AgeCount::Many(vec![29, 30, 30]))
        );
    }

    #[test]
    fn pairwise_sequences() {
        let birthdays = vec![date(1990, 1, 1), date(2000, 7, 1)];
        let references = vec![date(2020, 1, 1), date(2020, 6, 30)];
        assert_eq!(
            count_age(birthdays, references),
            Ok(AgeCount::Many(vec![30, 19]))
        );
    }

    #[test]
    fn mismatched_lengths_error() {
        let birthdays = vec![date(1990, 1, 1), date(2000, 7, 1)];
        let references = vec![date(2020, 1, 1)];
        // A one-element Vec is a sequence, not a scalar.
        assert_eq!(
            count_age(birthdays, references),
            Err(AgeError::LengthMismatch {
                birthdays: 2,
                references: 1
            })
        );
    }

    #[test]
    fn leap_day_birthday_uses_literal_ordinal_comparison() {
        let birthday = date(1992, 2, 29);
        // Non-leap reference year: Feb 28 is before the anniversary,
        // Mar 1 is after it.
        assert_eq!(single_age_count(birthday, date(2023, 2, 28)), 30);
        assert_eq!(single_age_count(birthday, date(2023, 3, 1)), 31);
        // Leap reference year: the anniversary itself counts.
        assert_eq!(single_age_count(birthday, date(2024, 2, 29)), 32);
    }

    #[test]
    fn age_is_non_negative_when_reference_not_before_birthday() {
        let birthday = date(2020, 5, 17);
        for offset in [0i64, 1, 30, 365, 366, 1000] {
            let reference = birthday + chrono::Duration::days(offset);
            assert!(single_age_count(birthday, reference) >= 0);
        }
    }

    #[test]
    fn instants_are_coerced_before_comparison() {
        let birthday: chrono::DateTime<chrono::Utc> =
            "1990-06-15T23:00:00Z".parse().unwrap();
        let set = DateSet::one(birthday);
        assert_eq!(
            count_age(set, date(2024, 6, 15)),
            Ok(AgeCount::One(34))
        );
    }
}
