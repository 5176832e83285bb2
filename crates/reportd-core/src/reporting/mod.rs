//! Shared report helpers.
//!
//! Pure date utilities consumed by report generators: age arithmetic with
//! scalar/sequence broadcasting, instant-to-date coercion, and period
//! rendering for artifact file names.

pub mod age;
pub mod dates;

pub use age::{count_age, single_age_count, AgeCount, AgeError, DateSet};
pub use dates::{
    end_exclusive, generate_date, parse_date, render_display_period, ToReportDate,
};
