use chrono::{Datelike, Months, NaiveDate};

use crate::model::DateRange;

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        // December of the last representable year
        None => 31,
    }
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .with_day(days_in_month(first))
        .unwrap_or(first)
}

/// Inclusive range covering the whole month containing `date`
pub fn month_range(date: NaiveDate) -> DateRange {
    DateRange::new(first_of_month(date), last_of_month(date))
}

/// First day of the month `delta` months away from `date`'s month
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let first = first_of_month(date);
    let shifted = if delta >= 0 {
        first.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}

/// Orderable `(year, month)` pair
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// `January 2024`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
