use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Every `weekday` between `start` and `end` inclusive that is not a holiday, ascending.
pub fn eligible_dates(
    start: NaiveDate,
    end: NaiveDate,
    weekday: Weekday,
    holidays: &HashSet<NaiveDate>,
) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| d.weekday() == weekday && !holidays.contains(d))
        .collect()
}
