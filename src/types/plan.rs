use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// A raw row from the plan CSV. `code` is `None` when the cell was empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanRow {
    pub code: Option<String>,
}

impl PlanRow {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    pub calendar_date: NaiveDate,
    pub raw_code: String,
    pub activity_label: String,
    pub planned_distance: f64,
    pub weekday_abbrev: &'static str,
}

pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "M",
        Weekday::Tue => "Tu",
        Weekday::Wed => "W",
        Weekday::Thu => "Th",
        Weekday::Fri => "F",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}
