use chrono::NaiveDate;
use serde::Serialize;

/// A plan day joined with the miles actually run that day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledDay {
    pub calendar_date: NaiveDate,
    pub weekday_abbrev: &'static str,
    pub raw_code: String,
    pub activity_label: String,
    pub planned_distance: f64,
    pub actual_distance: f64,
    /// Only set for days strictly before today.
    pub diff: Option<f64>,
    /// Only set for days strictly before today.
    pub hit: Option<bool>,
    /// Signed offset from today; negative is in the past.
    pub days_from_today: i64,
}

impl ReconciledDay {
    pub fn is_future(&self) -> bool {
        self.days_from_today > 0
    }

    pub fn planned_display(&self) -> String {
        format_miles(self.planned_distance)
    }

    /// Blank for days not yet run and for zero mileage.
    pub fn actual_display(&self) -> String {
        if self.is_future() || self.actual_distance.abs() < f64::EPSILON {
            return String::new();
        }
        format_miles(self.actual_distance)
    }

    pub fn diff_display(&self) -> String {
        self.diff.map(format_signed_miles).unwrap_or_default()
    }

    pub fn hit_display(&self) -> &'static str {
        match self.hit {
            Some(true) => "✓",
            Some(false) => "✗",
            None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub message: String,
    pub explanation: String,
}

/// One display row of the dashboard table, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRow {
    pub date: String,
    pub weekday: &'static str,
    pub activity: String,
    pub pace: String,
    pub planned: String,
    pub actual: String,
    pub diff: String,
    pub hit: &'static str,
    pub iso_date: NaiveDate,
}

pub fn format_miles(miles: f64) -> String {
    format!("{:.1}", miles)
}

pub fn format_signed_miles(miles: f64) -> String {
    format!("{:+.1}", miles)
}

/// Everything one dashboard render produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub goal_pace: Option<String>,
    pub rows: Vec<DashboardRow>,
    pub recommendation: Recommendation,
    pub warnings: Vec<String>,
}
