use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use regex::{Captures, Regex};

use crate::error::PlanError;
use crate::types::plan::{weekday_abbrev, PlanEntry, PlanRow};

pub const PLAN_COLUMN: &str = "Plan";

/// Plan shorthand and its expansion. Codes only match a whole alphabetic run,
/// so "MP" never fires inside "HMP" and "LR" never fires inside "MLR".
const WORKOUT_CODES: &[(&str, &str)] = &[
    ("HMP", "Half Marathon Pace"),
    ("MLR", "Medium-Long Run"),
    ("Rec", "Recovery"),
    ("GA", "General Aerobic"),
    ("LR", "Long Run"),
    ("LT", "Lactate Threshold"),
    ("MP", "Marathon Pace"),
    ("Sp", "Sprints"),
    ("V", "VO2max"),
];

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number pattern"))
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z]+").expect("valid word pattern"))
}

/// Reads plan rows from CSV with a header row. Only the `Plan` column is used;
/// day and weekday columns are ignored because dates come from the start date.
pub fn read_plan_rows<R: Read>(reader: R) -> Result<Vec<PlanRow>, PlanError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let plan_index = headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(PLAN_COLUMN))
        .ok_or_else(|| PlanError::MissingRequiredColumn {
            column: PLAN_COLUMN,
            available: headers.iter().map(str::to_string).collect(),
        })?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let code = record
            .get(plan_index)
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);
        rows.push(PlanRow { code });
    }

    Ok(rows)
}

/// Lays the plan out on the calendar: the n-th row with a code lands on
/// `start_date + n` days.
pub fn load_plan(rows: &[PlanRow], start_date: Option<NaiveDate>) -> Result<Vec<PlanEntry>, PlanError> {
    let start_date = start_date.ok_or(PlanError::MissingStartDate)?;

    let entries = rows
        .iter()
        .filter_map(|row| row.code.as_deref().map(str::trim))
        .filter(|code| !code.is_empty())
        .enumerate()
        .map_while(|(offset, code)| {
            let calendar_date = start_date.checked_add_days(Days::new(offset as u64))?;
            Some(PlanEntry {
                calendar_date,
                raw_code: code.to_string(),
                activity_label: expand_label(code),
                planned_distance: planned_distance(code),
                weekday_abbrev: weekday_abbrev(calendar_date),
            })
        })
        .collect();

    Ok(entries)
}

pub fn parse_start_date(value: Option<&str>) -> Result<NaiveDate, PlanError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
        .ok_or(PlanError::MissingStartDate)
}

/// First number in the code, in miles. Codes without one (e.g. "Rest") plan 0.
pub fn planned_distance(raw_code: &str) -> f64 {
    number_pattern()
        .find(raw_code)
        .and_then(|found| found.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// "LR16 w/ MP10" -> "Long Run w/ Marathon Pace 10". The planned mileage is
/// dropped since it has its own column.
pub fn expand_label(raw_code: &str) -> String {
    let without_mileage = number_pattern().replace(raw_code, " ");
    let expanded = word_pattern().replace_all(&without_mileage, |caps: &Captures| {
        let word = &caps[0];
        match WORKOUT_CODES
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(word))
        {
            Some((_, name)) => format!(" {} ", name),
            None => word.to_string(),
        }
    });
    expanded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The training plans available to pick from: every `*.csv` in one directory,
/// identified by file stem.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    dir: PathBuf,
}

impl PlanCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn list(&self) -> Result<Vec<String>, PlanError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn contains(&self, plan_id: &str) -> Result<bool, PlanError> {
        Ok(self.list()?.iter().any(|id| id == plan_id))
    }

    /// Picks the requested plan, or the first one listed when none is selected.
    pub fn resolve(&self, plan_id: Option<&str>) -> Result<String, PlanError> {
        match plan_id {
            Some(plan_id) => {
                if self.contains(plan_id)? {
                    Ok(plan_id.to_string())
                } else {
                    Err(PlanError::UnknownPlan(plan_id.to_string()))
                }
            }
            None => self
                .list()?
                .into_iter()
                .next()
                .ok_or_else(|| PlanError::UnknownPlan("(none available)".to_string())),
        }
    }

    pub fn read(&self, plan_id: &str) -> Result<Vec<PlanRow>, PlanError> {
        if !self.contains(plan_id)? {
            return Err(PlanError::UnknownPlan(plan_id.to_string()));
        }
        let file = File::open(self.dir.join(format!("{}.csv", plan_id)))?;
        read_plan_rows(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_codes_by_whole_word() {
        assert_eq!(expand_label("LR8"), "Long Run");
        assert_eq!(expand_label("HMP5"), "Half Marathon Pace");
        assert_eq!(expand_label("MLR11"), "Medium-Long Run");
        assert_eq!(expand_label("LR16 w/ MP10"), "Long Run w/ Marathon Pace 10");
        assert_eq!(expand_label("GA8 w/ 10x100 Sp"), "General Aerobic w/ 10x100 Sprints");
        assert_eq!(expand_label("Rest"), "Rest");
    }

    #[test]
    fn planned_distance_takes_first_number() {
        assert_eq!(planned_distance("LR16 w/ MP10"), 16.0);
        assert_eq!(planned_distance("Rec 4.5"), 4.5);
        assert_eq!(planned_distance("Rest"), 0.0);
    }
}
