use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::activity::ActivityRecord;
use crate::types::dashboard::ReconciledDay;
use crate::types::plan::PlanEntry;

/// Actual within this fraction of planned counts as a hit.
pub const HIT_TOLERANCE: f64 = 0.20;

/// Miles run per calendar day. Several runs on one day are summed.
pub fn daily_totals(activities: &[ActivityRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for activity in activities {
        *totals.entry(activity.date).or_insert(0.0) += activity.distance_miles;
    }
    totals
}

/// Joins each plan day with what was actually run. Days before `today` get a
/// diff and a hit flag; today and later stay open. Rows come back ordered by
/// distance from today, nearest first, with ties kept in calendar order.
pub fn reconcile(
    entries: &[PlanEntry],
    activities: &[ActivityRecord],
    today: NaiveDate,
) -> Vec<ReconciledDay> {
    let totals = daily_totals(activities);

    let mut days: Vec<ReconciledDay> = entries
        .iter()
        .map(|entry| {
            let actual = totals.get(&entry.calendar_date).copied().unwrap_or(0.0);
            let is_past = entry.calendar_date < today;
            ReconciledDay {
                calendar_date: entry.calendar_date,
                weekday_abbrev: entry.weekday_abbrev,
                raw_code: entry.raw_code.clone(),
                activity_label: entry.activity_label.clone(),
                planned_distance: entry.planned_distance,
                actual_distance: actual,
                diff: is_past.then(|| actual - entry.planned_distance),
                hit: is_past.then(|| is_hit(entry.planned_distance, actual)),
                days_from_today: (entry.calendar_date - today).num_days(),
            }
        })
        .collect();

    // Equal distance: the earlier date first, so yesterday precedes tomorrow.
    days.sort_by_key(|day| (day.days_from_today.abs(), day.calendar_date));
    days
}

pub fn is_hit(planned: f64, actual: f64) -> bool {
    if planned == 0.0 {
        return actual == 0.0;
    }
    // Inclusive at exactly 20%, with slack for float rounding.
    (actual - planned).abs() <= HIT_TOLERANCE * planned + 1e-9
}
