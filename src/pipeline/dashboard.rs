use chrono::NaiveDate;

use crate::pipeline::pace::{format_pace, marathon_pace_seconds, suggested_pace_range};
use crate::pipeline::reconcile::reconcile;
use crate::pipeline::recommend::recommend;
use crate::types::activity::ActivityRecord;
use crate::types::dashboard::{Dashboard, DashboardRow};
use crate::types::plan::PlanEntry;

/// Runs reconcile and recommend over an already loaded plan and shapes the
/// result for display. A bad goal time only blanks the pace column.
pub fn build_dashboard(
    entries: &[PlanEntry],
    activities: &[ActivityRecord],
    today: NaiveDate,
    goal_time: Option<&str>,
) -> Dashboard {
    let mut warnings = Vec::new();

    let goal_pace = match goal_time.map(str::trim).filter(|goal| !goal.is_empty()) {
        Some(goal) => match marathon_pace_seconds(goal) {
            Ok(pace) => Some(pace),
            Err(err) => {
                tracing::warn!(goal_time = %goal, error = %err, "Ignoring goal time");
                warnings.push(err.to_string());
                None
            }
        },
        None => None,
    };

    let rows = reconcile(entries, activities, today)
        .into_iter()
        .map(|day| DashboardRow {
            date: day.calendar_date.format("%m/%d").to_string(),
            weekday: day.weekday_abbrev,
            pace: goal_pace
                .and_then(|pace| suggested_pace_range(&day.activity_label, pace))
                .unwrap_or_default(),
            planned: day.planned_display(),
            actual: day.actual_display(),
            diff: day.diff_display(),
            hit: day.hit_display(),
            iso_date: day.calendar_date,
            activity: day.activity_label,
        })
        .collect();

    Dashboard {
        today,
        goal_pace: goal_pace.map(|pace| format!("{}/mi", format_pace(pace))),
        rows,
        recommendation: recommend(entries, activities, today),
        warnings,
    }
}
