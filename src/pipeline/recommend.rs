use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::pipeline::reconcile::daily_totals;
use crate::types::activity::ActivityRecord;
use crate::types::dashboard::{format_miles, format_signed_miles, Recommendation};
use crate::types::plan::{weekday_abbrev, PlanEntry};

const WINDOW_DAYS: u64 = 7;
const ADJUST_THRESHOLD_MILES: f64 = 1.0;
const ADJUST_MILES: f64 = 1.0;

struct WindowDay {
    date: NaiveDate,
    planned: f64,
    actual: f64,
}

impl WindowDay {
    fn diff(&self) -> f64 {
        self.actual - self.planned
    }
}

/// Suggests today's mileage from how the previous two days went against plan.
/// Days with no plan entry or no runs count as zero.
pub fn recommend(
    entries: &[PlanEntry],
    activities: &[ActivityRecord],
    today: NaiveDate,
) -> Recommendation {
    let planned_by_date: HashMap<NaiveDate, f64> = entries
        .iter()
        .map(|entry| (entry.calendar_date, entry.planned_distance))
        .collect();
    let totals = daily_totals(activities);

    // Most recent first: window[0] is today.
    let window: Vec<WindowDay> = (0..WINDOW_DAYS)
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| WindowDay {
            date,
            planned: planned_by_date.get(&date).copied().unwrap_or(0.0),
            actual: totals.get(&date).copied().unwrap_or(0.0),
        })
        .collect();

    let today_planned = window.first().map(|day| day.planned).unwrap_or(0.0);
    let last_two_diff: f64 = window.iter().skip(1).take(2).map(WindowDay::diff).sum();

    let message = if last_two_diff < -ADJUST_THRESHOLD_MILES {
        format!(
            "You are {} mi behind plan over the last 2 days. Add a mile today: {} → {} mi.",
            format_miles(last_two_diff.abs()),
            format_miles(today_planned),
            format_miles(today_planned + ADJUST_MILES)
        )
    } else if last_two_diff > ADJUST_THRESHOLD_MILES {
        format!(
            "You are {} mi ahead of plan over the last 2 days. Take a mile off today: {} → {} mi.",
            format_miles(last_two_diff),
            format_miles(today_planned),
            format_miles((today_planned - ADJUST_MILES).max(0.0))
        )
    } else {
        format!(
            "You are on track. Stick to today's plan: {} mi.",
            format_miles(today_planned)
        )
    };

    let explanation = window
        .iter()
        .map(|day| {
            format!(
                "{} ({}): planned {}, actual {}, diff {}",
                day.date.format("%Y-%m-%d"),
                weekday_abbrev(day.date),
                format_miles(day.planned),
                format_miles(day.actual),
                format_signed_miles(day.diff())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Recommendation {
        message,
        explanation,
    }
}
