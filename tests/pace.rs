use marathon_dash::error::PaceError;
use marathon_dash::pipeline::pace::{
    format_pace, marathon_pace_seconds, suggested_pace_range, MARATHON_MILES,
};

fn goal_330() -> f64 {
    marathon_pace_seconds("3:30:00").expect("valid goal")
}

#[test]
fn three_thirty_goal_is_about_480_seconds_per_mile() {
    let pace = goal_330();
    assert!((pace - 12600.0 / MARATHON_MILES).abs() < 1e-9);
    assert!((pace - 480.57).abs() < 0.01);
}

#[test]
fn minutes_and_seconds_form_is_accepted() {
    let pace = marathon_pace_seconds("45:00").expect("valid goal");
    assert!((pace - 2700.0 / MARATHON_MILES).abs() < 1e-9);
}

#[test]
fn pace_is_positive_and_deterministic() {
    for goal in ["2:59:59", "3:30:00", "4:15:30", "59:59", "0:01"] {
        let first = marathon_pace_seconds(goal).expect("valid goal");
        let second = marathon_pace_seconds(goal).expect("valid goal");
        assert!(first > 0.0, "{goal}");
        assert_eq!(first, second);
    }
}

#[test]
fn malformed_goal_times_are_rejected() {
    for goal in ["", "3h30", "1:02:03:04", "210", "3:xx:00", "0:00", "-3:30:00"] {
        let err = marathon_pace_seconds(goal).expect_err(goal);
        assert!(matches!(err, PaceError::InvalidGoalTimeFormat(ref raw) if raw == goal));
    }
}

#[test]
fn long_run_range_is_45_to_90_seconds_slower() {
    assert_eq!(
        suggested_pace_range("Long Run", goal_330()).as_deref(),
        Some("8:46/mi - 9:31/mi")
    );
}

#[test]
fn marathon_pace_range_is_goal_pace() {
    assert_eq!(
        suggested_pace_range("Marathon Pace", goal_330()).as_deref(),
        Some("8:01/mi - 8:01/mi")
    );
}

#[test]
fn medium_long_run_matches_long_run_first() {
    assert_eq!(
        suggested_pace_range("Medium-Long Run", goal_330()).as_deref(),
        Some("8:46/mi - 9:31/mi")
    );
}

#[test]
fn threshold_labels_use_threshold_range() {
    for label in ["Lactate Threshold w/ 4 @ Lactate Threshold", "LT"] {
        assert_eq!(
            suggested_pace_range(label, goal_330()).as_deref(),
            Some("7:13/mi - 7:37/mi"),
            "{label}"
        );
    }
}

#[test]
fn substrings_match_earlier_rows_first() {
    // "mp" sits inside "hmp" and "tempo", and the marathon pace row comes first.
    for label in ["Half Marathon Pace", "HMP", "Tempo"] {
        assert_eq!(
            suggested_pace_range(label, goal_330()).as_deref(),
            Some("8:01/mi - 8:01/mi"),
            "{label}"
        );
    }
    assert_eq!(
        suggested_pace_range("Speed work", goal_330()).as_deref(),
        Some("7:11/mi - 7:26/mi")
    );
}

#[test]
fn other_categories_use_their_offsets() {
    assert_eq!(
        suggested_pace_range("Recovery", goal_330()).as_deref(),
        Some("9:31/mi - 10:25/mi")
    );
    assert_eq!(
        suggested_pace_range("VO2max w/ 5x600 @ 5K", goal_330()).as_deref(),
        Some("6:25/mi - 6:49/mi")
    );
    assert_eq!(
        suggested_pace_range("general aerobic", goal_330()).as_deref(),
        Some("8:46/mi - 9:31/mi")
    );
}

#[test]
fn first_category_in_table_order_wins() {
    assert_eq!(
        suggested_pace_range("Long Run w/ Marathon Pace 10", goal_330()).as_deref(),
        Some("8:46/mi - 9:31/mi")
    );
}

#[test]
fn unknown_labels_have_no_pace() {
    assert_eq!(suggested_pace_range("Rest", goal_330()), None);
    assert_eq!(suggested_pace_range("Marathon", goal_330()), None);
    assert_eq!(suggested_pace_range("Cross-train", goal_330()), None);
    assert_eq!(suggested_pace_range("", goal_330()), None);
}

#[test]
fn pace_formatting_rounds_and_pads_seconds() {
    assert_eq!(format_pace(65.4), "1:05");
    assert_eq!(format_pace(539.6), "9:00");
    assert_eq!(format_pace(-10.0), "0:00");
}
