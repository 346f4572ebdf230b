use crate::error::PaceError;

pub const MARATHON_MILES: f64 = 26.2188;

struct PaceCategory {
    keywords: &'static [&'static str],
    offset_seconds: (f64, f64),
}

/// Ordered: the first category with a matching keyword wins.
const PACE_CATEGORIES: &[PaceCategory] = &[
    PaceCategory {
        keywords: &["long run", "lr"],
        offset_seconds: (45.0, 90.0),
    },
    PaceCategory {
        keywords: &["medium-long run", "mlr"],
        offset_seconds: (30.0, 75.0),
    },
    PaceCategory {
        keywords: &["general aerobic", "ga"],
        offset_seconds: (45.0, 90.0),
    },
    PaceCategory {
        keywords: &["recovery", "rec"],
        offset_seconds: (90.0, 144.0),
    },
    PaceCategory {
        keywords: &["marathon pace", "mp"],
        offset_seconds: (0.0, 0.0),
    },
    PaceCategory {
        keywords: &["lactate threshold", "tempo", "lt", "hmp"],
        offset_seconds: (-48.0, -24.0),
    },
    PaceCategory {
        keywords: &["vo2max", "vo2 max", "vo2"],
        offset_seconds: (-96.0, -72.0),
    },
    PaceCategory {
        keywords: &["sprints", "strides", "sp"],
        offset_seconds: (-50.0, -35.0),
    },
];

/// Goal marathon pace in seconds per mile from `h:mm:ss` or `m:ss`.
pub fn marathon_pace_seconds(goal_time: &str) -> Result<f64, PaceError> {
    let invalid = || PaceError::InvalidGoalTimeFormat(goal_time.to_string());

    let parts = goal_time
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    let total_seconds = match parts.as_slice() {
        [hours, minutes, seconds] => {
            u64::from(*hours) * 3600 + u64::from(*minutes) * 60 + u64::from(*seconds)
        }
        [minutes, seconds] => u64::from(*minutes) * 60 + u64::from(*seconds),
        _ => return Err(invalid()),
    };
    if total_seconds == 0 {
        return Err(invalid());
    }

    Ok(total_seconds as f64 / MARATHON_MILES)
}

/// Pace window for a workout label relative to goal pace, e.g. `"8:46/mi - 9:31/mi"`.
/// Labels that name no known workout type get `None`.
pub fn suggested_pace_range(activity_label: &str, goal_pace_seconds: f64) -> Option<String> {
    let category = classify(activity_label)?;
    let (lo, hi) = category.offset_seconds;
    Some(format!(
        "{}/mi - {}/mi",
        format_pace(goal_pace_seconds + lo),
        format_pace(goal_pace_seconds + hi)
    ))
}

pub fn format_pace(seconds_per_mile: f64) -> String {
    let total = seconds_per_mile.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Case-insensitive substring match; the first category in table order wins,
/// so "Medium-Long Run" takes the long run range.
fn classify(activity_label: &str) -> Option<&'static PaceCategory> {
    let label = activity_label.to_lowercase();
    PACE_CATEGORIES.iter().find(|category| {
        category
            .keywords
            .iter()
            .any(|keyword| label.contains(*keyword))
    })
}
