use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const METERS_PER_MILE: f64 = 1609.34;

/// One completed run, reduced to what the plan comparison needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub distance_miles: f64,
}

impl ActivityRecord {
    pub fn from_meters(date: NaiveDate, distance_m: f64) -> Self {
        Self {
            date,
            distance_miles: meters_to_miles(distance_m),
        }
    }
}

pub fn meters_to_miles(distance_m: f64) -> f64 {
    distance_m.max(0.0) / METERS_PER_MILE
}
