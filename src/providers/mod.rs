pub mod google;
pub mod strava;
