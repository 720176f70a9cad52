use chrono::NaiveDate;

use crate::models::job::ExperienceLevel;
use crate::models::profile::ExperienceInterval;

/// Points available for experience.
pub const EXPERIENCE_CAP: f64 = 40.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// Sums the raw length of every interval in 365-day years.
/// Overlapping and negative intervals are not corrected.
pub fn total_years(experience: &[ExperienceInterval], today: NaiveDate) -> f64 {
    experience
        .iter()
        .map(|interval| interval.days_until(today) as f64 / DAYS_PER_YEAR)
        .sum()
}

/// Maps years of experience to 0–40 points on the level's curve.
pub fn experience_component(level: Option<ExperienceLevel>, years: f64) -> f64 {
    let Some(level) = level else {
        return 0.0;
    };

    let (offset, points_per_year) = match level {
        ExperienceLevel::Entry => (0.0, 10.0),
        ExperienceLevel::Mid => (2.0, 8.0),
        ExperienceLevel::Senior => (5.0, 6.0),
        ExperienceLevel::Lead => (8.0, 5.0),
    };

    ((years - offset) * points_per_year).clamp(0.0, EXPERIENCE_CAP)
}
