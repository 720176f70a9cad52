//! Match Scoring: pluggable, trait-based scorer that rates a candidate against a posting.
//!
//! Default: `HeuristicMatchScorer` (skill overlap worth up to 60 points plus
//! level-adjusted experience worth up to 40).
//!
//! `RecommendationGenerator` holds an `Arc<dyn MatchScorer>`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matching::experience::{experience_component, total_years};
use crate::matching::skills::compute_overlap;
use crate::models::job::{ExperienceLevel, JobPosting};
use crate::models::profile::CandidateProfile;

/// Highest score a pair can reach.
pub const MAX_SCORE: u32 = 100;

/// How a score was reached. `score` is always what [`MatchScorer::score`] returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchBreakdown {
    pub score: u32, // 0 – 100
    pub skills_component: f64,     // 0 – 60
    pub experience_component: f64, // 0 – 40
    pub total_years: f64,
    pub experience_level: Option<ExperienceLevel>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl MatchBreakdown {
    /// Breakdown for a pair where the profile or the job could not be found.
    pub fn unavailable() -> Self {
        Self {
            score: 0,
            skills_component: 0.0,
            experience_component: 0.0,
            total_years: 0.0,
            experience_level: None,
            matched_skills: vec![],
            missing_skills: vec![],
        }
    }
}

/// The match scorer trait. Implementations must be pure: the same profile,
/// job and evaluation date always give the same result.
pub trait MatchScorer: Send + Sync {
    fn evaluate(
        &self,
        profile: &CandidateProfile,
        job: &JobPosting,
        today: NaiveDate,
    ) -> MatchBreakdown;

    fn score(&self, profile: &CandidateProfile, job: &JobPosting, today: NaiveDate) -> u32 {
        self.evaluate(profile, job, today).score
    }
}

/// Skill-overlap plus experience-years heuristic.
pub struct HeuristicMatchScorer;

impl MatchScorer for HeuristicMatchScorer {
    fn evaluate(
        &self,
        profile: &CandidateProfile,
        job: &JobPosting,
        today: NaiveDate,
    ) -> MatchBreakdown {
        compute_match(profile, job, today)
    }
}

fn compute_match(profile: &CandidateProfile, job: &JobPosting, today: NaiveDate) -> MatchBreakdown {
    let overlap = compute_overlap(&profile.skills, &job.required_skills);
    let skills_component = overlap.component();

    let (years, experience_component) = if profile.experience.is_empty() {
        (0.0, 0.0)
    } else {
        let years = total_years(&profile.experience, today);
        (years, experience_component(job.experience_level, years))
    };

    // Both parts are non-negative, so f64::round's half-away-from-zero is unambiguous.
    let score = ((skills_component + experience_component).round() as u32).min(MAX_SCORE);

    MatchBreakdown {
        score,
        skills_component,
        experience_component,
        total_years: years,
        experience_level: job.experience_level,
        matched_skills: overlap.matched,
        missing_skills: overlap.missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ExperienceInterval;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 1)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn make_profile(skills: &[&str], experience: Vec<ExperienceInterval>) -> CandidateProfile {
        CandidateProfile {
            candidate_id: Uuid::new_v4(),
            skills: strings(skills),
            experience,
        }
    }

    fn make_job(required: &[&str], level: Option<ExperienceLevel>) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            required_skills: strings(required),
            experience_level: level,
        }
    }

    fn two_years() -> Vec<ExperienceInterval> {
        vec![ExperienceInterval::closed(date(2021, 1, 1), date(2023, 1, 1))]
    }

    #[test]
    fn test_scenario_partial_skills_entry_level() {
        let profile = make_profile(&["JavaScript", "React"], two_years());
        let job = make_job(&["javascript", "node"], Some(ExperienceLevel::Entry));

        let breakdown = HeuristicMatchScorer.evaluate(&profile, &job, today());
        assert!((breakdown.skills_component - 30.0).abs() < 1e-9);
        assert!((breakdown.experience_component - 20.0).abs() < 1e-9);
        assert_eq!(breakdown.score, 50);
        assert_eq!(breakdown.matched_skills, strings(&["javascript"]));
        assert_eq!(breakdown.missing_skills, strings(&["node"]));
    }

    #[test]
    fn test_scenario_no_required_skills() {
        let profile = make_profile(&["JavaScript", "React"], two_years());
        let job = make_job(&[], Some(ExperienceLevel::Entry));

        let breakdown = HeuristicMatchScorer.evaluate(&profile, &job, today());
        assert_eq!(breakdown.skills_component, 0.0);
        assert_eq!(breakdown.score, 20);
    }

    #[test]
    fn test_scenario_no_experience_lead_full_skills() {
        let profile = make_profile(&["Rust", "Kubernetes"], vec![]);
        let job = make_job(&["rust", "kubernetes"], Some(ExperienceLevel::Lead));

        let breakdown = HeuristicMatchScorer.evaluate(&profile, &job, today());
        assert_eq!(breakdown.experience_component, 0.0);
        assert_eq!(breakdown.total_years, 0.0);
        assert_eq!(breakdown.score, 60);
    }

    #[test]
    fn test_zero_experience_ignores_level() {
        for level in [
            Some(ExperienceLevel::Entry),
            Some(ExperienceLevel::Mid),
            Some(ExperienceLevel::Senior),
            Some(ExperienceLevel::Lead),
            None,
        ] {
            let breakdown =
                HeuristicMatchScorer.evaluate(&make_profile(&[], vec![]), &make_job(&["x"], level), today());
            assert_eq!(breakdown.experience_component, 0.0);
        }
    }

    #[test]
    fn test_unrecognized_level_scores_skills_only() {
        let profile = make_profile(&["Rust"], two_years());
        let job = make_job(&["rust"], None);
        assert_eq!(HeuristicMatchScorer.score(&profile, &job, today()), 60);
    }

    #[test]
    fn test_score_bounded_0_to_100() {
        let lots_of_experience = vec![
            ExperienceInterval::closed(date(1990, 1, 1), date(2020, 1, 1)),
            ExperienceInterval::current(date(2000, 1, 1)),
        ];
        let negative = vec![ExperienceInterval::closed(date(2024, 1, 1), date(2004, 1, 1))];

        for experience in [lots_of_experience, negative, vec![]] {
            for level in [
                Some(ExperienceLevel::Entry),
                Some(ExperienceLevel::Mid),
                Some(ExperienceLevel::Senior),
                Some(ExperienceLevel::Lead),
                None,
            ] {
                let profile = make_profile(&["Rust", "SQL", "C"], experience.clone());
                let job = make_job(&["rust", "sql", "c++", "go"], level);
                let score = HeuristicMatchScorer.score(&profile, &job, today());
                assert!(score <= MAX_SCORE, "score {score} out of range");
            }
        }
    }

    #[test]
    fn test_perfect_match_scores_100() {
        let profile = make_profile(
            &["Rust"],
            vec![ExperienceInterval::closed(date(2010, 1, 1), date(2020, 1, 1))],
        );
        let job = make_job(&["rust"], Some(ExperienceLevel::Entry));
        assert_eq!(HeuristicMatchScorer.score(&profile, &job, today()), 100);
    }

    #[test]
    fn test_adding_matching_skill_never_decreases_score() {
        let job = make_job(&["rust", "postgres", "kafka"], Some(ExperienceLevel::Mid));
        let before = make_profile(&["Rust"], two_years());
        let after = make_profile(&["Rust", "Kafka"], two_years());

        let score_before = HeuristicMatchScorer.score(&before, &job, today());
        let score_after = HeuristicMatchScorer.score(&after, &job, today());
        assert!(score_after >= score_before);
        assert_eq!(score_before, 20);
        assert_eq!(score_after, 40);
    }

    #[test]
    fn test_more_years_never_decreases_score() {
        let job = make_job(&[], Some(ExperienceLevel::Senior));
        let mut previous = 0;
        for end_year in 2016..2035 {
            let profile = make_profile(
                &[],
                vec![ExperienceInterval::closed(date(2010, 1, 1), date(end_year, 1, 1))],
            );
            let score = HeuristicMatchScorer.score(&profile, &job, today());
            assert!(score >= previous, "{score} < {previous} at {end_year}");
            previous = score;
        }
        assert_eq!(previous, 40);
    }

    #[test]
    fn test_current_position_uses_evaluation_date() {
        let profile = make_profile(&[], vec![ExperienceInterval::current(date(2024, 6, 1))]);
        let job = make_job(&[], Some(ExperienceLevel::Entry));
        // 365 days → 1 year → 10 points
        assert_eq!(HeuristicMatchScorer.score(&profile, &job, date(2025, 6, 1)), 10);
        assert_eq!(HeuristicMatchScorer.score(&profile, &job, date(2026, 6, 1)), 20);
    }

    #[test]
    fn test_score_rounds_half_away_from_zero() {
        // 1 of 8 skills → 7.5 points
        let profile = make_profile(&["a"], vec![]);
        let job = make_job(&["a", "b", "c", "d", "e", "f", "g", "h"], Some(ExperienceLevel::Entry));
        let breakdown = HeuristicMatchScorer.evaluate(&profile, &job, today());
        assert!((breakdown.skills_component - 7.5).abs() < 1e-9);
        assert_eq!(breakdown.score, 8);
    }

    #[test]
    fn test_unavailable_breakdown_is_zero() {
        let breakdown = MatchBreakdown::unavailable();
        assert_eq!(breakdown.score, 0);
        assert!(breakdown.matched_skills.is_empty());
    }
}
