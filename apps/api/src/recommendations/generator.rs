//! Recommendation Generation: keeps a candidate's recommendations in step with active postings.
//!
//! Flow: active postings → already-recommended job ids → set difference →
//!       score each remaining job → insert those scoring above the threshold.
//!
//! Runs are incremental: an existing (candidate, job) row is never rescored,
//! updated or deleted. Jobs that score at or below the threshold leave no
//! trace and are evaluated again on the next run.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::{MatchBreakdown, MatchScorer};
use crate::models::recommendation::NewRecommendation;
use crate::recommendations::store::MatchStore;

/// A recommendation is recorded only for scores strictly above this.
pub const RECOMMENDATION_THRESHOLD: u32 = 30;

/// Counts from one refresh run. For logging; the stored rows are the source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub evaluated: usize,
    pub inserted: usize,
    pub below_threshold: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct RecommendationGenerator {
    store: Arc<dyn MatchStore>,
    scorer: Arc<dyn MatchScorer>,
}

impl RecommendationGenerator {
    pub fn new(store: Arc<dyn MatchStore>, scorer: Arc<dyn MatchScorer>) -> Self {
        Self { store, scorer }
    }

    /// Score for stamping an application. Lookup failures are logged and score 0.
    pub async fn compute_match_score(&self, candidate_id: Uuid, job_id: Uuid) -> u32 {
        self.compute_match_score_at(candidate_id, job_id, today())
            .await
    }

    pub async fn compute_match_score_at(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        today: NaiveDate,
    ) -> u32 {
        match self.match_breakdown_at(candidate_id, job_id, today).await {
            Ok(breakdown) => breakdown.score,
            Err(e) => {
                error!("Match score lookup failed for candidate {candidate_id}, job {job_id}: {e}");
                0
            }
        }
    }

    /// Full breakdown. An absent profile or job yields [`MatchBreakdown::unavailable`];
    /// storage errors are returned to the caller.
    pub async fn match_breakdown_at(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        today: NaiveDate,
    ) -> Result<MatchBreakdown, AppError> {
        let Some(profile) = self.store.candidate_profile(candidate_id).await? else {
            debug!("No profile for candidate {candidate_id}; match score is 0");
            return Ok(MatchBreakdown::unavailable());
        };
        let Some(job) = self.store.job_posting(job_id).await? else {
            debug!("Job {job_id} not found; match score is 0");
            return Ok(MatchBreakdown::unavailable());
        };

        Ok(self.scorer.evaluate(&profile, &job, today))
    }

    /// Breakdown for the match-preview route. Unlike [`Self::match_breakdown_at`],
    /// an unknown job is `NotFound`; a candidate without a CV still scores 0.
    pub async fn preview_match_at(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        today: NaiveDate,
    ) -> Result<MatchBreakdown, AppError> {
        let Some(job) = self.store.job_posting(job_id).await? else {
            return Err(AppError::NotFound(format!("Job {job_id} not found")));
        };
        let Some(profile) = self.store.candidate_profile(candidate_id).await? else {
            return Ok(MatchBreakdown::unavailable());
        };

        Ok(self.scorer.evaluate(&profile, &job, today))
    }

    /// Best-effort refresh. Returns `None` when the run was aborted; the cause is
    /// logged and never propagated.
    pub async fn refresh_recommendations(&self, candidate_id: Uuid) -> Option<RefreshSummary> {
        self.refresh_recommendations_at(candidate_id, today()).await
    }

    pub async fn refresh_recommendations_at(
        &self,
        candidate_id: Uuid,
        today: NaiveDate,
    ) -> Option<RefreshSummary> {
        match self.try_refresh(candidate_id, today).await {
            Ok(summary) => {
                info!(
                    "Recommendations refreshed for candidate {candidate_id}: {} evaluated, {} inserted, {} below threshold, {} failed",
                    summary.evaluated, summary.inserted, summary.below_threshold, summary.failed
                );
                Some(summary)
            }
            Err(e) => {
                error!("Recommendation refresh aborted for candidate {candidate_id}: {e}");
                None
            }
        }
    }

    async fn try_refresh(
        &self,
        candidate_id: Uuid,
        today: NaiveDate,
    ) -> Result<RefreshSummary, AppError> {
        // Bulk fetches. Any failure here aborts the run.
        let active_jobs = self.store.active_job_postings().await?;
        let already_recommended = self.store.recommended_job_ids(candidate_id).await?;

        // Only jobs without a row for this candidate are scored.
        let pending: Vec<_> = active_jobs
            .into_iter()
            .filter(|job| !already_recommended.contains(&job.id))
            .collect();

        let mut summary = RefreshSummary::default();
        if pending.is_empty() {
            return Ok(summary);
        }

        // Profile is fetched once and reused for every job.
        let Some(profile) = self.store.candidate_profile(candidate_id).await? else {
            debug!(
                "No profile for candidate {candidate_id}; {} jobs score 0",
                pending.len()
            );
            summary.evaluated = pending.len();
            summary.below_threshold = pending.len();
            return Ok(summary);
        };

        // Each job is independent; one failed insert does not stop the rest.
        for job in &pending {
            summary.evaluated += 1;

            let score = self.scorer.score(&profile, job, today);
            if score <= RECOMMENDATION_THRESHOLD {
                summary.below_threshold += 1;
                continue;
            }

            let rec = NewRecommendation {
                candidate_id,
                job_id: job.id,
                score,
                reason: recommendation_reason(score),
            };

            match self.store.insert_recommendation(&rec).await {
                Ok(true) => summary.inserted += 1,
                Ok(false) => debug!(
                    "Recommendation for candidate {candidate_id}, job {} already exists",
                    job.id
                ),
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        "Failed to insert recommendation for candidate {candidate_id}, job {}: {e}",
                        job.id
                    );
                }
            }
        }

        Ok(summary)
    }
}

pub fn recommendation_reason(score: u32) -> String {
    format!("Match score: {score}%")
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
