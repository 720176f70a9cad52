use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobMatchRow, JobPosting};
use crate::models::profile::{CandidateProfile, ProfileRow};
use crate::models::recommendation::NewRecommendation;

/// Storage the matcher reads from and the generator writes to.
///
/// Carried in `RecommendationGenerator` as `Arc<dyn MatchStore>`, so tests can
/// substitute an in-memory store.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn active_job_postings(&self) -> Result<Vec<JobPosting>, AppError>;

    async fn job_posting(&self, job_id: Uuid) -> Result<Option<JobPosting>, AppError>;

    async fn candidate_profile(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<CandidateProfile>, AppError>;

    /// Jobs that already have a recommendation row for this candidate,
    /// whatever its score or flags.
    async fn recommended_job_ids(&self, candidate_id: Uuid) -> Result<HashSet<Uuid>, AppError>;

    /// Returns `false` when the (candidate, job) pair already existed.
    async fn insert_recommendation(&self, rec: &NewRecommendation) -> Result<bool, AppError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn active_job_postings(&self) -> Result<Vec<JobPosting>, AppError> {
        let rows = sqlx::query_as::<_, JobMatchRow>(
            "SELECT id, required_skills, experience_level FROM jobs WHERE status = 'active'",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn job_posting(&self, job_id: Uuid) -> Result<Option<JobPosting>, AppError> {
        let row = sqlx::query_as::<_, JobMatchRow>(
            "SELECT id, required_skills, experience_level FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(JobPosting::from))
    }

    async fn candidate_profile(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<CandidateProfile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.to_candidate_profile()))
    }

    async fn recommended_job_ids(&self, candidate_id: Uuid) -> Result<HashSet<Uuid>, AppError> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT job_id FROM job_recommendations WHERE user_id = $1")
                .bind(candidate_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids.into_iter().collect())
    }

    async fn insert_recommendation(&self, rec: &NewRecommendation) -> Result<bool, AppError> {
        // The UNIQUE (user_id, job_id) constraint settles concurrent refreshes.
        let result = sqlx::query(
            r#"
            INSERT INTO job_recommendations (user_id, job_id, match_score, reason)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, job_id) DO NOTHING
            "#,
        )
        .bind(rec.candidate_id)
        .bind(rec.job_id)
        .bind(rec.score as i32)
        .bind(&rec.reason)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
