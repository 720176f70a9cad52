use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recommendation about to be written by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecommendation {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub score: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub match_score: i32,
    pub reason: String,
    pub is_viewed: bool,
    pub is_applied: bool,
    pub created_at: DateTime<Utc>,
}

/// Recommendation joined with the job it points at, as listed on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecommendedJobRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub recommendation: RecommendationRow,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub employment_type: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub experience_level: String,
}
