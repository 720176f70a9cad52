//! Axum route handlers for recommendations and match previews.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::MatchBreakdown;
use crate::models::recommendation::RecommendedJobRow;
use crate::models::user::Role;
use crate::state::AppState;
use crate::users::access::require_role;

/// Most recommendations returned in one listing.
const RECOMMENDATION_LIST_LIMIT: i64 = 20;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MarkViewedRequest {
    pub user_id: Uuid,
}

/// GET /api/v1/recommendations
///
/// Refreshes the candidate's recommendations, then lists them. The listing is
/// served from storage even if the refresh was aborted.
pub async fn handle_list_recommendations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<RecommendedJobRow>>, AppError> {
    let candidate = require_role(&state.db, params.user_id, Role::Candidate).await?;

    state.recommender.refresh_recommendations(candidate.id).await;

    let recommendations = sqlx::query_as::<_, RecommendedJobRow>(
        r#"
        SELECT jr.*, j.title, j.company, j.location, j.salary_range, j.employment_type,
               j.description, j.required_skills, j.experience_level
        FROM job_recommendations jr
        JOIN jobs j ON jr.job_id = j.id
        WHERE jr.user_id = $1 AND j.status = 'active'
        ORDER BY jr.match_score DESC, jr.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(candidate.id)
    .bind(RECOMMENDATION_LIST_LIMIT)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(recommendations))
}

/// PUT /api/v1/recommendations/:job_id/view
pub async fn handle_mark_viewed(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<MarkViewedRequest>,
) -> Result<StatusCode, AppError> {
    let candidate = require_role(&state.db, req.user_id, Role::Candidate).await?;

    let result = sqlx::query(
        "UPDATE job_recommendations SET is_viewed = TRUE WHERE job_id = $1 AND user_id = $2",
    )
    .bind(job_id)
    .bind(candidate.id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "No recommendation for job {job_id}"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/:id/match
///
/// How well the candidate's current CV fits a job, component by component.
/// A candidate without a CV scores 0; an unknown job is 404.
pub async fn handle_job_match(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<MatchBreakdown>, AppError> {
    let candidate = require_role(&state.db, params.user_id, Role::Candidate).await?;

    let breakdown = state
        .recommender
        .preview_match_at(candidate.id, job_id, Utc::now().date_naive())
        .await?;

    Ok(Json(breakdown))
}
