//! Candidate bookmarks.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::handlers::UserIdQuery;
use crate::models::job::JobRow;
use crate::models::user::Role;
use crate::state::AppState;
use crate::users::access::require_role;

#[derive(Debug, Deserialize)]
pub struct SaveJobRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SavedStatusResponse {
    pub saved: bool,
}

/// GET /api/v1/jobs/:id/save
pub async fn handle_is_saved(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SavedStatusResponse>, AppError> {
    let candidate = require_role(&state.db, params.user_id, Role::Candidate).await?;

    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM saved_jobs WHERE job_id = $1 AND user_id = $2")
            .bind(job_id)
            .bind(candidate.id)
            .fetch_optional(&state.db)
            .await?;

    Ok(Json(SavedStatusResponse {
        saved: existing.is_some(),
    }))
}

/// POST /api/v1/jobs/:id/save
pub async fn handle_save_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<SaveJobRequest>,
) -> Result<StatusCode, AppError> {
    let candidate = require_role(&state.db, req.user_id, Role::Candidate).await?;

    let job_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;
    if job_exists.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO saved_jobs (user_id, job_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, job_id) DO NOTHING
        "#,
    )
    .bind(candidate.id)
    .bind(job_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Validation("Job already saved".to_string()));
    }
    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/jobs/:id/save
pub async fn handle_unsave_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let candidate = require_role(&state.db, params.user_id, Role::Candidate).await?;

    let result = sqlx::query("DELETE FROM saved_jobs WHERE job_id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(candidate.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job not saved".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/saved-jobs
pub async fn handle_list_saved(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let candidate = require_role(&state.db, params.user_id, Role::Candidate).await?;

    let jobs = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT j.*
        FROM saved_jobs s
        JOIN jobs j ON s.job_id = j.id
        WHERE s.user_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(candidate.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}
