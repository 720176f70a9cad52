use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::handlers::UserIdQuery;
use crate::models::application::{
    ApplicantRow, ApplicationRow, ApplicationStatus, RecruiterApplicationRow,
};
use crate::models::job::JobStatus;
use crate::models::user::Role;
use crate::state::AppState;
use crate::users::access::require_role;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub id: Uuid,
    pub match_score: u32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub recruiter_notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
}

/// POST /api/v1/jobs/:id/apply
///
/// Stamps the application with the candidate's current match score and flags
/// any recommendation for this job as applied.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    let candidate = require_role(&state.db, req.user_id, Role::Candidate).await?;

    let status: String = sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    ensure_accepting_applications(&status)?;

    let already_applied: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM applications WHERE job_id = $1 AND user_id = $2")
            .bind(job_id)
            .bind(candidate.id)
            .fetch_optional(&state.db)
            .await?;
    if already_applied.is_some() {
        return Err(duplicate_application());
    }

    let match_score = state
        .recommender
        .compute_match_score(candidate.id, job_id)
        .await;

    let inserted: Result<Uuid, sqlx::Error> = sqlx::query_scalar(
        r#"
        INSERT INTO applications (job_id, user_id, cover_letter, match_score)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(job_id)
    .bind(candidate.id)
    .bind(&req.cover_letter)
    .bind(match_score as i32)
    .fetch_one(&state.db)
    .await;

    let application_id = match inserted {
        Ok(id) => id,
        // Lost a race with a concurrent apply for the same pair.
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(duplicate_application())
        }
        Err(e) => return Err(e.into()),
    };

    sqlx::query("UPDATE job_recommendations SET is_applied = TRUE WHERE job_id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(candidate.id)
        .execute(&state.db)
        .await?;

    tracing::info!(
        "Candidate {} applied to job {job_id} with match score {match_score}",
        candidate.id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            id: application_id,
            match_score,
            message: "Application submitted successfully".to_string(),
        }),
    ))
}

/// GET /api/v1/jobs/:id/applications
///
/// Applicants for one of the recruiter's jobs, best match first.
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ApplicantRow>>, AppError> {
    let recruiter = require_role(&state.db, params.user_id, Role::Recruiter).await?;

    let owned: Option<Uuid> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(recruiter.id)
        .fetch_optional(&state.db)
        .await?;
    if owned.is_none() {
        return Err(AppError::NotFound(format!(
            "Job {job_id} not found or not owned by you"
        )));
    }

    let applicants = sqlx::query_as::<_, ApplicantRow>(
        r#"
        SELECT a.*, u.first_name, u.last_name, u.email, p.skills, p.experience, p.education
        FROM applications a
        JOIN users u ON a.user_id = u.id
        LEFT JOIN profiles p ON p.user_id = u.id
        WHERE a.job_id = $1
        ORDER BY a.match_score DESC, a.created_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applicants))
}

/// PUT /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let recruiter = require_role(&state.db, req.user_id, Role::Recruiter).await?;

    let updated = sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications a
        SET status = $1, recruiter_notes = $2, interview_date = $3
        FROM jobs j
        WHERE a.id = $4 AND a.job_id = j.id AND j.user_id = $5
        RETURNING a.*
        "#,
    )
    .bind(req.status.as_str())
    .bind(&req.recruiter_notes)
    .bind(req.interview_date)
    .bind(application_id)
    .bind(recruiter.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    Ok(Json(updated))
}

/// GET /api/v1/recruiter/applications
pub async fn handle_recruiter_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<RecruiterApplicationRow>>, AppError> {
    let recruiter = require_role(&state.db, params.user_id, Role::Recruiter).await?;

    let applications = sqlx::query_as::<_, RecruiterApplicationRow>(
        r#"
        SELECT a.*, j.title
        FROM applications a
        JOIN jobs j ON a.job_id = j.id
        WHERE j.user_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(recruiter.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

fn ensure_accepting_applications(status: &str) -> Result<(), AppError> {
    if status == JobStatus::Active.as_str() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "This job is no longer accepting applications".to_string(),
        ))
    }
}

fn duplicate_application() -> AppError {
    AppError::Validation("You have already applied to this job".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_active_jobs_accept_applications() {
        assert!(ensure_accepting_applications("active").is_ok());
        assert!(ensure_accepting_applications("inactive").is_err());
    }

    #[test]
    fn test_apply_request_cover_letter_optional() {
        let req: ApplyRequest =
            serde_json::from_value(json!({ "user_id": Uuid::new_v4() })).unwrap();
        assert!(req.cover_letter.is_none());
    }

    #[test]
    fn test_update_request_parses_status_and_date() {
        let req: UpdateApplicationRequest = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "status": "interview_scheduled",
            "recruiter_notes": "Strong Rust background",
            "interview_date": "2025-07-01T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(req.status, ApplicationStatus::InterviewScheduled);
        assert!(req.interview_date.is_some());
    }

    #[test]
    fn test_update_request_rejects_unknown_status() {
        let result: Result<UpdateApplicationRequest, _> = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "status": "ghosted"
        }));
        assert!(result.is_err());
    }
}
