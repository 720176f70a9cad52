//! Axum route handlers for job postings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::skills::normalize_skills;
use crate::models::job::{
    EmploymentType, ExperienceLevel, JobDetailRow, JobListingRow, JobRow, JobStatus,
};
use crate::models::user::Role;
use crate::state::AppState;
use crate::users::access::{require_role, require_user};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Editable fields of a posting.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInput {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub location: String,
    pub salary_range: Option<String>,
    #[serde(default, rename = "type")]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Deserialize)]
pub struct JobWriteRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub job: JobInput,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
///
/// All postings, newest first, with application counts. Recruiters only see
/// their own postings.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobListingRow>>, AppError> {
    let user = require_user(&state.db, params.user_id).await?;
    let owner_filter = (user.role() == Some(Role::Recruiter)).then_some(user.id);

    let jobs = sqlx::query_as::<_, JobListingRow>(
        r#"
        SELECT j.*,
               (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS applications_count
        FROM jobs j
        WHERE $1::uuid IS NULL OR j.user_id = $1
        ORDER BY j.created_at DESC
        "#,
    )
    .bind(owner_filter)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetailRow>, AppError> {
    let job = sqlx::query_as::<_, JobDetailRow>(
        r#"
        SELECT j.*, u.first_name AS recruiter_first_name, u.last_name AS recruiter_last_name
        FROM jobs j
        JOIN users u ON j.user_id = u.id
        WHERE j.id = $1
        "#,
    )
    .bind(job_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<JobWriteRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let recruiter = require_role(&state.db, req.user_id, Role::Recruiter).await?;
    let job = validate_job(req.job)?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (user_id, title, company, description, requirements, location,
             salary_range, employment_type, required_skills, experience_level, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(recruiter.id)
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.location)
    .bind(&job.salary_range)
    .bind(job.employment_type.as_str())
    .bind(&job.required_skills)
    .bind(job.experience_level.as_str())
    .bind(job.status.as_str())
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Recruiter {} posted job {}", recruiter.id, row.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/jobs/:id
///
/// Only the posting recruiter may edit. Existing recommendations keep their score.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<JobWriteRequest>,
) -> Result<Json<JobRow>, AppError> {
    let recruiter = require_role(&state.db, req.user_id, Role::Recruiter).await?;
    let job = validate_job(req.job)?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET
            title = $1, company = $2, description = $3, requirements = $4, location = $5,
            salary_range = $6, employment_type = $7, required_skills = $8,
            experience_level = $9, status = $10, updated_at = now()
        WHERE id = $11 AND user_id = $12
        RETURNING *
        "#,
    )
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.location)
    .bind(&job.salary_range)
    .bind(job.employment_type.as_str())
    .bind(&job.required_skills)
    .bind(job.experience_level.as_str())
    .bind(job.status.as_str())
    .bind(job_id)
    .bind(recruiter.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found or not owned by you")))?;

    Ok(Json(row))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let recruiter = require_role(&state.db, params.user_id, Role::Recruiter).await?;

    let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(recruiter.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Job {job_id} not found or not owned by you"
        )));
    }

    tracing::info!("Recruiter {} deleted job {job_id}", recruiter.id);
    Ok(StatusCode::NO_CONTENT)
}

fn validate_job(mut job: JobInput) -> Result<JobInput, AppError> {
    job.title = job.title.trim().to_string();
    job.company = job.company.trim().to_string();
    if job.title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if job.company.is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }
    job.required_skills = normalize_skills(&job.required_skills);
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> JobInput {
        serde_json::from_value(json!({
            "title": "  Platform Engineer ",
            "company": "Acme",
            "required_skills": ["Rust", " rust", "", "Kubernetes"],
            "experience_level": "senior"
        }))
        .unwrap()
    }

    #[test]
    fn test_job_input_defaults() {
        let job = input();
        assert_eq!(job.employment_type, EmploymentType::FullTime);
        assert_eq!(job.status, JobStatus::Active);
        assert_eq!(job.experience_level, ExperienceLevel::Senior);
        assert!(job.salary_range.is_none());
    }

    #[test]
    fn test_job_input_reads_type_field() {
        let job: JobInput = serde_json::from_value(json!({
            "title": "Intern",
            "company": "Acme",
            "type": "internship",
            "experience_level": "entry",
            "status": "inactive"
        }))
        .unwrap();
        assert_eq!(job.employment_type, EmploymentType::Internship);
        assert_eq!(job.status, JobStatus::Inactive);
    }

    #[test]
    fn test_unknown_experience_level_rejected() {
        let result: Result<JobInput, _> = serde_json::from_value(json!({
            "title": "Engineer",
            "company": "Acme",
            "experience_level": "wizard"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_trims_and_normalizes_skills() {
        let job = validate_job(input()).unwrap();
        assert_eq!(job.title, "Platform Engineer");
        assert_eq!(job.required_skills, vec!["Rust".to_string(), "Kubernetes".to_string()]);
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut job = input();
        job.title = "   ".to_string();
        assert!(matches!(validate_job(job), Err(AppError::Validation(_))));
    }
}
