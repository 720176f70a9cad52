use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{parse_cv_date, CvDocument, ProfileRow};
use crate::models::user::Role;
use crate::state::AppState;
use crate::users::access::require_user;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SaveCvRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub cv: CvDocument,
}

#[derive(Debug, Serialize)]
pub struct SaveCvResponse {
    pub message: String,
    pub cv: CvDocument,
}

/// GET /api/v1/cv
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CvDocument>, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(params.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV for user {} not found", params.user_id)))?;

    Ok(Json(profile.to_document()))
}

/// PUT /api/v1/cv
///
/// Creates or replaces the user's CV. For candidates, recommendations are
/// refreshed afterwards; a failed refresh does not fail the save.
pub async fn handle_save_cv(
    State(state): State<AppState>,
    Json(req): Json<SaveCvRequest>,
) -> Result<Json<SaveCvResponse>, AppError> {
    let user = require_user(&state.db, req.user_id).await?;
    validate_cv(&req.cv)?;

    let mut cv = req.cv;
    cv.skills = cv.normalized_skills();

    let experience = to_json(&cv.experiences, "experiences")?;
    let education = to_json(&cv.education, "education")?;
    let languages = to_json(&cv.languages, "languages")?;
    let certifications = to_json(&cv.certifications, "certifications")?;

    let info = &cv.personal_info;
    sqlx::query(
        r#"
        INSERT INTO profiles
            (user_id, first_name, last_name, email, phone, address, headline, summary,
             website, linkedin, skills, experience, education, languages, certifications,
             template, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, now())
        ON CONFLICT (user_id) DO UPDATE SET
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            email = EXCLUDED.email,
            phone = EXCLUDED.phone,
            address = EXCLUDED.address,
            headline = EXCLUDED.headline,
            summary = EXCLUDED.summary,
            website = EXCLUDED.website,
            linkedin = EXCLUDED.linkedin,
            skills = EXCLUDED.skills,
            experience = EXCLUDED.experience,
            education = EXCLUDED.education,
            languages = EXCLUDED.languages,
            certifications = EXCLUDED.certifications,
            template = EXCLUDED.template,
            updated_at = now()
        "#,
    )
    .bind(user.id)
    .bind(&info.first_name)
    .bind(&info.last_name)
    .bind(&info.email)
    .bind(&info.phone)
    .bind(&info.address)
    .bind(&info.headline)
    .bind(&info.summary)
    .bind(&info.website)
    .bind(&info.linkedin)
    .bind(&cv.skills)
    .bind(&experience)
    .bind(&education)
    .bind(&languages)
    .bind(&certifications)
    .bind(cv.template.as_str())
    .execute(&state.db)
    .await?;

    tracing::info!("Saved CV for user {}", user.id);

    let message = if user.role() == Some(Role::Candidate) {
        state.recommender.refresh_recommendations(user.id).await;
        "CV saved and recommendations updated"
    } else {
        "CV saved"
    };

    Ok(Json(SaveCvResponse {
        message: message.to_string(),
        cv,
    }))
}

fn to_json<T: Serialize>(value: &T, what: &str) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
}

/// Rejects dates the matcher could not read. Blank dates are allowed so that
/// drafts can be saved; such entries earn no experience credit.
fn validate_cv(cv: &CvDocument) -> Result<(), AppError> {
    for (idx, exp) in cv.experiences.iter().enumerate() {
        let start = exp.start_date.trim();
        if !start.is_empty() && parse_cv_date(start).is_none() {
            return Err(AppError::Validation(format!(
                "experiences[{idx}].start_date must be YYYY-MM-DD, got '{start}'"
            )));
        }
        let end = exp.end_date.trim();
        if !exp.current && !end.is_empty() && parse_cv_date(end).is_none() {
            return Err(AppError::Validation(format!(
                "experiences[{idx}].end_date must be YYYY-MM-DD, got '{end}'"
            )));
        }
    }
    Ok(())
}
