use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::CandidateApplicationRow;
use crate::models::profile::{AccountDetails, CvDocument, ProfileRow};
use crate::models::user::{Role, UserRow};
use crate::state::AppState;
use crate::users::access::require_user;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
}

/// Body of `PUT /api/v1/users/:id`. Names go to the account; the rest is
/// upserted into the profile row alongside the CV.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(flatten)]
    pub account: AccountDetails,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub user: UserRow,
    pub account: Option<AccountDetails>,
    pub profile: Option<CvDocument>,
}

#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub message: String,
    pub user: UserRow,
    pub account: AccountDetails,
}

/// POST /api/v1/users
///
/// Provisions an account. Credentials are owned by the upstream auth gateway.
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    validate_new_user(&req)?;

    let inserted = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, first_name, last_name, role)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.email.trim())
    .bind(req.first_name.trim())
    .bind(req.last_name.trim())
    .bind(req.role.as_str())
    .fetch_one(&state.db)
    .await;

    match inserted {
        Ok(user) => {
            tracing::info!("Created {} account {}", user.role, user.id);
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            format!("Email {} is already registered", req.email.trim()),
        )),
        Err(e) => Err(e.into()),
    }
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserDetailResponse>, AppError> {
    let user = require_user(&state.db, user_id).await?;

    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;

    Ok(Json(UserDetailResponse {
        user,
        account: profile.as_ref().map(|p| p.to_account_details()),
        profile: profile.map(|p| p.to_document()),
    }))
}

/// PUT /api/v1/users/:id
///
/// Updates the account name and the account details on the profile row,
/// creating the row if the user has no CV yet. CV fields are left untouched.
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, AppError> {
    let req = validate_user_update(req)?;
    require_user(&state.db, user_id).await?;

    let mut tx = state.db.begin().await?;

    let user = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET first_name = $1, last_name = $2 WHERE id = $3 RETURNING *",
    )
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    let account = &req.account;
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, phone, address, bio, company_name, job_title, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        ON CONFLICT (user_id) DO UPDATE SET
            phone = EXCLUDED.phone,
            address = EXCLUDED.address,
            bio = EXCLUDED.bio,
            company_name = EXCLUDED.company_name,
            job_title = EXCLUDED.job_title,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&account.phone)
    .bind(&account.address)
    .bind(&account.bio)
    .bind(&account.company_name)
    .bind(&account.job_title)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Updated account details for user {user_id}");
    Ok(Json(UpdateUserResponse {
        message: "Profile updated successfully".to_string(),
        user,
        account: req.account,
    }))
}

/// GET /api/v1/users/:id/applications
pub async fn handle_user_applications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<CandidateApplicationRow>>, AppError> {
    require_user(&state.db, user_id).await?;

    let applications = sqlx::query_as::<_, CandidateApplicationRow>(
        r#"
        SELECT a.*, j.title AS job_title, j.company, j.location, j.salary_range
        FROM applications a
        JOIN jobs j ON a.job_id = j.id
        WHERE a.user_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

fn validate_new_user(req: &CreateUserRequest) -> Result<(), AppError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("email cannot be empty".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation(format!("'{email}' is not an email address")));
    }
    Ok(())
}

/// Trims every field; blank optional fields are stored as NULL.
fn validate_user_update(mut req: UpdateUserRequest) -> Result<UpdateUserRequest, AppError> {
    req.first_name = req.first_name.trim().to_string();
    req.last_name = req.last_name.trim().to_string();
    if req.first_name.is_empty() || req.last_name.is_empty() {
        return Err(AppError::Validation(
            "first_name and last_name cannot be empty".to_string(),
        ));
    }

    let account = &mut req.account;
    account.phone = account.phone.trim().to_string();
    account.address = account.address.trim().to_string();
    account.bio = account.bio.trim().to_string();
    account.company_name = non_blank(account.company_name.take());
    account.job_title = non_blank(account.job_title.take());
    Ok(req)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
