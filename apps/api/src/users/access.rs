use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Role, UserRow};

/// Loads the acting user or fails with 404.
pub async fn require_user(pool: &PgPool, user_id: Uuid) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// Loads the acting user and checks their role.
pub async fn require_role(pool: &PgPool, user_id: Uuid, role: Role) -> Result<UserRow, AppError> {
    let user = require_user(pool, user_id).await?;
    check_role(&user, role)?;
    Ok(user)
}

fn check_role(user: &UserRow, role: Role) -> Result<(), AppError> {
    if user.role() == Some(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Only {role}s can perform this action")))
    }
}
