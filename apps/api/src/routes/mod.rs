pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::cv::handlers as cv;
use crate::jobs::{applications, handlers as jobs, saved};
use crate::recommendations::handlers as recommendations;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users", post(users::handle_create_user))
        .route(
            "/api/v1/users/:id",
            get(users::handle_get_user).put(users::handle_update_user),
        )
        .route(
            "/api/v1/users/:id/applications",
            get(users::handle_user_applications),
        )
        // CV
        .route("/api/v1/cv", get(cv::handle_get_cv).put(cv::handle_save_cv))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/match", get(recommendations::handle_job_match))
        // Applications
        .route("/api/v1/jobs/:id/apply", post(applications::handle_apply))
        .route(
            "/api/v1/jobs/:id/applications",
            get(applications::handle_job_applications),
        )
        .route(
            "/api/v1/applications/:id",
            put(applications::handle_update_application),
        )
        .route(
            "/api/v1/recruiter/applications",
            get(applications::handle_recruiter_applications),
        )
        // Saved jobs
        .route(
            "/api/v1/jobs/:id/save",
            get(saved::handle_is_saved)
                .post(saved::handle_save_job)
                .delete(saved::handle_unsave_job),
        )
        .route("/api/v1/saved-jobs", get(saved::handle_list_saved))
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_list_recommendations),
        )
        .route(
            "/api/v1/recommendations/:job_id/view",
            put(recommendations::handle_mark_viewed),
        )
        .with_state(state)
}
