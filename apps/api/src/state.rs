use sqlx::PgPool;

use crate::config::Config;
use crate::recommendations::generator::RecommendationGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    #[allow(dead_code)]
    pub config: Config,
    /// Scores candidates against postings and keeps recommendations current.
    /// Backed by PgMatchStore + HeuristicMatchScorer in production.
    pub recommender: RecommendationGenerator,
}
