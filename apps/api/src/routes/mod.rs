pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::career::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Career tasks
        .route("/api/v1/career-twin", post(handlers::handle_career_twin))
        .route("/api/v1/trajectory", post(handlers::handle_trajectory))
        .route(
            "/api/v1/interview/evaluate",
            post(handlers::handle_evaluate_interview),
        )
        .route("/api/v1/jobs/match", post(handlers::handle_match_jobs))
        .route("/api/v1/skills/demand", post(handlers::handle_skill_demand))
        .route("/api/v1/roadmap", post(handlers::handle_roadmap))
        .route("/api/v1/simulation", post(handlers::handle_simulation))
        // Stored results
        .route(
            "/api/v1/results/:user_id/:kind",
            get(handlers::handle_latest_result),
        )
        .route(
            "/api/v1/results/:user_id/:kind/history",
            get(handlers::handle_result_history),
        )
        .with_state(state)
}
