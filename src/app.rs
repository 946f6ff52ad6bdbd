use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/overview", get(handlers::get_overview))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/export", get(handlers::export_state))
        .route("/api/habits", post(handlers::add_habit))
        .route("/api/habits/complete", post(handlers::complete_habit))
        .route("/api/habits/delete", post(handlers::delete_habit))
        .route("/api/tasks", post(handlers::add_task))
        .route("/api/tasks/complete", post(handlers::complete_task))
        .route("/api/focus/complete", post(handlers::complete_focus))
        .route("/api/developer/toggle", post(handlers::toggle_developer))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
