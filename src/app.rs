use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route("/api/calendar", get(handlers::get_calendar))
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route("/api/entries/:id", delete(handlers::delete_entry))
        .with_state(state)
}
