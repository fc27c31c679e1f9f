use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, authoring, landing, submission, summary};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::landing_page))
        .route(
            "/create",
            get(authoring::create_form_page).post(authoring::create_form),
        )
        .route(
            "/form/:form_id/submit",
            get(submission::submit_page).post(submission::submit_response),
        )
        .route("/form/:form_id/summary", get(summary::summary_page))
        .route("/form/:form_id/delete", post(landing::delete_form))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
