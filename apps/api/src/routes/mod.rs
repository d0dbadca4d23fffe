pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::documents::{self, UPLOAD_BODY_LIMIT};
use crate::scrape;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis pipeline
        .route("/api/analyze-resume", post(handlers::handle_analyze_resume))
        .route("/api/analyze-job", post(handlers::handle_analyze_job))
        .route("/api/analyze-complete", post(handlers::handle_analyze_complete))
        .route("/api/analyze-stream", post(handlers::handle_analyze_stream))
        // Inputs
        .route(
            "/api/extract-pdf",
            post(documents::handle_extract_pdf).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/scrape", post(scrape::handle_scrape))
        .with_state(state)
}
