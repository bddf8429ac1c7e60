pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::placement::handlers as placement;
use crate::resume::handlers::{self as resume, MAX_RESUME_BYTES};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Multipart routes carry whole PDFs and get a larger body limit.
    let uploads = Router::new()
        .route("/api/v1/resumes/analyze", post(resume::handle_analyze))
        .route("/api/v1/resumes/upload", post(resume::handle_upload))
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES));

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes", post(resume::handle_upsert))
        .route(
            "/api/v1/resumes/extract-text",
            post(resume::handle_extract_text),
        )
        .route("/api/v1/resumes/:student_id", get(resume::handle_get_resume))
        .merge(uploads)
        // Placement API
        .route("/api/v1/companies", get(placement::handle_list_companies))
        .route("/api/v1/companies/:id", get(placement::handle_get_company))
        .route(
            "/api/v1/companies/:id/eligibility",
            get(placement::handle_check_eligibility),
        )
        .route("/api/v1/applications", post(placement::handle_apply))
        .route(
            "/api/v1/applications/stats/status",
            get(placement::handle_status_stats),
        )
        .route(
            "/api/v1/applications/stats/top-recruiters",
            get(placement::handle_top_recruiters),
        )
        .route(
            "/api/v1/applications/:register_no",
            get(placement::handle_list_applications),
        )
        .with_state(state)
}
