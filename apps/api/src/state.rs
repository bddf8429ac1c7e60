use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::documents::{DocumentStore, TextExtractor};
use crate::resume::pipeline::ResumePipeline;
use crate::resume::repository::ResumeRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume PDFs, keyed `{student_id}.pdf`.
    pub documents: Arc<dyn DocumentStore>,
    pub text_extractor: Arc<dyn TextExtractor>,
    pub resumes: Arc<dyn ResumeRepository>,
    pub pipeline: Arc<ResumePipeline>,
    pub config: Config,
}
