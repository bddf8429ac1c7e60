mod config;
mod db;
mod documents;
mod errors;
mod llm_client;
mod models;
mod placement;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::documents::{PdfTextExtractor, S3DocumentStore};
use crate::llm_client::{LlmClient, LlmSettings};
use crate::resume::field_extractor::ResumeFieldExtractor;
use crate::resume::pipeline::ResumePipeline;
use crate::resume::quality::ResumeQualityScorer;
use crate::resume::repository::PgResumeRepository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let documents = Arc::new(S3DocumentStore::new(s3, config.s3_bucket.clone()));
    info!("S3 document store initialized (bucket: {})", config.s3_bucket);

    // Initialize completion client
    let llm = Arc::new(LlmClient::new(LlmSettings {
        base_url: config.llm_base_url.clone(),
        api_key: config.llm_api_key.clone(),
        model: config.llm_model.clone(),
        timeout: config.llm_timeout,
    })?);
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm.model(),
        config.llm_timeout.as_secs()
    );

    let text_extractor = Arc::new(PdfTextExtractor);
    let resumes = Arc::new(PgResumeRepository::new(db.clone()));
    let pipeline = ResumePipeline::new(
        documents.clone(),
        text_extractor.clone(),
        resumes.clone(),
        ResumeFieldExtractor::new(llm.clone()),
        ResumeQualityScorer::new(llm),
        config.max_extraction_attempts,
    );

    // Build app state
    let state = AppState {
        db,
        documents,
        text_extractor,
        resumes,
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "placement-static",
    );

    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
