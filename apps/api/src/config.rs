use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://api.novita.ai/v3/openai";
const DEFAULT_LLM_MODEL: &str = "meta-llama/llama-3.2-1b-instruct";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    /// Upper bound on every completion call, including connection setup.
    pub llm_timeout: Duration,
    pub max_extraction_attempts: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: optional_env("S3_REGION", "us-east-1"),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: optional_env("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_model: optional_env("LLM_MODEL", DEFAULT_LLM_MODEL),
            llm_timeout: Duration::from_secs(
                optional_env("LLM_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_extraction_attempts: optional_env("MAX_EXTRACTION_ATTEMPTS", "3")
                .parse::<u32>()
                .context("MAX_EXTRACTION_ATTEMPTS must be a positive integer")?
                .max(1),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
