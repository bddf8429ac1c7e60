use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted resume summary, one row per student (`resumedata.resume`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub studentid: String,
    pub programminglang: Vec<String>,
    pub technologiesknown: Vec<String>,
    pub class10percentage: String,
    pub class12percentage: String,
    pub cgpa: String,
    pub totalexperiences: i32,
    pub updated_at: DateTime<Utc>,
}
