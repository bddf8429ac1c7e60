use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub application_id: Uuid,
    pub register_no: String,
    pub company_id: Uuid,
    pub ineligible_reasons: Vec<String>,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

/// An application joined with the company it was made to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationListingRow {
    pub application_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub job_role: Option<String>,
    pub status: String,
    pub ineligible_reasons: Vec<String>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StatusCountRow {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecruiterCountRow {
    pub company_id: Uuid,
    pub company_name: String,
    pub selected: i64,
}
