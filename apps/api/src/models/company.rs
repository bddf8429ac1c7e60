use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompanyRow {
    pub company_id: Uuid,
    pub company_name: String,
    pub industry: Option<String>,
    pub job_role: Option<String>,
    pub offer_type: Option<String>,
    pub package_offered: Option<String>,
    pub location: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub min_cgpa: Option<f64>,
    pub min_class10_percent: Option<f64>,
    pub min_class12_percent: Option<f64>,
    pub max_allowed_backlogs: Option<i32>,
    pub department: Vec<String>,
    pub company_image: Option<String>,
}
