use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::CompanyRow;

const COMPANY_COLUMNS: &str = "company_id, company_name, industry, job_role, offer_type, \
     package_offered, location, application_deadline, min_cgpa, min_class10_percent, \
     min_class12_percent, max_allowed_backlogs, department, company_image";

/// All companies, soonest deadline first (companies without a deadline last).
pub async fn list_companies(pool: &PgPool) -> Result<Vec<CompanyRow>, sqlx::Error> {
    sqlx::query_as::<_, CompanyRow>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM public.companies \
         ORDER BY application_deadline ASC NULLS LAST, company_name ASC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_company(pool: &PgPool, company_id: Uuid) -> Result<Option<CompanyRow>, sqlx::Error> {
    sqlx::query_as::<_, CompanyRow>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM public.companies WHERE company_id = $1"
    ))
    .bind(company_id)
    .fetch_optional(pool)
    .await
}
