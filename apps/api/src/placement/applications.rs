use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{
    ApplicationListingRow, ApplicationRow, RecruiterCountRow, StatusCountRow,
};

const TOP_RECRUITER_LIMIT: i64 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyRequest {
    pub register_no: String,
    pub company_id: Uuid,
    #[serde(default)]
    pub ineligible_reasons: Vec<String>,
}

/// Statuses this service writes or queries. Placement staff may set others
/// (`Pending`, `Rejected`) directly in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Applied,
    Ineligible,
    Selected,
}

impl ApplicationStatus {
    /// Status of a fresh application: `Applied` unless there are ineligibility reasons.
    pub fn for_reasons(reasons: &[String]) -> Self {
        if reasons.is_empty() {
            ApplicationStatus::Applied
        } else {
            ApplicationStatus::Ineligible
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Ineligible => "Ineligible",
            ApplicationStatus::Selected => "Selected",
        }
    }
}

/// Records an application. Returns `None` when the student already applied to this company.
pub async fn apply(pool: &PgPool, req: &ApplyRequest) -> Result<Option<ApplicationRow>, sqlx::Error> {
    let status = ApplicationStatus::for_reasons(&req.ineligible_reasons);

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO public.applied
            (application_id, register_no, company_id, ineligible_reasons, status)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (register_no, company_id) DO NOTHING
        RETURNING application_id, register_no, company_id, ineligible_reasons, status, applied_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.register_no)
    .bind(req.company_id)
    .bind(&req.ineligible_reasons)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    if let Some(row) = &row {
        info!(
            "Application {} recorded for {} at company {} ({})",
            row.application_id, row.register_no, row.company_id, row.status
        );
    }
    Ok(row)
}

/// Splits a `status` query value such as `Pending,Rejected`. Blank entries are dropped.
pub fn parse_status_filter(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// A student's applications, newest first. An empty `statuses` slice means every status.
pub async fn list_applications(
    pool: &PgPool,
    register_no: &str,
    statuses: &[String],
) -> Result<Vec<ApplicationListingRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationListingRow>(
        r#"
        SELECT a.application_id, a.company_id, c.company_name, c.job_role,
               a.status, a.ineligible_reasons, a.applied_at
        FROM public.applied a
        JOIN public.companies c ON a.company_id = c.company_id
        WHERE a.register_no = $1
          AND (cardinality($2::text[]) = 0 OR a.status = ANY($2))
        ORDER BY a.applied_at DESC
        "#,
    )
    .bind(register_no)
    .bind(statuses)
    .fetch_all(pool)
    .await
}

pub async fn status_stats(pool: &PgPool) -> Result<Vec<StatusCountRow>, sqlx::Error> {
    sqlx::query_as::<_, StatusCountRow>(
        "SELECT status, COUNT(*) AS count FROM public.applied GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await
}

/// Companies with the most `Selected` applications.
pub async fn top_recruiters(pool: &PgPool) -> Result<Vec<RecruiterCountRow>, sqlx::Error> {
    sqlx::query_as::<_, RecruiterCountRow>(
        r#"
        SELECT c.company_id, c.company_name, COUNT(a.application_id) AS selected
        FROM public.applied a
        JOIN public.companies c ON a.company_id = c.company_id
        WHERE a.status = $1
        GROUP BY c.company_id, c.company_name
        ORDER BY selected DESC, c.company_name ASC
        LIMIT $2
        "#,
    )
    .bind(ApplicationStatus::Selected.as_str())
    .bind(TOP_RECRUITER_LIMIT)
    .fetch_all(pool)
    .await
}
