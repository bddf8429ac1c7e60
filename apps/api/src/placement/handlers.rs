use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    ApplicationListingRow, ApplicationRow, RecruiterCountRow, StatusCountRow,
};
use crate::models::company::CompanyRow;
use crate::placement::applications::{self, ApplyRequest};
use crate::placement::companies::{get_company, list_companies};
use crate::placement::eligibility::{check_eligibility, EligibilityReport, StudentProfile};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EligibilityQuery {
    pub student_id: String,
    pub department: Option<String>,
    pub backlogs: Option<i32>,
}

/// `?status=Pending,Rejected` narrows the listing to those statuses.
#[derive(Deserialize)]
pub struct ApplicationsQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ApplyResponse {
    pub message: &'static str,
    pub application: ApplicationRow,
}

/// GET /api/v1/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyRow>>, AppError> {
    Ok(Json(list_companies(&state.db).await?))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyRow>, AppError> {
    let company = find_company(&state, id).await?;
    Ok(Json(company))
}

/// GET /api/v1/companies/:id/eligibility
pub async fn handle_check_eligibility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<EligibilityQuery>,
) -> Result<Json<EligibilityReport>, AppError> {
    let company = find_company(&state, id).await?;
    let resume = state
        .resumes
        .fetch(&params.student_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No resume data for student {}", params.student_id))
        })?;

    let profile = StudentProfile::from_resume(&resume, params.backlogs, params.department);
    Ok(Json(check_eligibility(&profile, &company)))
}

/// POST /api/v1/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplyResponse>), AppError> {
    if req.register_no.trim().is_empty() {
        return Err(AppError::Validation("register_no is required".to_string()));
    }
    find_company(&state, req.company_id).await?;

    let application = applications::apply(&state.db, &req)
        .await?
        .ok_or_else(|| AppError::Conflict("Already applied to this company".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            message: "Application submitted",
            application,
        }),
    ))
}

/// GET /api/v1/applications/:register_no
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(register_no): Path<String>,
    Query(params): Query<ApplicationsQuery>,
) -> Result<Json<Vec<ApplicationListingRow>>, AppError> {
    let statuses = applications::parse_status_filter(params.status.as_deref());
    Ok(Json(
        applications::list_applications(&state.db, &register_no, &statuses).await?,
    ))
}

/// GET /api/v1/applications/stats/status
pub async fn handle_status_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCountRow>>, AppError> {
    Ok(Json(applications::status_stats(&state.db).await?))
}

/// GET /api/v1/applications/stats/top-recruiters
pub async fn handle_top_recruiters(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecruiterCountRow>>, AppError> {
    Ok(Json(applications::top_recruiters(&state.db).await?))
}

async fn find_company(state: &AppState, id: Uuid) -> Result<CompanyRow, AppError> {
    get_company(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}
