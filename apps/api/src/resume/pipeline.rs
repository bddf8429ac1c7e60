//! Resume pipeline orchestration.
//!
//! validate → upload → extract text → extract fields (bounded retry) → persist → score.
//!
//! Upload, text extraction, field extraction and persistence are fatal on error.
//! Scoring never aborts: its failures come back as a degraded assessment.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::documents::{resume_object_key, DocumentStore, TextExtractor};
use crate::resume::field_extractor::ResumeFieldExtractor;
use crate::resume::models::{QualityAssessment, ResumeRecord};
use crate::resume::outcome::{DegradeReason, Outcome, OutcomeStatus};
use crate::resume::quality::ResumeQualityScorer;
use crate::resume::repository::{PersistenceError, ResumeRepository, ResumeUpsert};
use crate::resume::retry::retry_until;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A resume file as received from the client.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Uploading,
    ExtractingText,
    ExtractingFields,
    Persisting,
    Scoring,
    Completed,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Uploading => "uploading",
            PipelineStage::ExtractingText => "extracting_text",
            PipelineStage::ExtractingFields => "extracting_fields",
            PipelineStage::Persisting => "persisting",
            PipelineStage::Scoring => "scoring",
            PipelineStage::Completed => "completed",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error("{stage} failed: {message}")]
    Transport {
        stage: PipelineStage,
        message: String,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Everything the caller needs to show for one processed resume.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub student_id: String,
    pub object_key: String,
    pub record: ResumeRecord,
    pub assessment: QualityAssessment,
    pub persisted: bool,
    pub extraction_attempts: u32,
    pub extraction_status: OutcomeStatus,
    pub assessment_status: OutcomeStatus,
    pub extracted_text_chars: usize,
}

pub struct ResumePipeline {
    documents: Arc<dyn DocumentStore>,
    text_extractor: Arc<dyn TextExtractor>,
    repository: Arc<dyn ResumeRepository>,
    field_extractor: ResumeFieldExtractor,
    scorer: ResumeQualityScorer,
    max_attempts: u32,
}

impl ResumePipeline {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        text_extractor: Arc<dyn TextExtractor>,
        repository: Arc<dyn ResumeRepository>,
        field_extractor: ResumeFieldExtractor,
        scorer: ResumeQualityScorer,
        max_attempts: u32,
    ) -> Self {
        Self {
            documents,
            text_extractor,
            repository,
            field_extractor,
            scorer,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn process(
        &self,
        upload: ResumeUpload,
        student_id: &str,
    ) -> Result<PipelineReport, PipelineError> {
        let mut tracker = StageTracker::new(student_id);
        let result = self.run(upload, student_id, &mut tracker).await;
        match &result {
            Ok(_) => tracker.enter(PipelineStage::Completed),
            Err(e) => {
                error!("Resume pipeline for {student_id} failed in stage {}: {e}", tracker.current);
                tracker.enter(PipelineStage::Failed);
            }
        }
        result
    }

    async fn run(
        &self,
        upload: ResumeUpload,
        student_id: &str,
        tracker: &mut StageTracker<'_>,
    ) -> Result<PipelineReport, PipelineError> {
        validate_student_id(student_id)?;
        if upload.bytes.is_empty() {
            return Err(PipelineError::Validation("resume file is empty".to_string()));
        }

        // 1. Upload
        tracker.enter(PipelineStage::Uploading);
        let object_key = resume_object_key(student_id);
        let content_type = upload
            .content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(PDF_CONTENT_TYPE);
        self.documents
            .put(&object_key, upload.bytes, content_type)
            .await
            .map_err(|e| transport(PipelineStage::Uploading, e))?;

        // 2. Text, read back from the store so the stored object is what gets analysed
        tracker.enter(PipelineStage::ExtractingText);
        let stored = self
            .documents
            .get(&object_key)
            .await
            .map_err(|e| transport(PipelineStage::ExtractingText, e))?;
        let text = self
            .text_extractor
            .extract_text(stored)
            .await
            .map_err(|e| transport(PipelineStage::ExtractingText, e))?;
        if text.trim().is_empty() {
            warn!("No text extracted for {student_id}, continuing with empty text");
        }

        // 3. Fields
        tracker.enter(PipelineStage::ExtractingFields);
        let extraction = retry_until(
            self.max_attempts,
            |attempt| self.field_extractor.extract(&text, attempt),
            |outcome: &Outcome<ResumeRecord>| outcome.value().education_presence().is_complete(),
        )
        .await
        .map_err(|e| transport(PipelineStage::ExtractingFields, e))?;
        if !extraction.satisfied {
            warn!(
                "Education fields still incomplete for {student_id} after {} attempts (degraded: {})",
                extraction.attempts,
                extraction.value.is_degraded()
            );
        }
        let extraction_status = extraction.value.status();
        let record = extraction.value.into_value();

        // 4. Persist
        tracker.enter(PipelineStage::Persisting);
        let upsert = ResumeUpsert::from_record(student_id, &record);
        let rows = self.repository.upsert(&upsert).await?;

        // 5. Score
        tracker.enter(PipelineStage::Scoring);
        let assessment = self.scorer.score(&text, &record).await;
        if let Outcome::Degraded {
            reason: DegradeReason::CompletionFailed { detail },
            ..
        } = &assessment
        {
            warn!("Quality scoring for {student_id} fell back: {detail}");
        }
        let assessment_status = assessment.status();

        Ok(PipelineReport {
            student_id: student_id.to_string(),
            object_key,
            record,
            assessment: assessment.into_value(),
            persisted: rows > 0,
            extraction_attempts: extraction.attempts,
            extraction_status,
            assessment_status,
            extracted_text_chars: text.chars().count(),
        })
    }
}

/// Student ids become object keys and primary keys: non-empty, `[A-Za-z0-9_-]` only.
pub fn validate_student_id(student_id: &str) -> Result<(), PipelineError> {
    if student_id.trim().is_empty() {
        return Err(PipelineError::Validation("student_id is required".to_string()));
    }
    if !student_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(PipelineError::Validation(format!(
            "student_id '{student_id}' may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

fn transport(stage: PipelineStage, e: impl fmt::Display) -> PipelineError {
    PipelineError::Transport {
        stage,
        message: e.to_string(),
    }
}

struct StageTracker<'a> {
    student_id: &'a str,
    current: PipelineStage,
}

impl<'a> StageTracker<'a> {
    fn new(student_id: &'a str) -> Self {
        Self {
            student_id,
            current: PipelineStage::Idle,
        }
    }

    fn enter(&mut self, next: PipelineStage) {
        info!(
            "Resume pipeline [{}]: {} -> {next}",
            self.student_id, self.current
        );
        self.current = next;
    }
}
