use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::models::resume::ResumeRow;
use crate::resume::models::ResumeRecord;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Column values written for one student. Technologies are flattened into a
/// single list (frontend, then backend, then databases).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeUpsert {
    #[serde(alias = "studentid")]
    pub student_id: String,
    #[serde(default)]
    pub programminglang: Vec<String>,
    #[serde(default)]
    pub technologiesknown: Vec<String>,
    #[serde(default)]
    pub class10percentage: String,
    #[serde(default)]
    pub class12percentage: String,
    #[serde(default)]
    pub cgpa: String,
    #[serde(default)]
    pub totalexperiences: i32,
}

impl ResumeUpsert {
    pub fn from_record(student_id: &str, record: &ResumeRecord) -> Self {
        Self {
            student_id: student_id.to_string(),
            programminglang: record.programming_languages.clone(),
            technologiesknown: record.combined_technologies(),
            class10percentage: record.class_10.percentage_or_grade.clone(),
            class12percentage: record.class_12.percentage_or_grade.clone(),
            cgpa: record.cgpa.clone(),
            totalexperiences: i32::try_from(record.total_internships_or_experiences)
                .unwrap_or(i32::MAX),
        }
    }
}

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Inserts or replaces the row for `upsert.student_id`. Returns rows affected.
    async fn upsert(&self, upsert: &ResumeUpsert) -> Result<u64, PersistenceError>;
    async fn fetch(&self, student_id: &str) -> Result<Option<ResumeRow>, PersistenceError>;
}

#[derive(Clone)]
pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn upsert(&self, upsert: &ResumeUpsert) -> Result<u64, PersistenceError> {
        let result = sqlx::query(
            r#"
            INSERT INTO resumedata.resume
                (studentid, programminglang, technologiesknown,
                 class10percentage, class12percentage, cgpa, totalexperiences)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (studentid) DO UPDATE SET
                programminglang   = EXCLUDED.programminglang,
                technologiesknown = EXCLUDED.technologiesknown,
                class10percentage = EXCLUDED.class10percentage,
                class12percentage = EXCLUDED.class12percentage,
                cgpa              = EXCLUDED.cgpa,
                totalexperiences  = EXCLUDED.totalexperiences,
                updated_at        = NOW()
            "#,
        )
        .bind(&upsert.student_id)
        .bind(&upsert.programminglang)
        .bind(&upsert.technologiesknown)
        .bind(&upsert.class10percentage)
        .bind(&upsert.class12percentage)
        .bind(&upsert.cgpa)
        .bind(upsert.totalexperiences)
        .execute(&self.pool)
        .await?;

        info!("Upserted resume data for student {}", upsert.student_id);
        Ok(result.rows_affected())
    }

    async fn fetch(&self, student_id: &str) -> Result<Option<ResumeRow>, PersistenceError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT studentid, programminglang, technologiesknown,
                   class10percentage, class12percentage, cgpa, totalexperiences, updated_at
            FROM resumedata.resume
            WHERE studentid = $1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::complete_record;

    #[test]
    fn test_upsert_flattens_technologies_in_order() {
        let record = complete_record();
        let upsert = ResumeUpsert::from_record("21CS1042", &record);
        assert_eq!(upsert.student_id, "21CS1042");
        assert_eq!(upsert.programminglang, vec!["Python", "Rust"]);
        assert_eq!(
            upsert.technologiesknown,
            vec!["React", "Axum", "PostgreSQL", "Redis"]
        );
        assert_eq!(upsert.class10percentage, "92%");
        assert_eq!(upsert.class12percentage, "88%");
        assert_eq!(upsert.cgpa, "8.4");
        assert_eq!(upsert.totalexperiences, 1);
    }

    #[test]
    fn test_upsert_request_accepts_column_names() {
        let upsert: ResumeUpsert = serde_json::from_value(serde_json::json!({
            "studentid": "21CS1042",
            "programminglang": ["Go"],
            "cgpa": "8.1"
        }))
        .unwrap();
        assert_eq!(upsert.student_id, "21CS1042");
        assert_eq!(upsert.programminglang, vec!["Go"]);
        assert!(upsert.technologiesknown.is_empty());
        assert_eq!(upsert.totalexperiences, 0);
    }

    #[test]
    fn test_upsert_of_default_record_is_empty() {
        let upsert = ResumeUpsert::from_record("s1", &ResumeRecord::default());
        assert!(upsert.programminglang.is_empty());
        assert!(upsert.technologiesknown.is_empty());
        assert_eq!(upsert.cgpa, "");
        assert_eq!(upsert.totalexperiences, 0);
    }
}
