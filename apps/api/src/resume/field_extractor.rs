//! Resume Field Extractor: prompts the completion model for a `ResumeRecord`.
//!
//! Malformed model output never fails the call: it yields the all-default record
//! tagged `Degraded`. Only a failed completion call is an error.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CompletionModel, LlmError};
use crate::resume::decode::{
    count_field, nested_string_field, scalar_string, string_field, string_list_field,
};
use crate::resume::json_repair::parse_model_object;
use crate::resume::models::{ExperienceItem, ResumeRecord, SchoolRecord};
use crate::resume::outcome::{DegradeReason, Outcome};
use crate::resume::prompts::{EXTRACTION_PROMPT, EXTRACTION_SYSTEM};

pub struct ResumeFieldExtractor {
    llm: Arc<dyn CompletionModel>,
}

impl ResumeFieldExtractor {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self { llm }
    }

    /// One extraction attempt. `attempt` is 1-based and only used for logging.
    pub async fn extract(
        &self,
        resume_text: &str,
        attempt: u32,
    ) -> Result<Outcome<ResumeRecord>, LlmError> {
        info!("Resume field extraction attempt {attempt}");

        let prompt = EXTRACTION_PROMPT.replace("{resume_text}", resume_text);
        let system = format!("{EXTRACTION_SYSTEM} {JSON_ONLY_SYSTEM}");
        let reply = self.llm.complete(&system, &prompt).await?;
        debug!("Extraction reply (attempt {attempt}): {} chars", reply.len());

        let outcome = decode_reply(&reply);
        if let Outcome::Degraded { reason, .. } = &outcome {
            warn!("Extraction attempt {attempt} degraded: {reason:?}");
        }
        Ok(outcome)
    }
}

/// Turns a raw model reply into a fully-shaped record.
pub fn decode_reply(reply: &str) -> Outcome<ResumeRecord> {
    match parse_model_object(reply) {
        Ok(object) => decode_record(&object),
        Err(e) => Outcome::Degraded {
            value: ResumeRecord::default(),
            reason: DegradeReason::UnparsableOutput {
                detail: e.to_string(),
            },
        },
    }
}

fn decode_record(object: &Map<String, Value>) -> Outcome<ResumeRecord> {
    let mut defaulted = Vec::new();

    let record = ResumeRecord {
        programming_languages: string_list_field(object, "programming_languages", &mut defaulted),
        frontend_technologies: string_list_field(object, "frontend_technologies", &mut defaulted),
        backend_technologies: string_list_field(object, "backend_technologies", &mut defaulted),
        databases: string_list_field(object, "databases", &mut defaulted),
        class_10: school_field(object, "class_10", &mut defaulted),
        class_12: school_field(object, "class_12", &mut defaulted),
        cgpa: string_field(object, "cgpa", &mut defaulted),
        experience_summary: experience_field(object, "experience_summary", &mut defaulted),
        total_internships_or_experiences: count_field(
            object,
            "total_internships_or_experiences",
            &mut defaulted,
        ),
    };

    if defaulted.is_empty() {
        Outcome::Clean(record)
    } else {
        Outcome::Degraded {
            value: record,
            reason: DegradeReason::FieldsDefaulted { fields: defaulted },
        }
    }
}

fn school_field(object: &Map<String, Value>, key: &str, defaulted: &mut Vec<String>) -> SchoolRecord {
    match object.get(key) {
        Some(Value::Object(school)) => SchoolRecord {
            board: nested_string_field(school, key, "board", defaulted),
            percentage_or_grade: nested_string_field(school, key, "percentage_or_grade", defaulted),
            year: nested_string_field(school, key, "year", defaulted),
        },
        // Some models collapse the object into just the result.
        Some(value @ Value::String(_)) | Some(value @ Value::Number(_)) => SchoolRecord {
            percentage_or_grade: scalar_string(value).unwrap_or_default(),
            ..Default::default()
        },
        _ => {
            defaulted.push(key.to_string());
            SchoolRecord::default()
        }
    }
}

fn experience_field(
    object: &Map<String, Value>,
    key: &str,
    defaulted: &mut Vec<String>,
) -> Vec<ExperienceItem> {
    let Some(Value::Array(items)) = object.get(key) else {
        defaulted.push(key.to_string());
        return Vec::new();
    };

    let mut experiences = Vec::with_capacity(items.len());
    let mut skipped = false;
    for item in items {
        match item {
            Value::Object(entry) => experiences.push(ExperienceItem {
                organization: nested_string_field(entry, key, "organization", defaulted),
                role: nested_string_field(entry, key, "role", defaulted),
                duration: nested_string_field(entry, key, "duration", defaulted),
            }),
            _ => skipped = true,
        }
    }
    if skipped {
        defaulted.push(key.to_string());
    }
    experiences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCompletion;
    use serde_json::json;

    const FULL_REPLY: &str = r#"{
        "programming_languages": ["Python", "Rust"],
        "frontend_technologies": ["React"],
        "backend_technologies": ["Axum"],
        "databases": ["PostgreSQL"],
        "class_10": {"board": "CBSE", "percentage_or_grade": "91%", "year": "2017"},
        "class_12": {"board": "CBSE", "percentage_or_grade": "88%", "year": "2019"},
        "cgpa": "8.7",
        "experience_summary": [
            {"organization": "Acme", "role": "Intern", "duration": "May - July 2023"}
        ],
        "total_internships_or_experiences": 1
    }"#;

    #[test]
    fn test_decode_full_reply_is_clean() {
        let outcome = decode_reply(FULL_REPLY);
        assert!(!outcome.is_degraded());
        let record = outcome.into_value();
        assert_eq!(record.programming_languages, vec!["Python", "Rust"]);
        assert_eq!(record.class_10.board, "CBSE");
        assert_eq!(record.class_12.percentage_or_grade, "88%");
        assert_eq!(record.cgpa, "8.7");
        assert_eq!(record.experience_summary[0].organization, "Acme");
        assert_eq!(record.total_internships_or_experiences, 1);
        assert!(record.education_presence().is_complete());
    }

    #[test]
    fn test_fenced_reply_with_missing_class_12() {
        let reply = "```json\n{\"cgpa\":\"8.2\",\"class_10\":{\"percentage_or_grade\":\"90%\",\"board\":\"CBSE\",\"year\":\"2018\"},\"class_12\":{\"percentage_or_grade\":\"\",\"board\":\"\",\"year\":\"\"}}\n```";
        let record = decode_reply(reply).into_value();
        assert_eq!(record.cgpa, "8.2");
        assert_eq!(record.class_10.percentage_or_grade, "90%");
        let presence = record.education_presence();
        assert!(presence.class_10);
        assert!(!presence.class_12);
        assert!(presence.cgpa);
    }

    #[test]
    fn test_prose_reply_yields_default_record() {
        let outcome = decode_reply("Sorry, I cannot read this resume.");
        assert!(matches!(
            outcome,
            Outcome::Degraded {
                reason: DegradeReason::UnparsableOutput { .. },
                ..
            }
        ));
        let record = outcome.into_value();
        assert_eq!(record, ResumeRecord::default());
        assert_eq!(record.cgpa, "");
        assert_eq!(record.total_internships_or_experiences, 0);
    }

    #[test]
    fn test_empty_reply_yields_default_record() {
        assert_eq!(decode_reply("").into_value(), ResumeRecord::default());
    }

    #[test]
    fn test_array_reply_uses_first_element() {
        let reply = json!([{"cgpa": "9.0", "databases": ["Redis"]}]).to_string();
        let record = decode_reply(&reply).into_value();
        assert_eq!(record.cgpa, "9.0");
        assert_eq!(record.databases, vec!["Redis"]);
        assert!(record.programming_languages.is_empty());
    }

    #[test]
    fn test_wrongly_typed_fields_are_reported() {
        let reply = json!({
            "programming_languages": ["C"],
            "frontend_technologies": [],
            "backend_technologies": [],
            "databases": [],
            "class_10": ["not", "an", "object"],
            "class_12": {"board": "ICSE", "percentage_or_grade": 93, "year": 2020},
            "cgpa": 7.9,
            "experience_summary": [{"organization": "X", "role": "Dev", "duration": "1y"}, "bogus"],
            "total_internships_or_experiences": "2"
        })
        .to_string();
        let outcome = decode_reply(&reply);
        let Outcome::Degraded {
            value,
            reason: DegradeReason::FieldsDefaulted { fields },
        } = outcome
        else {
            panic!("expected defaulted fields");
        };
        assert_eq!(fields, vec!["class_10", "experience_summary"]);
        assert_eq!(value.class_10, SchoolRecord::default());
        assert_eq!(value.class_12.percentage_or_grade, "93");
        assert_eq!(value.class_12.year, "2020");
        assert_eq!(value.cgpa, "7.9");
        assert_eq!(value.experience_summary.len(), 1);
        assert_eq!(value.total_internships_or_experiences, 2);
    }

    #[test]
    fn test_trailing_commas_and_surrounding_prose() {
        let reply = "Here is the data:\n{\"cgpa\": \"8.0\", \"databases\": [\"MySQL\",],}\nHope this helps!";
        let record = decode_reply(reply).into_value();
        assert_eq!(record.cgpa, "8.0");
        assert_eq!(record.databases, vec!["MySQL"]);
    }

    #[tokio::test]
    async fn test_extract_is_deterministic_for_identical_input() {
        let llm = Arc::new(ScriptedCompletion::new(vec![
            Ok(FULL_REPLY.to_string()),
            Ok(FULL_REPLY.to_string()),
        ]));
        let extractor = ResumeFieldExtractor::new(llm.clone());

        let first = extractor.extract("resume text", 1).await.unwrap();
        let second = extractor.extract("resume text", 2).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(first.value()).unwrap(),
            serde_json::to_vec(second.value()).unwrap()
        );
        assert_eq!(llm.calls(), 2);
        assert!(llm.prompts()[0].contains("resume text"));
    }

    #[tokio::test]
    async fn test_extract_propagates_completion_errors() {
        let llm = Arc::new(ScriptedCompletion::new(vec![Err(LlmError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })]));
        let extractor = ResumeFieldExtractor::new(llm);
        assert!(extractor.extract("text", 1).await.is_err());
    }
}
