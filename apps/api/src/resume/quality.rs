//! Resume Quality Scorer: model review plus deterministic education adjustments.
//!
//! Infallible by contract: a failed call or an unparsable review still yields a
//! fully-shaped `QualityAssessment`, tagged `Degraded`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::CompletionModel;
use crate::resume::decode::{bool_value, integer_field, scalar_string};
use crate::resume::json_repair::parse_model_object;
use crate::resume::models::{
    EducationCompleteness, EducationPresence, QualityAssessment, ResumeRecord, SchoolRecord,
    SectionAnalysis, SectionQuality,
};
use crate::resume::outcome::{DegradeReason, Outcome};
use crate::resume::prompts::{QUALITY_PROMPT, QUALITY_SYSTEM};

/// Used when the review parses but carries no usable score.
const DEFAULT_MODEL_SCORE: i64 = 70;
const FALLBACK_SCORE_SCHOOL_MISSING: u32 = 50;
const FALLBACK_SCORE: u32 = 70;

pub struct ResumeQualityScorer {
    llm: Arc<dyn CompletionModel>,
}

impl ResumeQualityScorer {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self { llm }
    }

    pub async fn score(&self, resume_text: &str, record: &ResumeRecord) -> Outcome<QualityAssessment> {
        let presence = record.education_presence();
        info!(
            "Scoring resume quality (class_10={}, class_12={}, cgpa={})",
            presence.class_10, presence.class_12, presence.cgpa
        );

        let prompt = build_quality_prompt(resume_text, record, &presence);
        let system = format!("{QUALITY_SYSTEM} {JSON_ONLY_SYSTEM}");

        let reply = match self.llm.complete(&system, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Quality analysis call failed: {e}");
                return Outcome::Degraded {
                    value: failed_assessment(&presence),
                    reason: DegradeReason::CompletionFailed {
                        detail: e.to_string(),
                    },
                };
            }
        };

        match parse_model_object(&reply) {
            Ok(review) => Outcome::Clean(enhance_review(&review, record, &presence)),
            Err(e) => {
                warn!("Quality analysis reply was unparsable: {e}");
                Outcome::Degraded {
                    value: fallback_assessment(record, &presence),
                    reason: DegradeReason::UnparsableOutput {
                        detail: e.to_string(),
                    },
                }
            }
        }
    }
}

fn build_quality_prompt(resume_text: &str, record: &ResumeRecord, presence: &EducationPresence) -> String {
    QUALITY_PROMPT
        .replace("{class_10_result}", or_not_found(&record.class_10.percentage_or_grade))
        .replace("{class_10_board}", or_not_found(&record.class_10.board))
        .replace("{class_10_status}", status_label(presence.class_10))
        .replace("{class_12_result}", or_not_found(&record.class_12.percentage_or_grade))
        .replace("{class_12_board}", or_not_found(&record.class_12.board))
        .replace("{class_12_status}", status_label(presence.class_12))
        .replace("{cgpa_status}", status_label(presence.cgpa))
        .replace("{cgpa}", or_not_found(&record.cgpa))
        .replace("{resume_text}", resume_text)
}

fn or_not_found(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not found"
    } else {
        value
    }
}

fn status_label(present: bool) -> &'static str {
    if present {
        "PRESENT"
    } else {
        "MISSING"
    }
}

/// Merges the model's review with the deterministic education checks.
pub fn enhance_review(
    review: &Map<String, Value>,
    record: &ResumeRecord,
    presence: &EducationPresence,
) -> QualityAssessment {
    let mut section_analysis = decode_sections(review.get("section_analysis"));
    section_analysis.insert(
        "class_10".to_string(),
        school_section(&record.class_10, presence.class_10, 10),
    );
    section_analysis.insert(
        "class_12".to_string(),
        school_section(&record.class_12, presence.class_12, 12),
    );

    let mut missing_education = Vec::new();
    let mut education_suggestions = Vec::new();
    if !presence.class_10 {
        missing_education.push("Class 10 percentage/grade".to_string());
        education_suggestions
            .push("Add your Class 10 percentage with board name (e.g., CBSE, ICSE)".to_string());
    }
    if !presence.class_12 {
        missing_education.push("Class 12 percentage/grade".to_string());
        education_suggestions
            .push("Add your Class 12 percentage with board name and stream".to_string());
    }
    if !presence.cgpa {
        missing_education.push("College CGPA/GPA".to_string());
        education_suggestions.push("Include your college CGPA or percentage".to_string());
    }

    let penalty = presence.penalty();
    let model_score = integer_field(review, "overall_score").unwrap_or(DEFAULT_MODEL_SCORE);
    let overall_score = model_score.saturating_sub(i64::from(penalty)).clamp(0, 100) as u32;

    let mut missing_elements = string_list(review.get("missing_elements"));
    let mut improvement_suggestions = string_list(review.get("improvement_suggestions"));
    let mut recommendations = string_list(review.get("recommendations"));

    if !missing_education.is_empty() {
        missing_elements.extend(missing_education);
        education_suggestions.append(&mut improvement_suggestions);
        improvement_suggestions = education_suggestions;
        recommendations.insert(
            0,
            "Complete your education section with all academic percentages - this is crucial for ATS systems"
                .to_string(),
        );
    }

    QualityAssessment {
        overall_score,
        strengths: string_list(review.get("strengths")),
        missing_elements,
        improvement_suggestions,
        section_analysis,
        formatting_issues: string_list(review.get("formatting_issues")),
        recommendations,
        education_completeness: EducationCompleteness {
            education_score: Some(100u32.saturating_sub(penalty * 3)),
            ..EducationCompleteness::from_presence(presence)
        },
    }
}

/// Canned assessment for a review that could not be parsed.
pub fn fallback_assessment(record: &ResumeRecord, presence: &EducationPresence) -> QualityAssessment {
    // Only school results lower the canned score; a missing CGPA alone keeps 70.
    let school_missing = !presence.class_10 || !presence.class_12;

    let mut missing_elements = Vec::new();
    let mut improvement_suggestions = Vec::new();
    if !presence.class_10 {
        missing_elements.push("Class 10 percentage/grade".to_string());
        improvement_suggestions.push("Add Class 10 percentage with board name".to_string());
    }
    if !presence.class_12 {
        missing_elements.push("Class 12 percentage/grade".to_string());
        improvement_suggestions.push("Add Class 12 percentage with board name".to_string());
    }
    if !presence.cgpa {
        missing_elements.push("College CGPA".to_string());
        improvement_suggestions.push("Include college CGPA or percentage".to_string());
    }
    improvement_suggestions.push("Ensure resume is in clear, readable format".to_string());

    let mut section_analysis = BTreeMap::new();
    section_analysis.insert(
        "class_10".to_string(),
        fallback_school_section(&record.class_10, presence.class_10, 10),
    );
    section_analysis.insert(
        "class_12".to_string(),
        fallback_school_section(&record.class_12, presence.class_12, 12),
    );

    let mut recommendations = Vec::new();
    if school_missing {
        recommendations.push("Complete education section with all academic percentages".to_string());
    }
    recommendations.push("Education details are crucial for ATS systems and recruiters".to_string());

    QualityAssessment {
        overall_score: if school_missing {
            FALLBACK_SCORE_SCHOOL_MISSING
        } else {
            FALLBACK_SCORE
        },
        strengths: vec!["Resume uploaded successfully".to_string()],
        missing_elements,
        improvement_suggestions,
        section_analysis,
        formatting_issues: Vec::new(),
        recommendations,
        education_completeness: EducationCompleteness::from_presence(presence),
    }
}

/// Zero-score assessment for a completion call that never returned.
pub fn failed_assessment(presence: &EducationPresence) -> QualityAssessment {
    QualityAssessment {
        overall_score: 0,
        strengths: Vec::new(),
        missing_elements: vec!["Analysis failed".to_string()],
        improvement_suggestions: vec!["Please try again".to_string()],
        section_analysis: BTreeMap::new(),
        formatting_issues: Vec::new(),
        recommendations: vec!["Check your internet connection and try again".to_string()],
        education_completeness: EducationCompleteness::from_presence(presence),
    }
}

fn school_section(school: &SchoolRecord, present: bool, class: u8) -> SectionAnalysis {
    if present {
        let feedback = if school.board.trim().is_empty() {
            format!("Class {class} percentage found: {}", school.percentage_or_grade)
        } else {
            format!(
                "Class {class} percentage found: {} ({})",
                school.percentage_or_grade, school.board
            )
        };
        SectionAnalysis {
            present: true,
            quality: SectionQuality::Good,
            feedback,
        }
    } else {
        let consequence = if class == 10 {
            "this is required for most job applications and higher education"
        } else {
            "this is crucial for academic and professional applications"
        };
        SectionAnalysis {
            present: false,
            quality: SectionQuality::Missing,
            feedback: format!("Class {class} percentage is missing - {consequence}"),
        }
    }
}

fn fallback_school_section(school: &SchoolRecord, present: bool, class: u8) -> SectionAnalysis {
    if present {
        SectionAnalysis {
            present: true,
            quality: SectionQuality::Good,
            feedback: format!("Class {class} percentage found: {}", school.percentage_or_grade),
        }
    } else {
        let consequence = if class == 10 {
            "add it to improve your resume score"
        } else {
            "this is important for applications"
        };
        SectionAnalysis {
            present: false,
            quality: SectionQuality::Missing,
            feedback: format!("Class {class} percentage is missing - {consequence}"),
        }
    }
}

/// Keeps only well-formed section entries. Unknown quality labels fall back to
/// `fair` for present sections and `missing` otherwise.
fn decode_sections(value: Option<&Value>) -> BTreeMap<String, SectionAnalysis> {
    let Some(Value::Object(sections)) = value else {
        return BTreeMap::new();
    };

    sections
        .iter()
        .filter_map(|(name, entry)| {
            let entry = entry.as_object()?;
            let quality = entry
                .get("quality")
                .and_then(Value::as_str)
                .and_then(SectionQuality::parse);
            let present = entry
                .get("present")
                .and_then(bool_value)
                .unwrap_or(quality.is_some_and(|q| q != SectionQuality::Missing));
            let quality = quality.unwrap_or(if present {
                SectionQuality::Fair
            } else {
                SectionQuality::Missing
            });
            let feedback = entry
                .get("feedback")
                .and_then(scalar_string)
                .unwrap_or_default();
            Some((
                name.clone(),
                SectionAnalysis {
                    present,
                    quality,
                    feedback,
                },
            ))
        })
        .collect()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
