use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Score deducted when the class 10 result is missing.
pub const CLASS_10_PENALTY: u32 = 8;
/// Score deducted when the class 12 result is missing.
pub const CLASS_12_PENALTY: u32 = 8;
/// Score deducted when the college CGPA is missing.
pub const CGPA_PENALTY: u32 = 6;

/// Board, result and year of a school-leaving examination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub board: String,
    pub percentage_or_grade: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub organization: String,
    pub role: String,
    pub duration: String,
}

/// Canonical structured fields extracted from a resume.
///
/// Always fully shaped: fields the model did not provide are empty, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub programming_languages: Vec<String>,
    pub frontend_technologies: Vec<String>,
    pub backend_technologies: Vec<String>,
    pub databases: Vec<String>,
    pub class_10: SchoolRecord,
    pub class_12: SchoolRecord,
    pub cgpa: String,
    pub experience_summary: Vec<ExperienceItem>,
    pub total_internships_or_experiences: u32,
}

impl ResumeRecord {
    pub fn education_presence(&self) -> EducationPresence {
        EducationPresence {
            class_10: !self.class_10.percentage_or_grade.trim().is_empty(),
            class_12: !self.class_12.percentage_or_grade.trim().is_empty(),
            cgpa: !self.cgpa.trim().is_empty(),
        }
    }

    /// Frontend, backend and database technologies in that order, as one list.
    pub fn combined_technologies(&self) -> Vec<String> {
        self.frontend_technologies
            .iter()
            .chain(&self.backend_technologies)
            .chain(&self.databases)
            .cloned()
            .collect()
    }
}

/// Which of the three required education results a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EducationPresence {
    pub class_10: bool,
    pub class_12: bool,
    pub cgpa: bool,
}

impl EducationPresence {
    pub fn is_complete(&self) -> bool {
        self.class_10 && self.class_12 && self.cgpa
    }

    pub fn penalty(&self) -> u32 {
        let mut penalty = 0;
        if !self.class_10 {
            penalty += CLASS_10_PENALTY;
        }
        if !self.class_12 {
            penalty += CLASS_12_PENALTY;
        }
        if !self.cgpa {
            penalty += CGPA_PENALTY;
        }
        penalty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionQuality {
    Excellent,
    Good,
    Average,
    Fair,
    Poor,
    Missing,
}

impl SectionQuality {
    /// Lenient parse of a model-supplied label. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "average" => Some(Self::Average),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            "missing" => Some(Self::Missing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub present: bool,
    pub quality: SectionQuality,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationCompleteness {
    pub class_10_present: bool,
    pub class_12_present: bool,
    pub cgpa_present: bool,
    pub missing_education_penalty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_score: Option<u32>,
}

impl EducationCompleteness {
    pub fn from_presence(presence: &EducationPresence) -> Self {
        Self {
            class_10_present: presence.class_10,
            class_12_present: presence.class_12,
            cgpa_present: presence.cgpa,
            missing_education_penalty: presence.penalty(),
            education_score: None,
        }
    }
}

/// Structured critique plus a numeric score for one resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// 0 – 100
    pub overall_score: u32,
    pub strengths: Vec<String>,
    pub missing_elements: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub section_analysis: BTreeMap<String, SectionAnalysis>,
    pub formatting_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub education_completeness: EducationCompleteness,
}
