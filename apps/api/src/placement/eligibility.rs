//! Eligibility of a student for a company's drive.
//!
//! Checks run in a fixed order and each produces at most one reason. A check is
//! skipped when either side of the comparison is unknown or unparsable.

use serde::{Deserialize, Serialize};

use crate::models::company::CompanyRow;
use crate::models::resume::ResumeRow;

/// Academic standing compared against a company's criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub cgpa: Option<String>,
    pub class10_percent: Option<String>,
    pub class12_percent: Option<String>,
    pub backlogs: Option<i32>,
    pub department: Option<String>,
}

impl StudentProfile {
    /// Academic results from the persisted resume; backlogs and department come from the caller.
    pub fn from_resume(row: &ResumeRow, backlogs: Option<i32>, department: Option<String>) -> Self {
        Self {
            cgpa: Some(row.cgpa.clone()),
            class10_percent: Some(row.class10percentage.clone()),
            class12_percent: Some(row.class12percentage.clone()),
            backlogs,
            department,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

pub fn check_eligibility(profile: &StudentProfile, company: &CompanyRow) -> EligibilityReport {
    let mut reasons = Vec::new();

    if let Some(min) = company.min_cgpa {
        if below(profile.cgpa.as_deref(), min) {
            reasons.push(format!("CGPA is below required minimum ({})", display_number(min)));
        }
    }
    if let Some(min) = company.min_class10_percent {
        if below(profile.class10_percent.as_deref(), min) {
            reasons.push(format!(
                "Class 10 percentage is below required minimum ({}%)",
                display_number(min)
            ));
        }
    }
    if let Some(min) = company.min_class12_percent {
        if below(profile.class12_percent.as_deref(), min) {
            reasons.push(format!(
                "Class 12 percentage is below required minimum ({}%)",
                display_number(min)
            ));
        }
    }
    if let (Some(max), Some(backlogs)) = (company.max_allowed_backlogs, profile.backlogs) {
        if backlogs > max {
            reasons.push(format!("Backlogs exceed the allowed maximum ({max})"));
        }
    }
    if let Some(department) = profile.department.as_deref().map(str::trim) {
        let restricted = !company.department.is_empty();
        let listed = company
            .department
            .iter()
            .any(|d| d.trim().eq_ignore_ascii_case(department));
        if restricted && !department.is_empty() && !listed {
            reasons.push(format!(
                "Only for departments: {}",
                company.department.join(", ")
            ));
        }
    }

    EligibilityReport {
        eligible: reasons.is_empty(),
        reasons,
    }
}

/// Leading decimal number of a free-form result: `"88%"`, `"88.5 %"`, `"8.5 CGPA"`, `"9.2/10"`.
pub fn parse_score(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn below(value: Option<&str>, min: f64) -> bool {
    value.and_then(parse_score).is_some_and(|v| v < min)
}

/// `7.0` prints as `7`, `7.5` as `7.5`.
fn display_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn company() -> CompanyRow {
        CompanyRow {
            company_id: Uuid::new_v4(),
            company_name: "Initech".to_string(),
            industry: Some("Software".to_string()),
            job_role: Some("SDE".to_string()),
            offer_type: Some("Full Time".to_string()),
            package_offered: Some("12 LPA".to_string()),
            location: Some("Chennai".to_string()),
            application_deadline: None,
            min_cgpa: Some(7.5),
            min_class10_percent: Some(80.0),
            min_class12_percent: Some(75.0),
            max_allowed_backlogs: Some(0),
            department: vec!["CSE".to_string(), "IT".to_string()],
            company_image: None,
        }
    }

    fn profile() -> StudentProfile {
        StudentProfile {
            cgpa: Some("8.2".to_string()),
            class10_percent: Some("91%".to_string()),
            class12_percent: Some("88.5 %".to_string()),
            backlogs: Some(0),
            department: Some("CSE".to_string()),
        }
    }

    #[test]
    fn test_eligible_student() {
        let report = check_eligibility(&profile(), &company());
        assert!(report.eligible);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_every_reason_in_order() {
        let student = StudentProfile {
            cgpa: Some("6.9".to_string()),
            class10_percent: Some("70%".to_string()),
            class12_percent: Some("60".to_string()),
            backlogs: Some(2),
            department: Some("MECH".to_string()),
        };
        let report = check_eligibility(&student, &company());
        assert!(!report.eligible);
        assert_eq!(
            report.reasons,
            vec![
                "CGPA is below required minimum (7.5)",
                "Class 10 percentage is below required minimum (80%)",
                "Class 12 percentage is below required minimum (75%)",
                "Backlogs exceed the allowed maximum (0)",
                "Only for departments: CSE, IT",
            ]
        );
    }

    #[test]
    fn test_unknown_values_skip_checks() {
        let student = StudentProfile {
            cgpa: Some("".to_string()),
            class10_percent: Some("A1 grade".to_string()),
            class12_percent: None,
            backlogs: None,
            department: None,
        };
        assert!(check_eligibility(&student, &company()).eligible);
    }

    #[test]
    fn test_empty_department_list_is_unrestricted() {
        let mut open = company();
        open.department.clear();
        let student = StudentProfile {
            department: Some("ECE".to_string()),
            ..profile()
        };
        assert!(check_eligibility(&student, &open).eligible);
    }

    #[test]
    fn test_department_match_ignores_case() {
        let student = StudentProfile {
            department: Some(" it ".to_string()),
            ..profile()
        };
        assert!(check_eligibility(&student, &company()).eligible);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("88%"), Some(88.0));
        assert_eq!(parse_score(" 88.5 %"), Some(88.5));
        assert_eq!(parse_score("8.5 CGPA"), Some(8.5));
        assert_eq!(parse_score("9.2/10"), Some(9.2));
        assert_eq!(parse_score("A+"), None);
        assert_eq!(parse_score(""), None);
    }
}
