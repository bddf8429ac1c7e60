// Resume pipeline prompt templates.
// All prompts for the resume module are defined here.

pub const EXTRACTION_SYSTEM: &str = "\
You are a resume JSON extractor. \
Extract information from resume text into the exact JSON structure you are given. \
Never invent values that are not in the resume.";

pub const EXTRACTION_PROMPT: &str = r#"Extract information from the resume below and return exactly this JSON structure, with no duplicate keys:

{
  "programming_languages": ["Python", "Java", "C++"],
  "frontend_technologies": ["React", "Angular"],
  "backend_technologies": ["Node.js", "Django"],
  "databases": ["MySQL", "PostgreSQL"],
  "class_10": {
    "board": "CBSE",
    "percentage_or_grade": "88%",
    "year": "2019"
  },
  "class_12": {
    "board": "State Board",
    "percentage_or_grade": "87%",
    "year": "2021"
  },
  "cgpa": "8.0",
  "experience_summary": [
    {
      "organization": "Company Name",
      "role": "Position Title",
      "duration": "June - August 2024"
    }
  ],
  "total_internships_or_experiences": 1
}

EXTRACTION RULES:
1. You MUST look for the Class 10 percentage or grade in the education section.
2. You MUST look for the Class 12 percentage or grade in the education section.
3. You MUST look for the college CGPA/GPA in the education section.
4. Results look like "88%", "87.5%", "8.5 CGPA", "9.2/10". Boards look like CBSE, ICSE, State Board.
5. If a field is not found, use an empty array [] or an empty string "".
6. Do NOT add fields that are not in the structure above.

RESUME TEXT:
{resume_text}"#;

pub const QUALITY_SYSTEM: &str = "\
You are a resume quality analyzer. \
Review the resume and give specific, constructive feedback on what is missing or can be improved. \
Pay special attention to education details, including Class 10 and Class 12 results.";

pub const QUALITY_PROMPT: &str = r#"Analyze the resume below and return your review in exactly this JSON structure:

{
  "overall_score": 85,
  "strengths": ["Clear contact information"],
  "missing_elements": ["Professional summary"],
  "improvement_suggestions": ["Add a professional summary at the top"],
  "section_analysis": {
    "contact_info": {"present": true, "quality": "good", "feedback": "Contact information is complete"},
    "summary": {"present": false, "quality": "missing", "feedback": "Consider adding a professional summary"},
    "experience": {"present": true, "quality": "fair", "feedback": "Achievements are not quantified"},
    "education": {"present": true, "quality": "good", "feedback": "Education details are complete"},
    "skills": {"present": true, "quality": "good", "feedback": "Technical skills are clearly listed"},
    "projects": {"present": true, "quality": "fair", "feedback": "Projects need more detail"}
  },
  "formatting_issues": ["Inconsistent date formats"],
  "recommendations": ["Start experience bullets with action verbs"]
}

ANALYSIS RULES:
1. "quality" is one of: excellent, good, average, fair, poor, missing.
2. "overall_score" is an integer from 0 to 100.
3. Review contact info, summary, experience, education, skills, projects and achievements.
4. Only treat education data as missing if it is listed as MISSING below.

EXTRACTED EDUCATION DATA:
- Class 10: {class_10_result} (Board: {class_10_board}) - {class_10_status}
- Class 12: {class_12_result} (Board: {class_12_board}) - {class_12_status}
- CGPA: {cgpa} - {cgpa_status}

RESUME TEXT:
{resume_text}"#;
