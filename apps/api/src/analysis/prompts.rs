// All LLM prompt constants for the analysis pipeline.
// System personas are wrapped with llm_client::prompts::json_system at call time.

/// Persona for résumé extraction.
pub const RESUME_EXTRACT_PERSONA: &str =
    "You are an expert résumé parser. Extract structured candidate data from résumé text.";

/// Résumé extraction prompt. Replace `{resume_text}` before sending.
pub const RESUME_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the candidate profile from the résumé below.

Return a JSON object with this EXACT schema:
{
  "name": "Full Name",
  "currentRole": "Most recent job title",
  "experienceYears": 3,
  "education": {"degree": "Bachelor's", "field": "Computer Science"},
  "technicalSkills": {
    "programmingLanguages": ["Python"],
    "frameworks": ["React"],
    "databases": ["PostgreSQL"],
    "tools": ["Docker"]
  },
  "projects": [
    {"title": "Project name", "technologies": ["Python", "AWS"]}
  ]
}

Rules:
- experienceYears is a whole number of years of professional experience. Use 0 if unknown.
- Only list skills and projects that appear in the text. Do NOT invent anything.
- Use empty strings and empty arrays for missing data.

RÉSUMÉ:
{resume_text}"#;

/// Persona for job posting analysis.
pub const JOB_ANALYSIS_PERSONA: &str =
    "You are an expert job market analyst. Provide detailed, actionable insights about job postings.";

/// Job analysis prompt. Replace `{job_content}` before sending.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this job posting and extract key insights.

Return a JSON object with this schema (omit nothing, use empty values when unknown):
{
  "title": "Job title",
  "company": "Company name",
  "location": "Location",
  "experienceLevel": "entry | mid | senior",
  "salary": "Salary range if stated",
  "skills": ["Required technical skills"],
  "requirements": ["Key requirements"],
  "responsibilities": ["Key responsibilities"],
  "technicalRequirements": ["Key technical requirements and skills needed"],
  "cultureIndicators": ["Company culture indicators"],
  "growthOpportunities": ["Growth opportunities mentioned"],
  "interviewHints": ["Interview process hints, if any"],
  "concerns": ["Red flags or concerns to note"]
}

JOB POSTING CONTENT:
{job_content}"#;

/// Persona for match scoring.
pub const MATCH_SCORE_PERSONA: &str = "You are an expert at analyzing job compatibility using structured data. \
    Provide precise, actionable analysis based on specific requirements and candidate background.";

/// Match scoring prompt. Replace every `{placeholder}` before sending.
pub const MATCH_SCORE_PROMPT_TEMPLATE: &str = r#"Analyze the compatibility between this candidate and the job posting.

CANDIDATE PROFILE:
- Name: {name}
- Experience: {experience_years} years
- Current Role: {current_role}
- Education: {education}
- Technical Skills: {skills}
- Projects: {projects}

JOB DETAILS:
- Title: {title}
- Company: {company}
- Location: {location}
- Experience Level: {experience_level}
- Salary: {salary}
- Required Skills: {job_skills}
- Requirements: {requirements}
- Responsibilities: {responsibilities}

FULL JOB CONTENT:
{job_content}

Score each dimension from 0 to 100 based on:
1. Technical skills overlap (candidate skills vs required skills)
2. Experience level alignment (years and role progression)
3. Education relevance to the role
4. Project experience relevance to responsibilities

Return a JSON object with this EXACT schema:
{
  "overallMatch": 0,
  "skillsMatch": 0,
  "experienceMatch": 0,
  "educationMatch": 0,
  "missingSkills": ["skill"],
  "strongMatches": ["skill"],
  "partialMatches": ["skill"],
  "recommendedFocus": ["area"],
  "personalizedInsights": "One or two sentences addressed to the candidate."
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_contain_their_placeholders() {
        assert!(RESUME_EXTRACT_PROMPT_TEMPLATE.contains("{resume_text}"));
        assert!(JOB_ANALYSIS_PROMPT_TEMPLATE.contains("{job_content}"));
        for placeholder in ["{name}", "{skills}", "{job_skills}", "{job_content}"] {
            assert!(MATCH_SCORE_PROMPT_TEMPLATE.contains(placeholder), "{placeholder}");
        }
    }

    #[test]
    fn test_personas_are_distinct() {
        // StubLlm routes replies by persona substring
        assert_ne!(RESUME_EXTRACT_PERSONA, JOB_ANALYSIS_PERSONA);
        assert!(!MATCH_SCORE_PERSONA.contains(JOB_ANALYSIS_PERSONA));
        assert!(!JOB_ANALYSIS_PERSONA.contains(RESUME_EXTRACT_PERSONA));
    }
}
