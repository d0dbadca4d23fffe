//! Match Scorer: resume × job compatibility scores and skill-gap lists.
//!
//! Scores from the model are range-checked. Any failure substitutes a fixed
//! default set, tagged as a fallback so callers can flag it.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::outcome::Staged;
use crate::analysis::prompts::{MATCH_SCORE_PERSONA, MATCH_SCORE_PROMPT_TEMPLATE};
use crate::analysis::{fill_template, truncate_chars};
use crate::llm_client::{prompts::json_system, LanguageModel};
use crate::models::job::JobData;
use crate::models::resume::ResumeData;

const MAX_TOKENS: u32 = 1500;
const MAX_CONTENT_CHARS: usize = 2000;

/// Compatibility scores, each an integer in 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub overall_match: u8,
    pub skills_match: u8,
    pub experience_match: u8,
    pub education_match: u8,
    pub missing_skills: Vec<String>,
    pub strong_matches: Vec<String>,
    pub partial_matches: Vec<String>,
    pub recommended_focus: Vec<String>,
    pub personalized_insights: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum MatchSchemaError {
    #[error("'{0}' is missing or not a number")]
    NotNumeric(&'static str),

    #[error("'{field}' = {value} is outside 0..=100")]
    OutOfRange { field: &'static str, value: f64 },
}

pub async fn score_match(
    llm: &dyn LanguageModel,
    resume: &ResumeData,
    job: &JobData,
    job_description: &str,
) -> Staged<MatchResult> {
    let prompt = build_prompt(resume, job, job_description);
    let system = json_system(MATCH_SCORE_PERSONA);

    let raw = match llm
        .call_json::<Map<String, Value>>(&prompt, &system, MAX_TOKENS)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Match scoring failed, using default scores: {e}");
            return Staged::fallback(fallback_match(resume), e);
        }
    };

    match validate(&raw, resume) {
        Ok(result) => {
            info!(
                "Match scored: overall={}, skills={}, missing={}",
                result.overall_match,
                result.skills_match,
                result.missing_skills.len()
            );
            Staged::ai(result)
        }
        Err(e) => {
            warn!("Match score failed validation, using default scores: {e}");
            Staged::fallback(fallback_match(resume), e)
        }
    }
}

/// Fixed optimistic default used whenever scoring fails.
pub fn fallback_match(resume: &ResumeData) -> MatchResult {
    MatchResult {
        overall_match: 85,
        skills_match: 80,
        experience_match: 85,
        education_match: 90,
        missing_skills: Vec::new(),
        strong_matches: resume.technical_skills.programming_languages.clone(),
        partial_matches: Vec::new(),
        recommended_focus: vec!["Technical Skills".to_string(), "Experience".to_string()],
        personalized_insights: "Your background shows strong alignment with this position.".to_string(),
    }
}

fn score(raw: &Map<String, Value>, field: &'static str) -> Result<u8, MatchSchemaError> {
    let value = raw
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(MatchSchemaError::NotNumeric(field))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(MatchSchemaError::OutOfRange { field, value });
    }
    Ok(value.round() as u8)
}

fn strings(raw: &Map<String, Value>, field: &str) -> Option<Vec<String>> {
    raw.get(field)?.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn validate(raw: &Map<String, Value>, resume: &ResumeData) -> Result<MatchResult, MatchSchemaError> {
    Ok(MatchResult {
        overall_match: score(raw, "overallMatch")?,
        skills_match: score(raw, "skillsMatch")?,
        experience_match: score(raw, "experienceMatch")?,
        education_match: score(raw, "educationMatch")?,
        missing_skills: strings(raw, "missingSkills").unwrap_or_default(),
        strong_matches: strings(raw, "strongMatches")
            .unwrap_or_else(|| resume.technical_skills.programming_languages.clone()),
        partial_matches: strings(raw, "partialMatches").unwrap_or_default(),
        recommended_focus: strings(raw, "recommendedFocus")
            .filter(|focus| !focus.is_empty())
            .unwrap_or_else(|| vec!["System Design".to_string(), "Technical Skills".to_string()]),
        personalized_insights: raw
            .get("personalizedInsights")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "Your {} years of experience aligns well with this role.",
                    resume.experience_years
                )
            }),
    })
}

fn or_unspecified(value: Option<&str>) -> &str {
    value.unwrap_or("Not specified")
}

fn join_or_unspecified(items: &[String], sep: &str) -> String {
    if items.is_empty() {
        "Not specified".to_string()
    } else {
        items.join(sep)
    }
}

fn build_prompt(resume: &ResumeData, job: &JobData, job_description: &str) -> String {
    let education = if resume.has_education() {
        format!("{} in {}", resume.education.degree, resume.education.field)
    } else {
        "Not specified".to_string()
    };
    let skills: Vec<String> = resume.technical_skills.all().cloned().collect();
    let projects: Vec<String> = resume
        .projects
        .iter()
        .map(|p| format!("{} ({})", p.title, p.technologies.join(", ")))
        .collect();
    let content = job.posting_text().unwrap_or(job_description);

    fill_template(
        MATCH_SCORE_PROMPT_TEMPLATE,
        &[
            ("{name}", resume.name.clone()),
            ("{experience_years}", resume.experience_years.to_string()),
            ("{current_role}", resume.current_role.clone()),
            ("{education}", education),
            ("{skills}", join_or_unspecified(&skills, ", ")),
            ("{projects}", join_or_unspecified(&projects, "; ")),
            ("{title}", or_unspecified(job.title_or_role()).to_string()),
            ("{company}", or_unspecified(job.company_name()).to_string()),
            ("{location}", or_unspecified(job.location_name()).to_string()),
            ("{experience_level}", or_unspecified(job.experience_level_text()).to_string()),
            ("{salary}", or_unspecified(job.salary_text()).to_string()),
            ("{job_skills}", join_or_unspecified(&job.skills, ", ")),
            ("{requirements}", join_or_unspecified(&job.requirements, "; ")),
            ("{responsibilities}", join_or_unspecified(&job.responsibilities, "; ")),
            ("{job_content}", truncate_chars(content, MAX_CONTENT_CHARS).to_string()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::outcome::Provenance;
    use crate::llm_client::testing::StubLlm;
    use crate::models::resume::TechnicalSkills;
    use serde_json::json;

    fn resume() -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            experience_years: 3,
            technical_skills: TechnicalSkills {
                programming_languages: vec!["Python".to_string()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn job() -> JobData {
        JobData {
            title: Some("Software Engineer".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_valid_scores_are_rounded_and_defaults_filled() {
        let stub = StubLlm::failing().reply(
            MATCH_SCORE_PERSONA,
            json!({
                "overallMatch": 72.6,
                "skillsMatch": 64,
                "experienceMatch": 80,
                "educationMatch": 0,
                "missingSkills": ["Kubernetes"]
            }),
        );
        let staged = score_match(&stub, &resume(), &job(), "").await;
        assert_eq!(staged.provenance, Provenance::Ai);
        let result = staged.data;
        assert_eq!(result.overall_match, 73);
        assert_eq!(result.education_match, 0);
        assert_eq!(result.missing_skills, vec!["Kubernetes"]);
        assert_eq!(result.strong_matches, vec!["Python"]);
        assert_eq!(result.recommended_focus, vec!["System Design", "Technical Skills"]);
        assert!(result.personalized_insights.contains("3 years"));
    }

    #[tokio::test]
    async fn test_out_of_range_score_triggers_fallback() {
        let stub = StubLlm::failing().reply(
            MATCH_SCORE_PERSONA,
            json!({"overallMatch": 140, "skillsMatch": 50, "experienceMatch": 50, "educationMatch": 50}),
        );
        let staged = score_match(&stub, &resume(), &job(), "").await;
        assert!(staged.is_fallback());
        assert_eq!(staged.data, fallback_match(&resume()));
    }

    #[tokio::test]
    async fn test_model_error_uses_fixed_default() {
        let staged = score_match(&StubLlm::failing(), &resume(), &job(), "").await;
        assert!(staged.is_fallback());
        let result = staged.data;
        assert_eq!(
            (result.overall_match, result.skills_match, result.experience_match, result.education_match),
            (85, 80, 85, 90)
        );
        assert_eq!(result.recommended_focus, vec!["Technical Skills", "Experience"]);
    }

    #[test]
    fn test_validate_rejects_missing_and_string_scores() {
        let raw = json!({"overallMatch": "85", "skillsMatch": 1, "experienceMatch": 1, "educationMatch": 1});
        let err = validate(raw.as_object().unwrap(), &resume()).unwrap_err();
        assert_eq!(err, MatchSchemaError::NotNumeric("overallMatch"));

        let raw = json!({"overallMatch": 50, "skillsMatch": -1, "experienceMatch": 1, "educationMatch": 1});
        let err = validate(raw.as_object().unwrap(), &resume()).unwrap_err();
        assert!(matches!(err, MatchSchemaError::OutOfRange { field: "skillsMatch", .. }));
    }

    #[test]
    fn test_prompt_includes_profile_and_job() {
        let prompt = build_prompt(&resume(), &job(), "Build APIs");
        assert!(prompt.contains("Name: Jane Doe"));
        assert!(prompt.contains("Title: Software Engineer"));
        assert!(prompt.contains("Company: Acme"));
        assert!(prompt.contains("Location: Not specified"));
        assert!(prompt.contains("Build APIs"));
        assert!(!prompt.contains("{job_content}"));
    }

    #[test]
    fn test_prompt_values_with_braces_stay_literal() {
        let mut resume = resume();
        resume.name = "{job_content} {title}".to_string();
        let prompt = build_prompt(&resume, &job(), "Build APIs");
        assert!(prompt.contains("Name: {job_content} {title}"));
        assert_eq!(prompt.matches("Build APIs").count(), 1);
    }
}
