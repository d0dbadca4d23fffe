//! Job Analyzer: enriches scraped job data with model-extracted fields.
//!
//! This is an enhancement layer: if the model call fails, the scraped fields
//! come back untouched.

use serde::Deserialize;
use tracing::{info, warn};

use crate::analysis::outcome::Staged;
use crate::analysis::prompts::{JOB_ANALYSIS_PERSONA, JOB_ANALYSIS_PROMPT_TEMPLATE};
use crate::analysis::truncate_chars;
use crate::llm_client::{prompts::json_system, LanguageModel};
use crate::models::dedupe_case_insensitive;
use crate::models::job::{JobData, JobInsights};
use crate::models::{lenient_string, lenient_strings};

/// Postings shorter than this are not worth a model call.
pub const MIN_AI_CONTENT_CHARS: usize = 200;
const MAX_CONTENT_CHARS: usize = 3000;
const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AiJobAnalysis {
    #[serde(deserialize_with = "lenient_string")]
    title: String,
    #[serde(deserialize_with = "lenient_string")]
    company: String,
    #[serde(deserialize_with = "lenient_string")]
    location: String,
    #[serde(deserialize_with = "lenient_string")]
    experience_level: String,
    #[serde(deserialize_with = "lenient_string")]
    salary: String,
    #[serde(deserialize_with = "lenient_strings")]
    skills: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    requirements: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    responsibilities: Vec<String>,
    #[serde(flatten)]
    insights: JobInsights,
}

/// Analyzes a job posting. `job_description` is used when the job data
/// carries no posting text of its own.
pub async fn analyze_job(
    llm: &dyn LanguageModel,
    job: JobData,
    job_description: Option<&str>,
) -> Staged<JobData> {
    let content = job
        .posting_text()
        .or(job_description)
        .map(str::trim)
        .unwrap_or_default();

    if content.chars().count() < MIN_AI_CONTENT_CHARS {
        info!(
            "Job content too short for AI analysis ({} chars), using scraped fields",
            content.chars().count()
        );
        return Staged::provided(job);
    }

    let prompt =
        JOB_ANALYSIS_PROMPT_TEMPLATE.replace("{job_content}", truncate_chars(content, MAX_CONTENT_CHARS));
    let system = json_system(JOB_ANALYSIS_PERSONA);

    match llm.call_json::<AiJobAnalysis>(&prompt, &system, MAX_TOKENS).await {
        Ok(ai) => {
            let merged = merge_ai(job, ai);
            info!(
                "AI-enhanced job analysis completed: {} at {}",
                merged.title_or_role().unwrap_or("Position"),
                merged.company_name().unwrap_or("Company")
            );
            Staged::ai(merged)
        }
        Err(e) => {
            warn!("AI job enhancement failed, using scraped fields: {e}");
            Staged::fallback(job, e)
        }
    }
}

/// AI scalars win when non-empty; lists are unioned with scraped items first.
fn merge_ai(mut job: JobData, ai: AiJobAnalysis) -> JobData {
    fn overlay(dst: &mut Option<String>, src: String) {
        let src = src.trim();
        if !src.is_empty() {
            *dst = Some(src.to_string());
        }
    }
    fn union(dst: &mut Vec<String>, src: Vec<String>) {
        let combined = std::mem::take(dst).into_iter().chain(src);
        *dst = dedupe_case_insensitive(combined);
    }

    overlay(&mut job.title, ai.title);
    overlay(&mut job.company, ai.company);
    overlay(&mut job.location, ai.location);
    overlay(&mut job.experience_level, ai.experience_level);
    overlay(&mut job.salary, ai.salary);
    union(&mut job.skills, ai.skills);
    union(&mut job.requirements, ai.requirements);
    union(&mut job.responsibilities, ai.responsibilities);
    job.insights = Some(ai.insights);
    job
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::outcome::Provenance;
    use crate::llm_client::testing::StubLlm;
    use serde_json::json;

    fn long_posting() -> String {
        "We are hiring a backend engineer to build payment APIs in Rust and Go. ".repeat(5)
    }

    fn scraped_job() -> JobData {
        serde_json::from_value(json!({
            "title": "Software Engineer",
            "company": "Acme",
            "skills": ["Rust", "Kafka"],
            "content": long_posting(),
            "scrapedAt": "2024-05-01"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_short_content_skips_model() {
        let stub = StubLlm::failing();
        let job = JobData {
            title: Some("Software Engineer".to_string()),
            content: Some("Too short".to_string()),
            ..Default::default()
        };
        let staged = analyze_job(&stub, job.clone(), None).await;
        assert_eq!(stub.calls(), 0);
        assert_eq!(staged.provenance, Provenance::Provided);
        assert_eq!(staged.data, job);
    }

    #[tokio::test]
    async fn test_failure_preserves_input_fields() {
        let stub = StubLlm::failing();
        let job = scraped_job();
        let staged = analyze_job(&stub, job.clone(), None).await;
        assert_eq!(stub.calls(), 1);
        assert!(staged.is_fallback());
        assert_eq!(staged.data, job);
        assert_eq!(staged.data.extra["scrapedAt"], "2024-05-01");
    }

    #[tokio::test]
    async fn test_job_description_used_when_job_has_no_content() {
        let stub = StubLlm::failing().reply(JOB_ANALYSIS_PERSONA, r#"{"title": "Platform Engineer"}"#);
        let job = JobData {
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        let staged = analyze_job(&stub, job, Some(&long_posting())).await;
        assert_eq!(staged.provenance, Provenance::Ai);
        assert_eq!(staged.data.title.as_deref(), Some("Platform Engineer"));
        assert_eq!(staged.data.company.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_ai_fields_merge_over_scraped() {
        let stub = StubLlm::failing().reply(
            JOB_ANALYSIS_PERSONA,
            json!({
                "title": "Senior Software Engineer",
                "company": "",
                "skills": ["rust", "PostgreSQL"],
                "interviewHints": ["Take-home exercise"],
                "concerns": "On-call rotation"
            }),
        );
        let staged = analyze_job(&stub, scraped_job(), None).await;
        let job = staged.data;
        assert_eq!(job.title.as_deref(), Some("Senior Software Engineer"));
        assert_eq!(job.company.as_deref(), Some("Acme"));
        assert_eq!(job.skills, vec!["Rust", "Kafka", "PostgreSQL"]);
        let insights = job.insights.unwrap();
        assert_eq!(insights.interview_hints, vec!["Take-home exercise"]);
        assert_eq!(insights.concerns, vec!["On-call rotation"]);
        assert_eq!(job.extra["scrapedAt"], "2024-05-01");
    }

    #[tokio::test]
    async fn test_null_scalars_keep_ai_result() {
        let stub = StubLlm::failing().reply(
            JOB_ANALYSIS_PERSONA,
            json!({
                "title": "Senior Backend Engineer",
                "location": null,
                "experienceLevel": "Senior",
                "salary": null,
                "requirements": null,
                "cultureIndicators": ["Remote-first"]
            }),
        );
        let staged = analyze_job(&stub, scraped_job(), None).await;
        assert_eq!(staged.provenance, Provenance::Ai);
        let job = staged.data;
        assert_eq!(job.title.as_deref(), Some("Senior Backend Engineer"));
        assert_eq!(job.experience_level.as_deref(), Some("Senior"));
        assert!(job.salary.is_none());
        assert_eq!(job.insights.unwrap().culture_indicators, vec!["Remote-first"]);
    }
}
