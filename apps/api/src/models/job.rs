use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient_strings;
use super::resume::Seniority;

/// Job posting record. Scraped fields arrive from the client; the analyzer
/// merges AI-extracted fields over them. Unknown keys are carried through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub requirements: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub benefits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<JobInsights>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Interview-relevant signals the model reads out of a posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInsights {
    #[serde(deserialize_with = "lenient_strings")]
    pub technical_requirements: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub culture_indicators: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub growth_opportunities: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub interview_hints: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub concerns: Vec<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl JobData {
    pub fn title_or_role(&self) -> Option<&str> {
        non_empty(&self.title).or_else(|| non_empty(&self.role))
    }

    pub fn company_name(&self) -> Option<&str> {
        non_empty(&self.company)
    }

    pub fn location_name(&self) -> Option<&str> {
        non_empty(&self.location)
    }

    pub fn salary_text(&self) -> Option<&str> {
        non_empty(&self.salary).or_else(|| non_empty(&self.salary_range))
    }

    pub fn experience_level_text(&self) -> Option<&str> {
        non_empty(&self.experience_level)
    }

    pub fn job_type_text(&self) -> Option<&str> {
        non_empty(&self.job_type)
    }

    /// Posting body: `content`, else `description`.
    pub fn posting_text(&self) -> Option<&str> {
        non_empty(&self.content).or_else(|| non_empty(&self.description))
    }

    /// Shallow merge: fields set on `overlay` replace ours, lists are replaced
    /// when non-empty, extra keys are inserted.
    pub fn merge_from(&mut self, overlay: JobData) {
        fn take(dst: &mut Option<String>, src: Option<String>) {
            if src.as_deref().is_some_and(|s| !s.trim().is_empty()) {
                *dst = src;
            }
        }
        fn take_list(dst: &mut Vec<String>, src: Vec<String>) {
            if !src.is_empty() {
                *dst = src;
            }
        }

        take(&mut self.title, overlay.title);
        take(&mut self.role, overlay.role);
        take(&mut self.company, overlay.company);
        take(&mut self.location, overlay.location);
        take_list(&mut self.requirements, overlay.requirements);
        take_list(&mut self.skills, overlay.skills);
        take_list(&mut self.responsibilities, overlay.responsibilities);
        take_list(&mut self.benefits, overlay.benefits);
        take(&mut self.salary, overlay.salary);
        take(&mut self.salary_range, overlay.salary_range);
        take(&mut self.experience_level, overlay.experience_level);
        take(&mut self.job_type, overlay.job_type);
        take(&mut self.content, overlay.content);
        take(&mut self.description, overlay.description);
        take(&mut self.url, overlay.url);
        if overlay.insights.is_some() {
            self.insights = overlay.insights;
        }
        self.extra.extend(overlay.extra);
    }

    /// Fills unset display fields with placeholders for the analyze-job response.
    pub fn with_display_defaults(mut self) -> Self {
        fn or_default(field: &mut Option<String>, default: &str) {
            if non_empty(field).is_none() {
                *field = Some(default.to_string());
            }
        }

        if self.title_or_role().is_none() {
            self.title = Some("Position".to_string());
        }
        or_default(&mut self.company, "Company");
        or_default(&mut self.location, "Location TBD");
        or_default(&mut self.experience_level, "Not specified");
        or_default(&mut self.job_type, "Full-time");
        if self.salary_text().is_none() {
            self.salary = Some("Not specified".to_string());
        }
        self
    }
}

/// The slice of a job that downstream template stages need.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobContext {
    pub role: String,
    pub company: String,
    pub description: String,
    /// Candidate seniority; drives question difficulty and coaching copy.
    pub level: Seniority,
    /// Level the posting asks for, when it says.
    pub target_level: Option<Seniority>,
}

impl JobContext {
    pub fn new(job: &JobData, job_description: Option<&str>, level: Seniority) -> Self {
        let description = job
            .posting_text()
            .or(job_description.map(str::trim).filter(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_string();

        Self {
            role: job.title_or_role().unwrap_or("Software Engineer").to_string(),
            company: job.company_name().unwrap_or("Target Company").to_string(),
            description,
            level,
            target_level: job
                .experience_level_text()
                .and_then(Seniority::from_label)
                .or_else(|| job.title_or_role().and_then(Seniority::from_label)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let json = r#"{"title": "Software Engineer", "company": "Acme", "scrapedAt": "2024-01-01", "skills": "Rust\nGo"}"#;
        let job: JobData = serde_json::from_str(json).unwrap();
        assert_eq!(job.skills, vec!["Rust", "Go"]);
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["scrapedAt"], "2024-01-01");
        assert_eq!(value["company"], "Acme");
        assert!(value.get("location").is_none());
    }

    #[test]
    fn test_job_context_defaults() {
        let ctx = JobContext::new(&JobData::default(), None, Seniority::Mid);
        assert_eq!(ctx.role, "Software Engineer");
        assert_eq!(ctx.company, "Target Company");
        assert_eq!(ctx.description, "");
        assert_eq!(ctx.target_level, None);
    }

    #[test]
    fn test_job_context_prefers_title_then_role_and_content() {
        let job = JobData {
            role: Some("Data Scientist".to_string()),
            description: Some("Model things".to_string()),
            experience_level: Some("Senior".to_string()),
            ..Default::default()
        };
        let ctx = JobContext::new(&job, Some("ignored"), Seniority::Junior);
        assert_eq!(ctx.role, "Data Scientist");
        assert_eq!(ctx.description, "Model things");
        assert_eq!(ctx.target_level, Some(Seniority::Senior));

        let ctx = JobContext::new(&JobData::default(), Some("  raw text "), Seniority::Junior);
        assert_eq!(ctx.description, "raw text");
    }

    #[test]
    fn test_merge_from_keeps_existing_when_overlay_blank() {
        let mut job = JobData {
            title: Some("Backend Engineer".to_string()),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        job.merge_from(JobData {
            title: Some("  ".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        });
        assert_eq!(job.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(job.company.as_deref(), Some("Acme"));
        assert_eq!(job.skills, vec!["Rust"]);
    }

    #[test]
    fn test_display_defaults_only_fill_gaps() {
        let job = JobData {
            company: Some("Acme".to_string()),
            salary_range: Some("$100k".to_string()),
            ..Default::default()
        }
        .with_display_defaults();
        assert_eq!(job.title.as_deref(), Some("Position"));
        assert_eq!(job.company.as_deref(), Some("Acme"));
        assert_eq!(job.location.as_deref(), Some("Location TBD"));
        assert_eq!(job.job_type.as_deref(), Some("Full-time"));
        assert_eq!(job.salary, None);
        assert_eq!(job.salary_text(), Some("$100k"));
    }
}
