//! Resume Extractor: turns raw résumé text into `ResumeData`.
//!
//! One model call raced against a 20s timeout. On timeout, model error or an
//! empty profile, a regex heuristic produces a less precise record instead.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::analysis::outcome::Staged;
use crate::analysis::prompts::{RESUME_EXTRACT_PERSONA, RESUME_EXTRACT_PROMPT_TEMPLATE};
use crate::analysis::truncate_chars;
use crate::llm_client::{prompts::json_system, LanguageModel, LlmError};
use crate::models::resume::{Education, Project, ResumeData, TechnicalSkills};

pub const RESUME_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_RESUME_CHARS: usize = 6000;
const MAX_TOKENS: u32 = 1500;
const MAX_PROJECTS: usize = 5;
const MAX_YEARS: u32 = 50;

/// Extracts a résumé profile. Never fails: `name` is always non-empty.
pub async fn extract_resume(llm: &dyn LanguageModel, resume_text: &str) -> Staged<ResumeData> {
    let prompt = RESUME_EXTRACT_PROMPT_TEMPLATE
        .replace("{resume_text}", truncate_chars(resume_text, MAX_RESUME_CHARS));
    let system = json_system(RESUME_EXTRACT_PERSONA);

    let call = llm.call_json::<ResumeData>(&prompt, &system, MAX_TOKENS);
    let result = match tokio::time::timeout(RESUME_TIMEOUT, call).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Timeout(RESUME_TIMEOUT.as_secs())),
    };

    match result {
        Ok(parsed) if is_empty_profile(&parsed) => {
            warn!("Resume extraction returned an empty profile, using heuristic parser");
            Staged::fallback(heuristic_resume(resume_text), "model returned an empty profile")
        }
        Ok(parsed) => {
            let resume = reconcile(parsed, resume_text);
            info!(
                "Resume extracted by model: name={}, years={}, skills={}",
                resume.name,
                resume.experience_years,
                resume.technical_skills.count()
            );
            Staged::ai(resume)
        }
        Err(e) => {
            warn!("Resume extraction failed, using heuristic parser: {e}");
            Staged::fallback(heuristic_resume(resume_text), e)
        }
    }
}

fn is_empty_profile(resume: &ResumeData) -> bool {
    resume.name.trim().is_empty()
        && resume.technical_skills.count() == 0
        && resume.projects.is_empty()
}

/// Fills the fields the model left blank from the heuristic, then normalizes.
fn reconcile(mut parsed: ResumeData, resume_text: &str) -> ResumeData {
    if parsed.name.trim().is_empty() {
        parsed.name = extract_name(resume_text);
    }
    if parsed.current_role.trim().is_empty() {
        let skills = extract_skills(resume_text);
        parsed.current_role = infer_role(resume_text, &skills);
    }
    parsed.experience_years = parsed.experience_years.min(MAX_YEARS);
    parsed.normalize()
}

// ────────────────────────────────────────────────────────────────────────────
// Heuristic parser
// ────────────────────────────────────────────────────────────────────────────

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+)[ \t]+([A-Z][a-z]+)\b").expect("valid name regex"));

static YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").expect("valid years regex")
});

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:senior|junior|lead|staff|principal)\s+)?(software engineer|software developer|front[- ]?end (?:developer|engineer)|back[- ]?end (?:developer|engineer)|full[- ]?stack (?:developer|engineer)|data scientist|data engineer|machine learning engineer|ml engineer|devops engineer|site reliability engineer|mobile developer)\b",
    )
    .expect("valid title regex")
});

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(ph\.?\s?d|doctorate|master|mba|bachelor|associate)").expect("valid degree regex")
});

static PROJECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*[•\-*]\s*([A-Za-z0-9][^:\n]{1,58}):\s*(.+)$").expect("valid project regex")
});

/// Capitalised pairs that look like names but are résumé boilerplate.
const NAME_STOPWORDS: &[&str] = &[
    "Software", "Engineer", "Senior", "Junior", "Resume", "Curriculum", "Vitae", "Summary",
    "Experience", "Education", "Skills", "Professional", "Developer", "Data", "Full", "Stack",
    "Machine", "Learning", "Project", "Projects", "Technical", "Work", "Contact", "Profile",
];

/// Section labels that appear as `- Label: ...` but are not projects.
const PROJECT_STOPWORDS: &[&str] = &[
    "skills", "languages", "tools", "technologies", "education", "experience", "email",
    "phone", "location", "frameworks", "databases", "summary",
];

const FIELDS: &[&str] = &[
    "Computer Science",
    "Computer Engineering",
    "Software Engineering",
    "Electrical Engineering",
    "Information Technology",
    "Information Systems",
    "Data Science",
    "Mathematics",
    "Statistics",
    "Physics",
];

// Aliases shorter than three characters match case-sensitively ("Go", "C#").
const LANGUAGES: &[(&str, &[&str])] = &[
    ("Python", &["python"]),
    ("JavaScript", &["javascript"]),
    ("TypeScript", &["typescript"]),
    ("Java", &["java"]),
    ("C++", &["c++"]),
    ("C#", &["C#"]),
    ("Go", &["Go", "golang"]),
    ("Rust", &["rust"]),
    ("Ruby", &["ruby"]),
    ("PHP", &["php"]),
    ("Swift", &["swift"]),
    ("Kotlin", &["kotlin"]),
    ("Scala", &["scala"]),
    ("SQL", &["sql"]),
];

const FRAMEWORKS: &[(&str, &[&str])] = &[
    ("React", &["react", "react.js", "reactjs"]),
    ("Angular", &["angular"]),
    ("Vue", &["vue", "vue.js"]),
    ("Next.js", &["next.js", "nextjs"]),
    ("Node.js", &["node.js", "nodejs", "node"]),
    ("Express", &["express"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("FastAPI", &["fastapi"]),
    ("Spring", &["spring", "spring boot"]),
    ("Rails", &["rails"]),
    (".NET", &[".net"]),
    ("TensorFlow", &["tensorflow"]),
    ("PyTorch", &["pytorch"]),
    ("scikit-learn", &["scikit-learn", "sklearn"]),
    ("Pandas", &["pandas"]),
];

const DATABASES: &[(&str, &[&str])] = &[
    ("PostgreSQL", &["postgresql", "postgres"]),
    ("MySQL", &["mysql"]),
    ("MongoDB", &["mongodb", "mongo"]),
    ("Redis", &["redis"]),
    ("SQLite", &["sqlite"]),
    ("DynamoDB", &["dynamodb"]),
    ("Elasticsearch", &["elasticsearch"]),
    ("Cassandra", &["cassandra"]),
];

const TOOLS: &[(&str, &[&str])] = &[
    ("AWS", &["aws", "amazon web services"]),
    ("GCP", &["gcp", "google cloud"]),
    ("Azure", &["azure"]),
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("Git", &["git"]),
    ("Terraform", &["terraform"]),
    ("Jenkins", &["jenkins"]),
    ("Kafka", &["kafka"]),
    ("Linux", &["linux"]),
    ("GraphQL", &["graphql"]),
];

struct KeywordMatcher {
    name: &'static str,
    patterns: Vec<Regex>,
}

impl KeywordMatcher {
    fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

fn build_matchers(table: &'static [(&'static str, &'static [&'static str])]) -> Vec<KeywordMatcher> {
    table
        .iter()
        .map(|&(name, aliases)| KeywordMatcher {
            name,
            patterns: aliases
                .iter()
                .filter_map(|alias| {
                    let flags = if alias.len() < 3 { "" } else { "(?i)" };
                    // Boundaries are hand-rolled so "c++" and ".net" still anchor.
                    Regex::new(&format!(
                        r"{flags}(?:^|[^A-Za-z0-9+#.])(?:{})(?:$|[^A-Za-z0-9+#])",
                        regex::escape(alias)
                    ))
                    .ok()
                })
                .collect(),
        })
        .collect()
}

static SKILL_MATCHERS: Lazy<[Vec<KeywordMatcher>; 4]> = Lazy::new(|| {
    [
        build_matchers(LANGUAGES),
        build_matchers(FRAMEWORKS),
        build_matchers(DATABASES),
        build_matchers(TOOLS),
    ]
});

fn matched_names(matchers: &[KeywordMatcher], text: &str) -> Vec<String> {
    matchers
        .iter()
        .filter(|m| m.is_match(text))
        .map(|m| m.name.to_string())
        .collect()
}

/// Regex-only résumé parser used when the model is unavailable.
pub fn heuristic_resume(resume_text: &str) -> ResumeData {
    let technical_skills = extract_skills(resume_text);
    let current_role = infer_role(resume_text, &technical_skills);

    ResumeData {
        name: extract_name(resume_text),
        current_role,
        experience_years: extract_years(resume_text),
        education: extract_education(resume_text),
        projects: extract_projects(resume_text),
        technical_skills,
        ..Default::default()
    }
    .normalize()
}

fn extract_name(text: &str) -> String {
    NAME_RE
        .captures_iter(text)
        .find(|caps| {
            !NAME_STOPWORDS.contains(&&caps[1]) && !NAME_STOPWORDS.contains(&&caps[2])
        })
        .map(|caps| format!("{} {}", &caps[1], &caps[2]))
        .unwrap_or_else(|| "Candidate".to_string())
}

fn extract_years(text: &str) -> u32 {
    YEARS_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|years| years.min(MAX_YEARS))
        .unwrap_or(0)
}

fn extract_skills(text: &str) -> TechnicalSkills {
    let [languages, frameworks, databases, tools] = &*SKILL_MATCHERS;
    TechnicalSkills {
        programming_languages: matched_names(languages, text),
        frameworks: matched_names(frameworks, text),
        databases: matched_names(databases, text),
        tools: matched_names(tools, text),
    }
}

fn infer_role(text: &str, skills: &TechnicalSkills) -> String {
    if let Some(caps) = TITLE_RE.captures(text) {
        return title_case(caps.get(0).map_or("", |m| m.as_str()));
    }

    let lower = text.to_lowercase();
    let has_skill = |names: &[&str]| skills.all().any(|s| names.contains(&s.as_str()));

    let ml = ["machine learning", "deep learning", "data science"]
        .iter()
        .any(|k| lower.contains(k))
        || has_skill(&["TensorFlow", "PyTorch", "scikit-learn"]);
    let frontend = has_skill(&["React", "Angular", "Vue", "Next.js"]);
    let backend = has_skill(&["Python", "Java", "Go", "Node.js", "Django", "Flask", "Spring", "FastAPI"]);

    let role = match (ml, frontend, backend) {
        (true, _, _) => "Data Scientist",
        (false, true, true) => "Full Stack Developer",
        (false, true, false) => "Frontend Developer",
        (false, false, true) => "Backend Developer",
        _ => "Software Engineer",
    };
    role.to_string()
}

fn extract_education(text: &str) -> Education {
    let degree = DEGREE_RE
        .captures(text)
        .map(|caps| {
            let raw = caps[1].to_lowercase();
            let degree = if raw.starts_with("ph") || raw == "doctorate" {
                "PhD"
            } else if raw == "master" {
                "Master's"
            } else if raw == "mba" {
                "MBA"
            } else if raw == "bachelor" {
                "Bachelor's"
            } else {
                "Associate's"
            };
            degree.to_string()
        })
        .unwrap_or_default();

    let lower = text.to_lowercase();
    let field = FIELDS
        .iter()
        .find(|f| lower.contains(&f.to_lowercase()))
        .map(|f| f.to_string())
        .unwrap_or_default();

    Education { degree, field }
}

fn extract_projects(text: &str) -> Vec<Project> {
    let [languages, frameworks, databases, tools] = &*SKILL_MATCHERS;

    PROJECT_RE
        .captures_iter(text)
        .filter(|caps| !PROJECT_STOPWORDS.contains(&caps[1].trim().to_lowercase().as_str()))
        .take(MAX_PROJECTS)
        .map(|caps| {
            let detail = &caps[2];
            let technologies = [languages, frameworks, databases, tools]
                .into_iter()
                .flat_map(|matchers| matched_names(matchers, detail))
                .collect();
            Project {
                title: caps[1].trim().to_string(),
                technologies,
            }
        })
        .collect()
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::outcome::Provenance;
    use crate::llm_client::testing::StubLlm;

    const JANE: &str = "Jane Doe, 3 years experience, Python, React, AWS, PostgreSQL.\n\
        B.S. in Computer Science, Bachelor of Science\n\
        Projects:\n\
        • Trip Planner: React and Node.js app deployed on AWS\n\
        - Skills: Python, Go";

    #[test]
    fn test_heuristic_extracts_jane_doe() {
        let resume = heuristic_resume(JANE);
        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(resume.experience_years, 3);
        assert_eq!(resume.current_role, "Full Stack Developer");
        assert!(resume
            .technical_skills
            .programming_languages
            .contains(&"Python".to_string()));
        assert!(resume.technical_skills.frameworks.contains(&"React".to_string()));
        assert!(resume.technical_skills.tools.contains(&"AWS".to_string()));
        assert_eq!(resume.education.degree, "Bachelor's");
        assert_eq!(resume.education.field, "Computer Science");
        assert_eq!(resume.projects.len(), 1);
        assert_eq!(resume.projects[0].title, "Trip Planner");
        assert!(resume.projects[0].technologies.contains(&"Node.js".to_string()));
        assert_eq!(resume.stats.total_projects, 1);
    }

    #[test]
    fn test_heuristic_name_defaults_to_candidate() {
        let resume = heuristic_resume("python developer with experience in aws");
        assert_eq!(resume.name, "Candidate");
        assert_eq!(resume.experience_years, 0);
        assert_eq!(resume.current_role, "Backend Developer");
    }

    #[test]
    fn test_heuristic_skips_boilerplate_pairs() {
        let resume = heuristic_resume("Software Engineer\nJohn Smith\n7+ yrs building systems");
        assert_eq!(resume.name, "John Smith");
        assert_eq!(resume.experience_years, 7);
        assert_eq!(resume.current_role, "Software Engineer");
    }

    #[test]
    fn test_go_is_case_sensitive() {
        let skills = extract_skills("I like to go hiking");
        assert!(skills.programming_languages.is_empty());
        let skills = extract_skills("Built services in Go and C++");
        assert_eq!(skills.programming_languages, vec!["C++", "Go"]);
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let skills = extract_skills("JavaScript only");
        assert_eq!(skills.programming_languages, vec!["JavaScript"]);
    }

    #[test]
    fn test_role_inference_variants() {
        let ml = heuristic_resume("Built machine learning pipelines with PyTorch");
        assert_eq!(ml.current_role, "Data Scientist");
        let fe = heuristic_resume("Shipped UIs in React and Vue");
        assert_eq!(fe.current_role, "Frontend Developer");
        let titled = heuristic_resume("senior data engineer at a bank");
        assert_eq!(titled.current_role, "Senior Data Engineer");
    }

    #[tokio::test]
    async fn test_model_result_is_reconciled() {
        let stub = StubLlm::failing().reply(
            RESUME_EXTRACT_PERSONA,
            r#"{"name": "", "currentRole": "", "experienceYears": 4,
                "technicalSkills": {"programmingLanguages": ["Rust", "rust"]}}"#,
        );
        let staged = extract_resume(&stub, JANE).await;
        assert_eq!(staged.provenance, Provenance::Ai);
        assert_eq!(staged.data.name, "Jane Doe");
        assert_eq!(staged.data.current_role, "Full Stack Developer");
        assert_eq!(staged.data.experience_years, 4);
        assert_eq!(staged.data.technical_skills.programming_languages, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_null_fields_keep_model_result() {
        let stub = StubLlm::failing().reply(
            RESUME_EXTRACT_PERSONA,
            r#"{"name": "Jane Q. Doe", "currentRole": null, "experienceYears": 9,
                "education": {"degree": "Master's", "field": null},
                "technicalSkills": {"programmingLanguages": ["Python"], "tools": null},
                "projects": [{"title": "Trip Planner", "technologies": null}],
                "stats": null}"#,
        );
        let staged = extract_resume(&stub, JANE).await;
        assert_eq!(staged.provenance, Provenance::Ai);
        assert_eq!(staged.data.name, "Jane Q. Doe");
        assert_eq!(staged.data.experience_years, 9);
        assert_eq!(staged.data.education.degree, "Master's");
        assert!(staged.data.education.field.is_empty());
        assert!(!staged.data.current_role.is_empty());
        assert_eq!(staged.data.stats.total_projects, 1);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back_to_heuristic() {
        let stub = StubLlm::failing();
        let staged = extract_resume(&stub, JANE).await;
        assert!(staged.is_fallback());
        assert_eq!(staged.data.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_empty_profile_falls_back() {
        let stub = StubLlm::failing().reply(RESUME_EXTRACT_PERSONA, "{}");
        let staged = extract_resume(&stub, JANE).await;
        assert_eq!(
            staged.provenance,
            Provenance::Fallback {
                reason: "model returned an empty profile".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_times_out_after_20s() {
        let stub = StubLlm::failing()
            .reply(RESUME_EXTRACT_PERSONA, r#"{"name": "Slow Poke"}"#)
            .with_delay(Duration::from_secs(30));
        let started = tokio::time::Instant::now();
        let staged = extract_resume(&stub, JANE).await;

        assert!(started.elapsed() >= RESUME_TIMEOUT);
        assert!(started.elapsed() < Duration::from_secs(30));
        assert_eq!(staged.data.name, "Jane Doe");
        match staged.provenance {
            Provenance::Fallback { reason } => assert!(reason.contains("timed out")),
            other => panic!("expected fallback, got {other:?}"),
        }
    }
}
