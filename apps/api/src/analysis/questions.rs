//! Question Generator: deterministic, template-based interview questions.
//!
//! A coarse role bucket selects a static template table; résumé and job
//! fields are substituted into titles and follow-ups. No model call, no
//! randomness: identical inputs give identical questions.

use serde::Serialize;
use tracing::info;

use crate::analysis::fill_template;
use crate::models::job::JobContext;
use crate::models::resume::{ResumeData, Seniority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Technical,
    Behavioral,
    SystemDesign,
}

/// Coarse role family used to pick question and coaching tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleBucket {
    DataScientist,
    SoftwareEngineer,
    Default,
}

impl RoleBucket {
    /// Substring match on lowercased role + description. Data roles win.
    pub fn detect(role: &str, description: &str) -> Self {
        let text = format!("{} {}", role, description).to_lowercase();
        let any = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

        if any(&["data scientist", "machine learning engineer", "ml engineer"]) {
            RoleBucket::DataScientist
        } else if any(&[
            "software engineer",
            "backend engineer",
            "frontend engineer",
            "full stack",
            "developer",
        ]) {
            RoleBucket::SoftwareEngineer
        } else {
            RoleBucket::Default
        }
    }

    pub fn for_context(context: &JobContext) -> Self {
        Self::detect(&context.role, &context.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Seniority,
    pub approach: String,
    /// Why interviewers ask this question.
    pub relevance: String,
    pub follow_ups: Vec<String>,
    pub talking_points: String,
}

struct Template {
    title: &'static str,
    why_they_ask: &'static str,
    approach: &'static str,
    follow_ups: &'static [&'static str],
}

// ────────────────────────────────────────────────────────────────────────────
// Template tables
// ────────────────────────────────────────────────────────────────────────────

const BEHAVIORAL: &[Template] = &[
    Template {
        title: "Tell me about a time you had to learn a new technology quickly to deliver {topProject}.",
        why_they_ask: "Tests adaptability and learning speed, which matter in fast-changing engineering teams.",
        approach: "Describe your learning strategy, the resources you used and how you applied the knowledge under a deadline.",
        follow_ups: &[
            "What resources helped you most when ramping up?",
            "How did you balance learning with delivery?",
            "How do you keep your {primaryTech} skills current?",
        ],
    },
    Template {
        title: "Describe a disagreement with a teammate or manager during your {experienceYears} years as a {currentRole}. How did you resolve it?",
        why_they_ask: "Tests communication, conflict resolution and the ability to keep relationships healthy under stress.",
        approach: "Show respectful disagreement, active listening and a collaborative resolution. End with what changed afterwards.",
        follow_ups: &[
            "How did you keep the working relationship positive?",
            "What did you learn from the experience?",
            "How would you handle the same situation at {company}?",
        ],
    },
    Template {
        title: "Tell me about a time you worked under a tight deadline. What did you prioritise?",
        why_they_ask: "Assesses prioritisation, stress management and whether quality survives pressure.",
        approach: "Walk through how you scoped the work, what you cut, how you communicated trade-offs and the outcome.",
        follow_ups: &[
            "How do you prioritise when everything seems urgent?",
            "How do you tell stakeholders a timeline is unrealistic?",
            "What would you do differently next time?",
        ],
    },
];

const SOFTWARE_TECHNICAL: &[Template] = &[
    Template {
        title: "Walk me through how you would debug a performance problem in a {primaryTech} service in production.",
        why_they_ask: "Tests systematic problem-solving and familiarity with profiling and observability tools.",
        approach: "Reproduce, measure, find the bottleneck, fix, then verify with the same measurement.",
        follow_ups: &[
            "Which profiling tools would you use for {primaryTech}?",
            "How would the approach change for a {secondaryTech} service?",
            "How would you avoid the regression coming back?",
        ],
    },
    Template {
        title: "How did you structure the code in {topProject} to keep it maintainable as it grew?",
        why_they_ask: "Assesses code quality awareness and long-term thinking using your own work as evidence.",
        approach: "Discuss module boundaries, naming, testing and refactoring decisions with concrete examples.",
        follow_ups: &[
            "What would you refactor first if you revisited it?",
            "How do you approach code reviews?",
            "How do you manage technical debt alongside feature work?",
        ],
    },
    Template {
        title: "Explain how you would test a feature built with {framework} that depends on {database} and external APIs.",
        why_they_ask: "Tests understanding of the testing pyramid, mocking and dependency management.",
        approach: "Cover unit tests, integration tests against real dependencies where cheap, and contract tests for APIs.",
        follow_ups: &[
            "How do you deal with flaky tests?",
            "When is mocking the wrong choice?",
            "How do you balance coverage against delivery speed?",
        ],
    },
];

const SOFTWARE_SYSTEM_DESIGN: &[Template] = &[
    Template {
        title: "Design a URL shortening service that handles millions of requests per day.",
        why_they_ask: "Classic question covering API design, storage choices and horizontal scaling.",
        approach: "Requirements, high-level architecture, data model, scaling and trade-offs, in that order.",
        follow_ups: &[
            "How would you add click analytics?",
            "How would you prevent abuse?",
            "Would {database} be a good fit for the mapping store?",
        ],
    },
    Template {
        title: "Design a caching layer for a read-heavy {role} workload at {company}.",
        why_they_ask: "Tests caching patterns, invalidation strategies and consistency trade-offs.",
        approach: "Discuss cache levels, invalidation, hot keys, eviction and how you would measure hit rate.",
        follow_ups: &[
            "How would you invalidate entries across nodes?",
            "How would you handle a hot key?",
            "What would you monitor to prove the cache helps?",
        ],
    },
    Template {
        title: "How would you evolve the architecture of {topProject} to support 100x more users?",
        why_they_ask: "Checks whether you can reason about scale using a system you know deeply.",
        approach: "Identify today's bottlenecks, then propose incremental changes with clear triggers for each.",
        follow_ups: &[
            "What breaks first?",
            "Where would you introduce queues or async processing?",
            "How would you roll the migration out safely?",
        ],
    },
];

const DATA_TECHNICAL: &[Template] = &[
    Template {
        title: "Write a SQL query that finds users with more than five transactions in different cities within two hours.",
        why_they_ask: "Tests window functions and analytical SQL applied to a realistic detection problem.",
        approach: "Partition by user, order by time, use a range window, and call out edge cases such as travellers.",
        follow_ups: &[
            "How would you make this run in real time?",
            "How would you handle legitimate business travellers?",
            "How would this change on {database}?",
        ],
    },
    Template {
        title: "How would you clean and validate the dataset behind {topProject} before modelling?",
        why_they_ask: "Assesses data quality discipline, which drives most real-world model performance.",
        approach: "Cover profiling, missing values, leakage checks, outliers and how you document assumptions.",
        follow_ups: &[
            "How do you detect data leakage?",
            "Which {primaryTech} libraries do you rely on for this?",
            "How do you monitor data drift after launch?",
        ],
    },
    Template {
        title: "Explain how you would design an A/B test to measure a change for {company}'s users.",
        why_they_ask: "Tests statistical reasoning and the ability to tie experiments to business outcomes.",
        approach: "Define the metric, power analysis, randomisation unit, guardrails and how you would read the result.",
        follow_ups: &[
            "How do you choose the sample size?",
            "What if the metric moves but a guardrail regresses?",
            "When would you not run an A/B test?",
        ],
    },
];

const DATA_SYSTEM_DESIGN: &[Template] = &[
    Template {
        title: "Design a machine learning system that scores events in real time with under 100ms latency.",
        why_they_ask: "Tests production ML: feature serving, model choice under latency budgets and monitoring.",
        approach: "Cover feature pipelines, online versus batch features, model serving, fallbacks and drift monitoring.",
        follow_ups: &[
            "How would you handle class imbalance?",
            "How would you retrain without downtime?",
            "What would you alert on?",
        ],
    },
    Template {
        title: "Design a feature pipeline for a {role} team using {primaryTech} and {database}.",
        why_they_ask: "Tests data engineering judgement and reproducibility of features between training and serving.",
        approach: "Discuss sources, transformations, storage, backfills and point-in-time correctness.",
        follow_ups: &[
            "How do you keep training and serving features consistent?",
            "How would you backfill a new feature?",
            "How do you version datasets?",
        ],
    },
    Template {
        title: "How would you take the model from {topProject} from notebook to production?",
        why_they_ask: "Checks that you can ship models, not only train them.",
        approach: "Packaging, evaluation gates, deployment strategy, monitoring and rollback.",
        follow_ups: &[
            "What evaluation must pass before launch?",
            "How would you explain model decisions to stakeholders?",
            "How do you detect silent model degradation?",
        ],
    },
];

const DEFAULT_TECHNICAL: &[Template] = &[
    Template {
        title: "Walk me through the most technically challenging part of {topProject}.",
        why_they_ask: "Lets interviewers calibrate depth using work you know best.",
        approach: "Set the context, explain the hard part precisely, the options you weighed and the result.",
        follow_ups: &[
            "What alternatives did you reject and why?",
            "What would you change today?",
            "How did you validate the solution?",
        ],
    },
    Template {
        title: "How would you explain {primaryTech} and where it fits to a non-technical stakeholder at {company}?",
        why_they_ask: "Tests communication and depth of understanding at the same time.",
        approach: "Lead with the problem it solves, use one analogy, then connect it to a business outcome.",
        follow_ups: &[
            "How do you check they understood?",
            "How would you adapt the explanation for an engineer?",
            "What is a limitation of {primaryTech} you would mention?",
        ],
    },
    Template {
        title: "Describe how you approach learning an unfamiliar codebase or toolset in your first month as a {role}.",
        why_they_ask: "Assesses onboarding strategy and self-sufficiency.",
        approach: "Explain how you map the system, find owners, make a small safe change early and document what you learn.",
        follow_ups: &[
            "What artefacts do you produce while ramping up?",
            "How do you decide when to ask for help?",
            "How did this go in your current role as a {currentRole}?",
        ],
    },
];

const DEFAULT_SYSTEM_DESIGN: &[Template] = &[
    Template {
        title: "Design a notification system that sends email and push messages to millions of users.",
        why_they_ask: "Tests queueing, fan-out, retries and delivery guarantees.",
        approach: "Requirements, producers and queues, workers, provider integration, failure handling and observability.",
        follow_ups: &[
            "How would you avoid duplicate notifications?",
            "How would you respect user preferences and quiet hours?",
            "How would you rate-limit a noisy producer?",
        ],
    },
    Template {
        title: "Design a monitoring and alerting system for a service-oriented architecture at {company}.",
        why_they_ask: "Tests observability: metrics, logs, traces and alert quality.",
        approach: "Cover collection, storage, dashboards, alert rules and how you would fight alert fatigue.",
        follow_ups: &[
            "Which metrics matter most?",
            "How would you handle alert fatigue?",
            "How would you trace a request across services?",
        ],
    },
    Template {
        title: "If {topProject} had to serve a global audience, what would you change in its design?",
        why_they_ask: "Checks whether you can reason about latency, data residency and availability.",
        approach: "Discuss CDNs, regional deployments, data replication and consistency trade-offs.",
        follow_ups: &[
            "Where would you keep user data?",
            "How would you handle a regional outage?",
            "What would it cost?",
        ],
    },
];

fn tables(bucket: RoleBucket) -> [(QuestionType, &'static [Template]); 3] {
    match bucket {
        RoleBucket::SoftwareEngineer => [
            (QuestionType::Technical, SOFTWARE_TECHNICAL),
            (QuestionType::Behavioral, BEHAVIORAL),
            (QuestionType::SystemDesign, SOFTWARE_SYSTEM_DESIGN),
        ],
        RoleBucket::DataScientist => [
            (QuestionType::Technical, DATA_TECHNICAL),
            (QuestionType::Behavioral, BEHAVIORAL),
            (QuestionType::SystemDesign, DATA_SYSTEM_DESIGN),
        ],
        RoleBucket::Default => [
            (QuestionType::Technical, DEFAULT_TECHNICAL),
            (QuestionType::Behavioral, BEHAVIORAL),
            (QuestionType::SystemDesign, DEFAULT_SYSTEM_DESIGN),
        ],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Substitution
// ────────────────────────────────────────────────────────────────────────────

/// Values substituted into `{placeholder}` slots, each with a non-empty default.
struct Placeholders {
    values: Vec<(&'static str, String)>,
}

impl Placeholders {
    fn new(resume: &ResumeData, context: &JobContext) -> Self {
        let skills = &resume.technical_skills;
        let or = |value: Option<&String>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };
        let frameworks = skills
            .frameworks
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(" and ");
        let current_role = if resume.current_role.trim().is_empty() {
            "engineer".to_string()
        } else {
            resume.current_role.clone()
        };

        Self {
            values: vec![
                (
                    "{primaryTech}",
                    resume
                        .primary_tech()
                        .unwrap_or("your primary technology")
                        .to_string(),
                ),
                ("{secondaryTech}", secondary_tech(resume)),
                (
                    "{framework}",
                    if frameworks.is_empty() {
                        "modern frameworks".to_string()
                    } else {
                        frameworks
                    },
                ),
                ("{database}", or(skills.databases.first(), "a relational database")),
                (
                    "{topProject}",
                    resume
                        .top_project()
                        .map(|p| format!("\"{}\"", p.title))
                        .unwrap_or_else(|| "your most recent project".to_string()),
                ),
                ("{experienceYears}", resume.experience_years.to_string()),
                ("{currentRole}", current_role),
                ("{role}", context.role.clone()),
                ("{company}", context.company.clone()),
            ],
        }
    }

    fn apply(&self, template: &str) -> String {
        fill_template(template, &self.values)
    }
}

/// The second distinct skill after the primary technology.
fn secondary_tech(resume: &ResumeData) -> String {
    let primary = resume.primary_tech().map(str::to_lowercase);
    resume
        .technical_skills
        .all()
        .find(|skill| !skill.trim().is_empty() && Some(skill.to_lowercase()) != primary)
        .cloned()
        .unwrap_or_else(|| "complementary technology".to_string())
}

fn talking_points(resume: &ResumeData, question_type: QuestionType) -> String {
    let skills = &resume.technical_skills;
    let mut points = Vec::new();

    match question_type {
        QuestionType::Technical | QuestionType::SystemDesign => {
            if !skills.programming_languages.is_empty() {
                let top: Vec<&str> = skills
                    .programming_languages
                    .iter()
                    .take(2)
                    .map(String::as_str)
                    .collect();
                points.push(format!("Highlight your expertise in {}", top.join(" and ")));
            }
            if let Some(project) = resume.top_project() {
                if project.technologies.is_empty() {
                    points.push(format!("Reference your \"{}\" project", project.title));
                } else {
                    let tech: Vec<&str> = project.technologies.iter().take(2).map(String::as_str).collect();
                    points.push(format!(
                        "Reference your \"{}\" project which used {}",
                        project.title,
                        tech.join(" and ")
                    ));
                }
            }
            if let Some(framework) = skills.frameworks.first() {
                points.push(format!("Mention your experience with {framework}"));
            }
            if question_type == QuestionType::SystemDesign {
                if let Some(db) = skills.databases.first() {
                    points.push(format!("Discuss data modelling trade-offs you met with {db}"));
                }
            }
        }
        QuestionType::Behavioral => {
            let role = if resume.current_role.is_empty() {
                "engineer"
            } else {
                resume.current_role.as_str()
            };
            points.push(format!(
                "Draw examples from your {} years as a {}",
                resume.experience_years, role
            ));
            if let [first, second, ..] = resume.projects.as_slice() {
                points.push(format!(
                    "Use examples from projects like \"{}\" and \"{}\"",
                    first.title, second.title
                ));
            }
            if resume.stats.total_projects > 0 {
                points.push(format!(
                    "Emphasise collaboration across your {} projects",
                    resume.stats.total_projects
                ));
            }
        }
    }

    if points.is_empty() {
        "Use a specific, recent example and quantify the outcome".to_string()
    } else {
        points.join(". ")
    }
}

/// Generates the question set for a résumé and job. Order is technical,
/// behavioral, then system-design; ids are 1-based.
pub fn generate_questions(resume: &ResumeData, context: &JobContext) -> Vec<Question> {
    let bucket = RoleBucket::for_context(context);
    let placeholders = Placeholders::new(resume, context);
    let difficulty = context.level;

    let questions: Vec<Question> = tables(bucket)
        .into_iter()
        .flat_map(|(question_type, templates)| templates.iter().map(move |t| (question_type, t)))
        .enumerate()
        .map(|(index, (question_type, template))| Question {
            id: (index + 1).to_string(),
            title: placeholders.apply(template.title),
            question_type,
            difficulty,
            approach: template.approach.to_string(),
            relevance: template.why_they_ask.to_string(),
            follow_ups: template
                .follow_ups
                .iter()
                .map(|f| placeholders.apply(f))
                .collect(),
            talking_points: talking_points(resume, question_type),
        })
        .collect();

    info!(
        "Generated {} questions for bucket {:?} at {} difficulty",
        questions.len(),
        bucket,
        difficulty
    );
    questions
}

/// Questions of one type, in generation order.
pub fn of_type(questions: &[Question], question_type: QuestionType) -> Vec<Question> {
    questions
        .iter()
        .filter(|q| q.question_type == question_type)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobData;
    use crate::models::resume::{Project, TechnicalSkills};

    fn resume() -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            current_role: "Full Stack Developer".to_string(),
            experience_years: 3,
            technical_skills: TechnicalSkills {
                programming_languages: vec!["Python".to_string(), "Go".to_string()],
                frameworks: vec!["React".to_string()],
                databases: vec!["PostgreSQL".to_string()],
                tools: vec!["AWS".to_string()],
            },
            projects: vec![Project {
                title: "Trip Planner".to_string(),
                technologies: vec!["React".to_string(), "Node.js".to_string()],
            }],
            ..Default::default()
        }
        .normalize()
    }

    fn context(title: &str) -> JobContext {
        let job = JobData {
            title: Some(title.to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        JobContext::new(&job, None, Seniority::Mid)
    }

    #[test]
    fn test_role_bucket_detection() {
        assert_eq!(RoleBucket::detect("Senior Data Scientist", ""), RoleBucket::DataScientist);
        assert_eq!(RoleBucket::detect("ML Engineer", ""), RoleBucket::DataScientist);
        assert_eq!(RoleBucket::detect("Software Engineer", ""), RoleBucket::SoftwareEngineer);
        assert_eq!(RoleBucket::detect("iOS Developer", ""), RoleBucket::SoftwareEngineer);
        assert_eq!(RoleBucket::detect("Product Manager", ""), RoleBucket::Default);
        assert_eq!(
            RoleBucket::detect("Analyst", "You will work with our data scientist team"),
            RoleBucket::DataScientist
        );
    }

    #[test]
    fn test_every_bucket_yields_three_per_type() {
        for title in ["Software Engineer", "Data Scientist", "Product Manager"] {
            let questions = generate_questions(&resume(), &context(title));
            assert_eq!(questions.len(), 9, "{title}");
            for question_type in [QuestionType::Technical, QuestionType::Behavioral, QuestionType::SystemDesign] {
                assert_eq!(of_type(&questions, question_type).len(), 3, "{title}");
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_questions(&resume(), &context("Software Engineer"));
        let b = generate_questions(&resume(), &context("Software Engineer"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_placeholders_substituted() {
        let questions = generate_questions(&resume(), &context("Software Engineer"));
        for q in &questions {
            assert!(!q.title.contains('{'), "unsubstituted title: {}", q.title);
            for f in &q.follow_ups {
                assert!(!f.contains('{'), "unsubstituted follow-up: {f}");
            }
        }
        assert!(questions[0].title.contains("Python"));
        assert!(questions[1].title.contains("\"Trip Planner\""));
        assert_eq!(questions[0].id, "1");
        assert_eq!(questions[8].id, "9");
        assert_eq!(questions[0].difficulty, Seniority::Mid);
    }

    #[test]
    fn test_secondary_tech_placeholder() {
        let questions = generate_questions(&resume(), &context("Software Engineer"));
        assert_eq!(questions[0].follow_ups[1], "How would the approach change for a Go service?");

        let mut single = resume();
        single.technical_skills.programming_languages = vec!["Rust".to_string()];
        assert_eq!(secondary_tech(&single), "React");
        assert_eq!(secondary_tech(&ResumeData::default()), "complementary technology");
    }

    #[test]
    fn test_placeholders_default_for_empty_resume() {
        let questions = generate_questions(&ResumeData::default(), &context("Product Manager"));
        assert!(questions[0].title.contains("your most recent project"));
        assert!(questions.iter().all(|q| !q.title.contains('{')));
        assert!(questions.iter().all(|q| !q.talking_points.is_empty()));
    }

    #[test]
    fn test_talking_points_by_type() {
        let tech = talking_points(&resume(), QuestionType::Technical);
        assert!(tech.contains("Python and Go"));
        assert!(tech.contains("\"Trip Planner\" project which used React and Node.js"));
        let behavioral = talking_points(&resume(), QuestionType::Behavioral);
        assert!(behavioral.starts_with("Draw examples from your 3 years as a Full Stack Developer"));
    }

    #[test]
    fn test_question_type_serializes_kebab_case() {
        let value = serde_json::to_value(QuestionType::SystemDesign).unwrap();
        assert_eq!(value, "system-design");
        let q = &generate_questions(&resume(), &context("Software Engineer"))[0];
        let value = serde_json::to_value(q).unwrap();
        assert_eq!(value["type"], "technical");
        assert_eq!(value["difficulty"], "mid");
        assert!(value.get("followUps").is_some());
    }
}
