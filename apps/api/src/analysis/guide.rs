//! Guide Assembler: folds every upstream result into the comprehensive
//! guide view-model plus the short final analysis. Pure: no error paths.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::match_scorer::MatchResult;
use crate::analysis::questions::{of_type, Question, QuestionType};
use crate::models::job::{JobContext, JobData};
use crate::models::resume::{ResumeData, Seniority};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveGuide {
    pub title: String,
    pub personalized_for: String,
    pub target_role: String,
    pub target_company: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub match_score: String,
    pub introduction: Introduction,
    pub interview_process: InterviewProcess,
    pub questions: GuideQuestions,
    pub preparation: Preparation,
    pub talking_points: Vec<String>,
    pub faqs: Faqs,
    pub conclusion: Conclusion,
    pub stats: GuideStats,
    pub metadata: GuideMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Introduction {
    pub role_overview: String,
    pub culture: String,
    pub why_this_role: String,
    pub key_strengths: Vec<String>,
    pub salary_range: String,
    pub remote_policy: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewProcess {
    pub diagram: &'static str,
    pub stages: Vec<InterviewStage>,
    pub level_differences: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewStage {
    pub name: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
}

/// `case_study` mirrors `system_design`; the frontend reads either key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideQuestions {
    pub technical: Vec<Question>,
    pub behavioral: Vec<Question>,
    pub case_study: Vec<Question>,
    pub system_design: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preparation {
    pub tips: Vec<Tip>,
    pub study_plan: String,
    pub mock_interviews: String,
    pub technical_prep: String,
    pub behavioral_prep: String,
    pub project_examples: Vec<ProjectExample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tip {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectExample {
    pub title: String,
    pub technologies: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faqs {
    pub salary: String,
    pub experiences: &'static str,
    pub job_postings: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Conclusion {
    pub summary: String,
    pub resources: BTreeMap<&'static str, Resource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub title: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideStats {
    pub total_questions: usize,
    pub technical_count: usize,
    pub behavioral_count: usize,
    pub case_study_count: usize,
    pub preparation_tips: usize,
    pub resource_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideMetadata {
    pub generated_at: DateTime<Utc>,
    pub personalized_for: String,
    pub target_role: String,
    pub target_company: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalAnalysis {
    pub overall_match: u8,
    pub skills_breakdown: SkillsBreakdown,
    pub salary_insights: SalaryInsights,
    pub interview_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillsBreakdown {
    pub technical: u8,
    pub experience: u8,
    pub education: u8,
    pub culture: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryInsights {
    pub range: SalaryRange,
    pub median: &'static str,
    pub percentile: &'static str,
    pub tip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryRange {
    pub min: &'static str,
    pub max: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Static copy
// ────────────────────────────────────────────────────────────────────────────

const PROCESS_DIAGRAM: &str =
    "The interview process typically follows these stages, designed to assess both technical skills and cultural fit:";

const STAGES: [InterviewStage; 5] = [
    InterviewStage {
        name: "Phone Screen",
        duration: "30 min",
        description: "Technical discussion and background review with a hiring manager or technical lead",
    },
    InterviewStage {
        name: "Technical Interview",
        duration: "60 min",
        description: "Coding challenges and algorithm questions relevant to the role",
    },
    InterviewStage {
        name: "System Design",
        duration: "45 min",
        description: "Architecture and design discussion for larger scale problems",
    },
    InterviewStage {
        name: "Behavioral Interview",
        duration: "45 min",
        description: "Culture fit, leadership scenarios and team collaboration",
    },
    InterviewStage {
        name: "Final Round",
        duration: "30 min",
        description: "Meet the team, ask questions and final evaluation",
    },
];

const FAQ_EXPERIENCES: &str = "Research interview experiences on Glassdoor, Blind and LeetCode Discuss for company-specific insights. \
    Look for recent posts about the specific role and team to understand current interview trends, \
    and note whether the process is virtual or in-person.";

const FAQ_JOB_POSTINGS: &str = "Check LinkedIn, Indeed and the company career page for similar roles. \
    Compare required and preferred qualifications to decide which skills to emphasise, \
    and look for technologies that recur across postings.";

fn resources() -> BTreeMap<&'static str, Resource> {
    BTreeMap::from([
        (
            "successStory",
            Resource {
                title: "Interview Success Stories",
                link: "https://www.glassdoor.com/Interview/index.htm",
            },
        ),
        (
            "questionList",
            Resource {
                title: "Technical Interview Questions",
                link: "https://leetcode.com/discuss/interview-question",
            },
        ),
        (
            "learningPath",
            Resource {
                title: "System Design Interview Prep",
                link: "https://github.com/donnemartin/system-design-primer",
            },
        ),
    ])
}

/// Salary band keyed by the candidate's experience bucket: (FAQ text, min, median, max).
fn salary_band(seniority: Seniority) -> (&'static str, &'static str, &'static str, &'static str) {
    match seniority {
        Seniority::Junior => ("$75,000 - 105,000", "75k", "90k", "105k"),
        Seniority::Mid => ("$95,000 - 135,000", "95k", "115k", "135k"),
        Seniority::Senior => ("$120,000 - 180,000", "120k", "150k", "180k"),
    }
}

fn level_description(level: Seniority) -> &'static str {
    match level {
        Seniority::Junior => "**Entry Level (0-2 years):** Focus on coding fundamentals, basic algorithms and eagerness to learn. \
            System design may be simplified or skipped.",
        Seniority::Mid => "**Mid Level (3-5 years):** Expect complex coding problems, some system design and questions on project ownership. \
            Show independent problem-solving and that you can guide junior developers.",
        Seniority::Senior => "**Senior Level (5+ years):** Expect deep system design, mentorship and strategic thinking. \
            You will be asked about architecture decisions and leading through ambiguity.",
    }
}

fn level_note(candidate: Seniority, target: Seniority, years: u32) -> String {
    use Seniority::*;
    match (candidate, target) {
        (c, t) if c == t => format!(
            " Your {years} years of experience aligns well with this {}-level role.",
            t.as_str()
        ),
        (Junior, Mid) => format!(
            " Your {years} years places you at entry level, so show growth potential, strong fundamentals and readiness for mid-level ownership."
        ),
        (Junior, Senior) => format!(
            " Your {years} years is a significant gap for a senior role. Lead with exceptional projects, rapid learning and any leadership you have shown."
        ),
        (Mid, Senior) => format!(
            " Your {years} years places you at mid level, so emphasise leadership, system design thinking and mentoring to meet senior expectations."
        ),
        (Mid, Junior) => format!(
            " Your {years} years exceeds this entry-level role. Show enthusiasm for the scope while highlighting how you raise the bar for the team."
        ),
        (Senior, Junior) => format!(
            " Your {years} years significantly exceeds entry-level requirements. Highlight mentoring and strategic value while showing genuine interest in the role."
        ),
        (Senior, Mid) => format!(
            " Your {years} years gives you an advantage for this mid-level role. Highlight mentoring and strategic contributions while showing you can work effectively at this level."
        ),
        _ => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assembly
// ────────────────────────────────────────────────────────────────────────────

/// Joins the first `n` items, or returns `fallback` for an empty list.
fn first_n(items: &[String], n: usize, sep: &str, fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.iter().take(n).cloned().collect::<Vec<_>>().join(sep)
    }
}

/// Compact score summary shown next to the guide.
pub fn final_analysis(resume: &ResumeData, match_result: &MatchResult) -> FinalAnalysis {
    let langs = first_n(&resume.technical_skills.programming_languages, 2, " and ", "your core technologies");
    let (_, min, median, max) = salary_band(resume.seniority());
    let degree = if resume.has_education() {
        format!(" and {} background", resume.education.degree)
    } else {
        String::new()
    };
    let role = if resume.current_role.is_empty() {
        "engineer"
    } else {
        resume.current_role.as_str()
    };

    FinalAnalysis {
        overall_match: match_result.overall_match,
        skills_breakdown: SkillsBreakdown {
            technical: match_result.skills_match,
            experience: match_result.experience_match,
            education: match_result.education_match,
            culture: 85,
        },
        salary_insights: SalaryInsights {
            range: SalaryRange { min, max },
            median,
            percentile: "75th",
            tip: format!(
                "Based on your {} years of experience{degree}.",
                resume.experience_years
            ),
        },
        interview_tips: vec![
            format!("Highlight your experience with {langs}."),
            format!("Prepare examples from your {} projects.", resume.stats.total_projects),
            format!("Emphasize your background as a {role}."),
        ],
    }
}

pub fn assemble_guide(
    resume: &ResumeData,
    job: &JobData,
    context: &JobContext,
    match_result: &MatchResult,
    questions: &[Question],
    generated_at: DateTime<Utc>,
) -> ComprehensiveGuide {
    let skills = &resume.technical_skills;
    let seniority = resume.seniority();
    let years = resume.experience_years;
    let langs_two = first_n(&skills.programming_languages, 2, " and ", "your core technologies");
    let langs_all = first_n(&skills.programming_languages, usize::MAX, ", ", "your core technologies");
    let frameworks_two = first_n(&skills.frameworks, 2, " and ", "modern frameworks");
    let degree = if resume.has_education() {
        resume.education.degree.as_str()
    } else {
        "academic"
    };
    let role = context.role.as_str();
    let company = context.company.as_str();
    let location = job.location_name();
    let projects = resume.stats.total_projects;

    let technical = of_type(questions, QuestionType::Technical);
    let behavioral = of_type(questions, QuestionType::Behavioral);
    let system_design = of_type(questions, QuestionType::SystemDesign);

    let introduction = Introduction {
        role_overview: format!(
            "This {role} position at {company}{} aligns well with your background as a {}. \
             With {years} years of experience in {langs_two}, you bring valuable technical expertise to this {}.",
            location.map(|l| format!(" in {l}")).unwrap_or_default(),
            if resume.current_role.is_empty() { "engineer" } else { resume.current_role.as_str() },
            job.experience_level_text()
                .map(|level| format!("{} opportunity", level.to_lowercase()))
                .unwrap_or_else(|| "opportunity".to_string()),
        ),
        culture: format!(
            "{company} is looking for a {role} who values collaboration, continuous learning and technical excellence. \
             Your background in {frameworks_two} shows alignment with modern development practices."
        ),
        why_this_role: format!(
            "Your background in {langs_all} makes you a strong candidate for this {role}. {}\
             The role lets you grow in areas like {}. With your {degree} background and {projects} project portfolio, \
             you are well positioned to contribute immediately.",
            if job.requirements.is_empty() {
                String::new()
            } else {
                format!(
                    "The position asks for {}, which aligns with your expertise. ",
                    first_n(&job.requirements, 3, ", ", "")
                )
            },
            match_result.recommended_focus.join(" and "),
        ),
        key_strengths: skills.programming_languages.iter().take(3).cloned().collect(),
        salary_range: job
            .salary_text()
            .unwrap_or("Competitive compensation package")
            .to_string(),
        remote_policy: match location {
            Some(l) if l.to_lowercase().contains("remote") => "Remote work available".to_string(),
            Some(l) => format!("Based in {l}"),
            None => "Location details to be confirmed".to_string(),
        },
    };

    let target_level = context.target_level.unwrap_or(Seniority::Mid);
    let interview_process = InterviewProcess {
        diagram: PROCESS_DIAGRAM,
        stages: STAGES.to_vec(),
        level_differences: format!(
            "{}{}",
            level_description(target_level),
            level_note(seniority, target_level, years)
        ),
    };

    let top_titles: Vec<String> = resume.projects.iter().take(2).map(|p| p.title.clone()).collect();
    let preparation = Preparation {
        tips: vec![
            Tip {
                title: "Technical Preparation".to_string(),
                description: format!(
                    "Focus on {langs_all} fundamentals and practise coding problems daily. \
                     Review the data structures and algorithms expected at the {} level.",
                    seniority.as_str()
                ),
            },
            Tip {
                title: "System Design Study".to_string(),
                description: "Study scalable architectures, database design and service boundaries. \
                    Practise explaining complex systems clearly and concisely."
                    .to_string(),
            },
            Tip {
                title: "Behavioral Stories".to_string(),
                description: format!(
                    "Prepare STAR examples from your {projects} projects, covering leadership, problem-solving and collaboration."
                ),
            },
            Tip {
                title: "Company Research".to_string(),
                description: format!(
                    "Research {company}'s tech stack, recent news and engineering culture, and map them to your experience."
                ),
            },
        ],
        study_plan: format!(
            "**Week 1-2:** Review {langs_two} fundamentals and practise 2-3 coding problems daily. \
             **Week 3:** Focus on system design and whiteboarding. \
             **Week 4:** Mock interviews and behavioral practice. \
             **Final Week:** Research {company} and review your {projects} key projects."
        ),
        mock_interviews: format!(
            "Schedule practice sessions with peers or a mock-interview platform. Explain your thought process out loud and practise follow-up questions.{}",
            if top_titles.is_empty() {
                String::new()
            } else {
                format!(" Practise presenting {} concisely.", top_titles.join(" and "))
            }
        ),
        technical_prep: format!("Focus on {langs_all} and system design concepts relevant to {role}."),
        behavioral_prep: format!(
            "Prepare STAR examples from your {projects} projects, emphasising leadership, problem-solving and collaboration."
        ),
        project_examples: resume
            .projects
            .iter()
            .map(|p| {
                let tech = first_n(&p.technologies, usize::MAX, ", ", "your chosen stack");
                ProjectExample {
                    title: p.title.clone(),
                    technologies: p.technologies.clone(),
                    highlights: vec![
                        format!("Built with {tech}"),
                        format!(
                            "Demonstrates expertise in {}",
                            first_n(&p.technologies, 2, " and ", "end-to-end delivery")
                        ),
                        "Showcases problem-solving and technical implementation skills".to_string(),
                    ],
                }
            })
            .collect(),
    };

    let mut talking_points = vec![format!("{years} years of hands-on experience in {langs_two}")];
    if !skills.frameworks.is_empty() {
        talking_points.push(format!(
            "Expertise in modern technologies including {}",
            first_n(&skills.frameworks, 2, ", ", "")
        ));
    }
    if resume.has_education() {
        talking_points.push(format!(
            "{} in {} providing a strong foundation",
            resume.education.degree,
            if resume.education.field.is_empty() { "a technical field" } else { resume.education.field.as_str() }
        ));
    }
    talking_points.push(format!(
        "Track record of {projects} projects demonstrating end-to-end delivery"
    ));
    talking_points.push("Strong problem-solving skills evidenced by a diverse project portfolio".to_string());

    let (band, ..) = salary_band(seniority);
    let salary = match job.salary_text() {
        Some(s) => s.to_string(),
        None => format!(
            "Based on your {years} years of experience, you can expect a salary range of {band}. \
             Your expertise in {langs_two} puts you in a competitive position. \
             Location, company size and role scope will influence the final offer, so weigh the total package including equity and benefits."
        ),
    };

    let conclusion = Conclusion {
        summary: format!(
            "You are well positioned for this {role} with {years} years of experience and a strong background in {langs_two}. \
             Focus your preparation on technical depth, compelling project examples and your ability to grow with the role. \
             The {}% compatibility score reflects your alignment with the position requirements.",
            match_result.overall_match
        ),
        resources: resources(),
    };

    let stats = GuideStats {
        total_questions: technical.len() + behavioral.len() + system_design.len(),
        technical_count: technical.len(),
        behavioral_count: behavioral.len(),
        case_study_count: system_design.len(),
        preparation_tips: preparation.tips.len(),
        resource_count: conclusion.resources.len(),
    };

    ComprehensiveGuide {
        title: format!("{role} Interview Guide - {company}"),
        personalized_for: resume.name.clone(),
        target_role: role.to_string(),
        target_company: company.to_string(),
        location: location.unwrap_or("Location TBD").to_string(),
        job_type: job.job_type_text().unwrap_or("Full-time").to_string(),
        experience_level: job
            .experience_level_text()
            .unwrap_or(seniority.level_label())
            .to_string(),
        match_score: format!("{}%", match_result.overall_match),
        introduction,
        interview_process,
        questions: GuideQuestions {
            technical,
            behavioral,
            case_study: system_design.clone(),
            system_design,
        },
        preparation,
        talking_points,
        faqs: Faqs {
            salary,
            experiences: FAQ_EXPERIENCES,
            job_postings: FAQ_JOB_POSTINGS,
        },
        conclusion,
        stats,
        metadata: GuideMetadata {
            generated_at,
            personalized_for: resume.name.clone(),
            target_role: role.to_string(),
            target_company: company.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::match_scorer::fallback_match;
    use crate::analysis::questions::generate_questions;
    use crate::models::resume::{Education, Project, TechnicalSkills};

    fn resume(years: u32) -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            current_role: "Backend Developer".to_string(),
            experience_years: years,
            education: Education {
                degree: "Bachelor's".to_string(),
                field: "Computer Science".to_string(),
            },
            technical_skills: TechnicalSkills {
                programming_languages: vec!["Python".to_string(), "Go".to_string()],
                ..Default::default()
            },
            projects: vec![Project {
                title: "Ledger".to_string(),
                technologies: vec!["Go".to_string()],
            }],
            ..Default::default()
        }
        .normalize()
    }

    fn build(resume: &ResumeData, job: &JobData) -> ComprehensiveGuide {
        let context = JobContext::new(job, None, resume.seniority());
        let questions = generate_questions(resume, &context);
        let match_result = fallback_match(resume);
        assemble_guide(resume, job, &context, &match_result, &questions, Utc::now())
    }

    #[test]
    fn test_header_defaults() {
        let guide = build(&resume(3), &JobData::default());
        assert_eq!(guide.title, "Software Engineer Interview Guide - Target Company");
        assert_eq!(guide.location, "Location TBD");
        assert_eq!(guide.job_type, "Full-time");
        assert_eq!(guide.experience_level, "Mid Level");
        assert_eq!(guide.match_score, "85%");
        assert_eq!(guide.introduction.remote_policy, "Location details to be confirmed");
        assert_eq!(guide.interview_process.stages.len(), 5);
    }

    #[test]
    fn test_salary_faq_keyed_by_experience_bucket() {
        let job = JobData::default();
        assert!(build(&resume(1), &job).faqs.salary.contains("$75,000 - 105,000"));
        assert!(build(&resume(4), &job).faqs.salary.contains("$95,000 - 135,000"));
        assert!(build(&resume(9), &job).faqs.salary.contains("$120,000 - 180,000"));

        let job = JobData {
            salary: Some("$140k - $160k".to_string()),
            ..Default::default()
        };
        assert_eq!(build(&resume(1), &job).faqs.salary, "$140k - $160k");
    }

    #[test]
    fn test_stats_count_questions_and_resources() {
        let guide = build(&resume(3), &JobData::default());
        assert_eq!(
            guide.stats,
            GuideStats {
                total_questions: 9,
                technical_count: 3,
                behavioral_count: 3,
                case_study_count: 3,
                preparation_tips: 4,
                resource_count: 3,
            }
        );
        assert_eq!(guide.questions.case_study, guide.questions.system_design);
    }

    #[test]
    fn test_level_differences_compare_candidate_and_target() {
        let job = JobData {
            experience_level: Some("Senior".to_string()),
            ..Default::default()
        };
        let text = build(&resume(4), &job).interview_process.level_differences;
        assert!(text.starts_with("**Senior Level"));
        assert!(text.contains("places you at mid level"));

        let text = build(&resume(4), &JobData::default()).interview_process.level_differences;
        assert!(text.contains("aligns well with this mid-level role"));
    }

    #[test]
    fn test_remote_policy_and_serialization() {
        let job = JobData {
            title: Some("Backend Engineer".to_string()),
            company: Some("Acme".to_string()),
            location: Some("Remote, US".to_string()),
            ..Default::default()
        };
        let guide = build(&resume(3), &job);
        assert_eq!(guide.introduction.remote_policy, "Remote work available");
        let value = serde_json::to_value(&guide).unwrap();
        assert_eq!(value["targetCompany"], "Acme");
        assert!(value["questions"].get("caseStudy").is_some());
        assert!(value["conclusion"]["resources"].get("learningPath").is_some());
        assert!(value["metadata"].get("generatedAt").is_some());
    }

    #[test]
    fn test_final_analysis_fixed_culture_and_band() {
        let r = resume(7);
        let analysis = final_analysis(&r, &fallback_match(&r));
        assert_eq!(analysis.skills_breakdown.culture, 85);
        assert_eq!(analysis.salary_insights.range.min, "120k");
        assert_eq!(analysis.interview_tips.len(), 3);
        assert_eq!(analysis.interview_tips[0], "Highlight your experience with Python and Go.");
    }
}
