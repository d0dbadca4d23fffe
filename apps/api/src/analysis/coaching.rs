//! Premium coaching: questions to ask, positioning, personal brand and
//! negotiation strategy, keyed by seniority and a simple archetype rule.

use serde::Serialize;

use crate::analysis::questions::RoleBucket;
use crate::models::job::JobContext;
use crate::models::resume::{ResumeData, Seniority};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumCoaching {
    pub smart_questions: SmartQuestions,
    pub competitive_advantage: CompetitiveAdvantage,
    pub personal_branding: PersonalBranding,
    pub advanced_strategies: AdvancedStrategies,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartQuestions {
    pub strategic_questions: Vec<QuestionCategory>,
    pub closing_questions: Vec<String>,
    pub red_flags: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionCategory {
    pub category: &'static str,
    pub purpose: &'static str,
    pub timing: &'static str,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveAdvantage {
    pub unique_value_proposition: UniqueValueProposition,
    pub positioning: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValueProposition {
    pub headline: String,
    pub core_strengths: Vec<String>,
    pub differentiators: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBranding {
    pub brand_archetype: BrandArchetype,
    pub elevator_pitch: String,
    pub signature_stories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandArchetype {
    pub primary_archetype: &'static str,
    pub description: &'static str,
    pub key_traits: &'static [&'static str],
    pub communication_style: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedStrategies {
    pub negotiation: Vec<String>,
    pub follow_up: &'static [&'static str],
    pub seniority_focus: &'static str,
}

/// Archetype rule: leader by tenure, builder by portfolio, innovator by
/// breadth, expert otherwise.
pub fn brand_archetype(resume: &ResumeData) -> BrandArchetype {
    if resume.experience_years >= 5 {
        BrandArchetype {
            primary_archetype: "The Leader",
            description: "An experienced professional who guides teams and sets technical direction",
            key_traits: &["Strategic thinking", "Mentorship", "Ownership"],
            communication_style: "Confident and vision-oriented, framing work in terms of team and business outcomes",
        }
    } else if resume.stats.total_projects >= 5 {
        BrandArchetype {
            primary_archetype: "The Builder",
            description: "A hands-on creator with a track record of shipping working software",
            key_traits: &["Execution", "Pragmatism", "Delivery"],
            communication_style: "Concrete and demo-driven, leading with what you built and how it works",
        }
    } else if resume.stats.total_technologies >= 4 {
        BrandArchetype {
            primary_archetype: "The Innovator",
            description: "A versatile technologist who picks up new tools and applies them creatively",
            key_traits: &["Curiosity", "Adaptability", "Breadth"],
            communication_style: "Energetic and exploratory, connecting ideas across technologies",
        }
    } else {
        BrandArchetype {
            primary_archetype: "The Expert",
            description: "A focused specialist with depth in a core area",
            key_traits: &["Depth", "Precision", "Reliability"],
            communication_style: "Clear and precise, explaining trade-offs from first principles",
        }
    }
}

fn strategic_questions(context: &JobContext, seniority: Seniority) -> Vec<QuestionCategory> {
    let company = context.company.as_str();
    let role = context.role.as_str();

    let mut categories = vec![
        QuestionCategory {
            category: "Role & Expectations",
            purpose: "Understand how success is measured",
            timing: "Early in the conversation",
            questions: vec![
                format!("What does success look like for the {role} in the first 90 days?"),
                "What are the biggest challenges the team is facing right now?".to_string(),
            ],
        },
        QuestionCategory {
            category: "Team & Culture",
            purpose: "Assess collaboration and fit",
            timing: "Mid-interview or with team members",
            questions: vec![
                "How does the team make technical decisions?".to_string(),
                format!("What do people enjoy most about working at {company}?"),
            ],
        },
    ];

    let (category, purpose, questions) = match seniority {
        Seniority::Junior => (
            "Growth & Learning",
            "Show commitment to development",
            vec![
                "What does mentorship look like for new engineers?".to_string(),
                "How are code reviews and feedback handled?".to_string(),
            ],
        ),
        Seniority::Mid => (
            "Ownership & Impact",
            "Signal readiness for larger scope",
            vec![
                "How much ownership do engineers have over features end to end?".to_string(),
                "What does the path to senior look like here?".to_string(),
            ],
        ),
        Seniority::Senior => (
            "Strategy & Leadership",
            "Demonstrate strategic thinking",
            vec![
                format!("Where do you see {company}'s technical strategy going in the next two years?"),
                "How do senior engineers influence the roadmap?".to_string(),
            ],
        ),
    };
    categories.push(QuestionCategory {
        category,
        purpose,
        timing: "With the hiring manager",
        questions,
    });
    categories
}

fn core_strengths(resume: &ResumeData) -> Vec<String> {
    let skills = &resume.technical_skills;
    let mut strengths = Vec::new();
    if !skills.programming_languages.is_empty() {
        let langs: Vec<&str> = skills.programming_languages.iter().take(3).map(String::as_str).collect();
        strengths.push(format!("Proficiency in {}", langs.join(", ")));
    }
    if !skills.frameworks.is_empty() {
        let frameworks: Vec<&str> = skills.frameworks.iter().take(2).map(String::as_str).collect();
        strengths.push(format!("Hands-on experience with {}", frameworks.join(" and ")));
    }
    if resume.stats.total_projects > 0 {
        strengths.push(format!(
            "Portfolio of {} delivered projects",
            resume.stats.total_projects
        ));
    }
    if resume.has_education() {
        strengths.push(format!("{} foundation", resume.education.degree));
    }
    if strengths.is_empty() {
        strengths.push("Strong problem-solving fundamentals".to_string());
    }
    strengths
}

/// Builds coaching copy for the candidate at `seniority`.
pub fn generate_premium_coaching(
    resume: &ResumeData,
    context: &JobContext,
    seniority: Seniority,
) -> PremiumCoaching {
    let role = context.role.as_str();
    let company = context.company.as_str();
    let years = resume.experience_years;
    let current_role = if resume.current_role.is_empty() {
        "engineer"
    } else {
        resume.current_role.as_str()
    };
    let primary = resume.primary_tech().unwrap_or("modern technologies");
    let archetype = brand_archetype(resume);

    let domain = match RoleBucket::for_context(context) {
        RoleBucket::DataScientist => "turning data into product decisions",
        RoleBucket::SoftwareEngineer => "building reliable software",
        RoleBucket::Default => "delivering results",
    };

    let mut differentiators = vec![format!("{years} years as a {current_role} focused on {domain}")];
    if let Some(project) = resume.top_project() {
        differentiators.push(format!("Shipped {} end to end", project.title));
    }
    differentiators.push(format!(
        "Working knowledge of {} technologies",
        resume.stats.total_technologies
    ));

    let signature_stories = resume
        .projects
        .iter()
        .take(3)
        .map(|p| {
            if p.technologies.is_empty() {
                format!("How I built {}", p.title)
            } else {
                format!("How I built {} with {}", p.title, p.technologies.join(", "))
            }
        })
        .collect::<Vec<_>>();

    let seniority_focus = match seniority {
        Seniority::Junior => "Emphasize learning velocity, fundamentals and coachability.",
        Seniority::Mid => "Emphasize ownership, independent delivery and growing influence.",
        Seniority::Senior => "Emphasize architecture, mentoring and business impact.",
    };

    PremiumCoaching {
        smart_questions: SmartQuestions {
            strategic_questions: strategic_questions(context, seniority),
            closing_questions: vec![
                "Is there anything in my background that gives you pause?".to_string(),
                "What are the next steps in the process?".to_string(),
                format!("What would make someone stand out as a {role} at {company}?"),
            ],
            red_flags: &[
                "Asking about time off before an offer",
                "Questions answered on the company website",
                "Only asking about compensation",
            ],
        },
        competitive_advantage: CompetitiveAdvantage {
            unique_value_proposition: UniqueValueProposition {
                headline: format!("{current_role} with {years} years of {primary} experience, ready to grow as a {role}"),
                core_strengths: core_strengths(resume),
                differentiators,
            },
            positioning: format!(
                "Lead with the {} archetype and bring {primary} depth to {company}'s {role} team.",
                archetype.primary_archetype.trim_start_matches("The ")
            ),
        },
        personal_branding: PersonalBranding {
            elevator_pitch: format!(
                "I'm {}, a {current_role} with {years} years of experience in {primary}. \
                 I enjoy {domain}, and I'm excited about bringing that to the {role} role at {company}.",
                resume.name
            ),
            brand_archetype: archetype,
            signature_stories,
        },
        advanced_strategies: AdvancedStrategies {
            negotiation: vec![
                "Let the employer name a number first when possible".to_string(),
                "Negotiate the total package, including equity, bonus and learning budget".to_string(),
                format!("Anchor on market data for a {} {role}", seniority.level_label().to_lowercase()),
            ],
            follow_up: &[
                "Send a personalized thank you note within 24 hours",
                "Reference a specific topic from the conversation",
                "Follow up politely after a week of silence",
            ],
            seniority_focus,
        },
    }
}
