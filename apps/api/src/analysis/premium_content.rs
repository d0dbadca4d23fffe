//! Premium preparation plan: timelines, company research, STAR coaching,
//! success metrics and a day-of checklist. Pure and deterministic.

use serde::Serialize;

use crate::analysis::questions::{of_type, Question, QuestionType, RoleBucket};
use crate::models::job::JobContext;
use crate::models::resume::{ResumeData, Seniority};

type StaticList = &'static [&'static str];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPreparationPlan {
    pub timeline_options: TimelineOptions,
    pub company_research: CompanyResearchGuide,
    pub star_method_guide: StarMethodGuide,
    pub success_metrics: SuccessMetrics,
    pub day_of_preparation: DayOfPreparation,
}

// ────────────────────────────────────────────────────────────────────────────
// Timelines
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineOptions {
    pub one_week: PreparationTimeline,
    pub two_weeks: PreparationTimeline,
    pub one_month: PreparationTimeline,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparationTimeline {
    pub duration: &'static str,
    pub daily_commitment: String,
    pub phases: Vec<Phase>,
    pub weekly_milestones: StaticList,
    pub final_week_intensification: StaticList,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub phase: &'static str,
    pub duration: &'static str,
    pub focus: &'static str,
    pub activities: Vec<String>,
    pub deliverables: StaticList,
    pub success_criteria: Vec<String>,
}

fn daily_commitment(level: Seniority) -> &'static str {
    match level {
        Seniority::Junior => "2-3 hours",
        Seniority::Mid => "1.5-2 hours",
        Seniority::Senior => "1-1.5 hours",
    }
}

fn bucket_label(bucket: RoleBucket) -> &'static str {
    match bucket {
        RoleBucket::DataScientist => "data science",
        RoleBucket::SoftwareEngineer => "software engineering",
        RoleBucket::Default => "role",
    }
}

fn owned(items: StaticList) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn timelines(resume: &ResumeData, level: Seniority, bucket: RoleBucket) -> TimelineOptions {
    let base = daily_commitment(level);
    let primary = resume.primary_tech().unwrap_or("core technology");
    let languages = if resume.technical_skills.programming_languages.is_empty() {
        "your core languages".to_string()
    } else {
        resume.technical_skills.programming_languages.join(", ")
    };

    TimelineOptions {
        one_week: PreparationTimeline {
            duration: "7 days",
            daily_commitment: format!("{base} daily (intensive)"),
            phases: vec![
                Phase {
                    phase: "Foundation (Days 1-2)",
                    duration: "2 days",
                    focus: "Core preparation and research",
                    activities: owned(&[
                        "Complete company research deep-dive",
                        "Review and practice top 5 technical questions",
                        "Prepare 3 STAR method stories",
                        "Set up interview environment and technology",
                    ]),
                    deliverables: &[
                        "Company research document",
                        "Technical question response notes",
                        "STAR story bank (3 stories)",
                    ],
                    success_criteria: owned(&[
                        "Can articulate company value proposition",
                        "Confident with core technical concepts",
                    ]),
                },
                Phase {
                    phase: "Intensive Practice (Days 3-5)",
                    duration: "3 days",
                    focus: "Mock interviews and refinement",
                    activities: vec![
                        "Daily mock interview sessions (45 min each)".to_string(),
                        "Record and review responses".to_string(),
                        format!("Practice {primary} specific questions"),
                        "Refine behavioral stories based on feedback".to_string(),
                    ],
                    deliverables: &["Mock interview recordings", "Refined question responses"],
                    success_criteria: owned(&[
                        "Smooth delivery of technical explanations",
                        "Natural storytelling flow",
                    ]),
                },
                Phase {
                    phase: "Final Polish (Days 6-7)",
                    duration: "2 days",
                    focus: "Confidence building and final preparation",
                    activities: owned(&[
                        "Light review of key materials",
                        "Final mock interview with timer",
                        "Prepare questions for interviewer",
                    ]),
                    deliverables: &["Questions for interviewer list", "Day-of timeline"],
                    success_criteria: owned(&["Quick recall of key information", "Ready for any question type"]),
                },
            ],
            weekly_milestones: &[
                "Day 2: Research foundation complete",
                "Day 4: Mock interview confidence achieved",
                "Day 6: Final polish and readiness confirmed",
            ],
            final_week_intensification: &[
                "Increase mock interview frequency",
                "Focus on weak areas identified",
                "Maintain energy while avoiding burnout",
            ],
        },
        two_weeks: PreparationTimeline {
            duration: "14 days",
            daily_commitment: format!("{base} daily (balanced)"),
            phases: vec![
                Phase {
                    phase: "Research & Foundation (Days 1-4)",
                    duration: "4 days",
                    focus: "Comprehensive research and baseline preparation",
                    activities: owned(&[
                        "Deep company and role research",
                        "Technical skills assessment and gap analysis",
                        "Initial STAR story development",
                    ]),
                    deliverables: &["Company profile", "Skills gap analysis", "Initial STAR story bank (5 stories)"],
                    success_criteria: owned(&["Clear understanding of technical requirements"]),
                },
                Phase {
                    phase: "Skill Building (Days 5-10)",
                    duration: "6 days",
                    focus: "Technical and behavioral skill development",
                    activities: owned(&[
                        "Daily technical question practice",
                        "STAR method story refinement",
                        "Mock interview sessions (every other day)",
                    ]),
                    deliverables: &["Technical question response library", "Mock interview feedback reports"],
                    success_criteria: vec![
                        format!("Confident with {} specific questions", bucket_label(bucket)),
                        "Natural behavioral story delivery".to_string(),
                    ],
                },
                Phase {
                    phase: "Mastery & Polish (Days 11-14)",
                    duration: "4 days",
                    focus: "Performance optimization and confidence building",
                    activities: owned(&[
                        "Advanced mock interviews with pressure",
                        "Edge case question preparation",
                        "Personal value proposition refinement",
                    ]),
                    deliverables: &["Personal value proposition statement", "Final interview day plan"],
                    success_criteria: owned(&["Clear articulation of unique value"]),
                },
            ],
            weekly_milestones: &[
                "Week 1: Foundation and research mastery",
                "Week 2: Performance excellence and confidence",
            ],
            final_week_intensification: &[
                "Daily mock interviews with increasing difficulty",
                "Focus on personal brand messaging",
            ],
        },
        one_month: PreparationTimeline {
            duration: "30 days",
            daily_commitment: format!("{base} daily (comprehensive)"),
            phases: vec![
                Phase {
                    phase: "Strategic Foundation (Days 1-8)",
                    duration: "8 days",
                    focus: "Comprehensive research and strategic planning",
                    activities: owned(&[
                        "Industry and company ecosystem analysis",
                        "Role requirements deep-dive",
                        "Personal brand audit",
                    ]),
                    deliverables: &["Industry landscape analysis", "Strategic interview approach plan"],
                    success_criteria: owned(&["Strategic interview narrative developed"]),
                },
                Phase {
                    phase: "Skill Development (Days 9-20)",
                    duration: "12 days",
                    focus: "Comprehensive skill building and practice",
                    activities: vec![
                        format!("Technical skill enhancement in {languages}"),
                        "Advanced STAR method story development".to_string(),
                        "Regular mock interviews with diverse panels".to_string(),
                    ],
                    deliverables: &["STAR story library (10+ stories)", "Mock interview performance log"],
                    success_criteria: owned(&["Consistent high-performance interviews"]),
                },
                Phase {
                    phase: "Excellence & Optimization (Days 21-30)",
                    duration: "10 days",
                    focus: "Performance optimization and competitive edge",
                    activities: owned(&[
                        "Advanced scenario and edge case preparation",
                        "Network activation and insider insights",
                        "Peak performance conditioning",
                    ]),
                    deliverables: &["Network insights and insider tips", "Peak performance routine"],
                    success_criteria: owned(&["Exceptional performance in any scenario"]),
                },
            ],
            weekly_milestones: &[
                "Week 1: Strategic foundation established",
                "Week 2: Core skills developed",
                "Week 3: Advanced competency achieved",
                "Week 4: Competitive edge secured",
            ],
            final_week_intensification: &["Peak performance mock interviews", "Personal brand message perfection"],
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Company research
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Importance {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResearchGuide {
    pub research_areas: Vec<ResearchArea>,
    pub company_specific_prep: CompanySpecificPrep,
    pub networking_strategy: NetworkingStrategy,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchArea {
    pub area: &'static str,
    pub importance: Importance,
    pub time_investment: &'static str,
    pub sources: StaticList,
    pub key_questions: StaticList,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySpecificPrep {
    pub values: StaticList,
    pub recent_news: StaticList,
    pub tech_stack: StaticList,
    pub interview_style: &'static str,
    pub common_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkingStrategy {
    pub linkedin_approach: String,
    pub informational_interviews: StaticList,
    pub insider_tips: StaticList,
}

fn company_research(context: &JobContext, bucket: RoleBucket) -> CompanyResearchGuide {
    let company = context.company.as_str();
    let tech_importance = match bucket {
        RoleBucket::SoftwareEngineer | RoleBucket::DataScientist => Importance::Critical,
        RoleBucket::Default => Importance::High,
    };

    CompanyResearchGuide {
        research_areas: vec![
            ResearchArea {
                area: "Company Mission & Values",
                importance: Importance::Critical,
                time_investment: "45 minutes",
                sources: &["Company website", "Annual reports", "Leadership interviews", "Glassdoor reviews"],
                key_questions: &[
                    "What is the company's core mission and how does it drive decisions?",
                    "How does the company differentiate itself in the market?",
                    "How do they measure success and what metrics matter most?",
                ],
            },
            ResearchArea {
                area: "Recent News & Market Position",
                importance: Importance::High,
                time_investment: "40 minutes",
                sources: &["Google News", "Company blog", "Industry publications", "Press releases"],
                key_questions: &[
                    "What major announcements have they made in the last 6 months?",
                    "Who are their main competitors and how do they compare?",
                ],
            },
            ResearchArea {
                area: "Technology Stack & Innovation",
                importance: tech_importance,
                time_investment: "60 minutes",
                sources: &["Job descriptions", "Engineering blogs", "GitHub repos", "Tech conference talks"],
                key_questions: &[
                    "What technologies does the team use daily?",
                    "How do they approach technical debt and scalability?",
                ],
            },
            ResearchArea {
                area: "Team Culture & Work Environment",
                importance: Importance::High,
                time_investment: "35 minutes",
                sources: &["Glassdoor reviews", "LinkedIn employee posts", "Company culture pages"],
                key_questions: &[
                    "How do teams collaborate and communicate?",
                    "How do they approach professional development?",
                ],
            },
            ResearchArea {
                area: "Leadership & Management Style",
                importance: Importance::Medium,
                time_investment: "30 minutes",
                sources: &["LinkedIn profiles", "Conference talks", "Podcast interviews"],
                key_questions: &["Who are the key leaders and what are their backgrounds?"],
            },
            ResearchArea {
                area: "Financial Health & Growth Trajectory",
                importance: Importance::Medium,
                time_investment: "25 minutes",
                sources: &["Annual reports", "Financial news", "Funding announcements"],
                key_questions: &["What are their revenue streams and business model?"],
            },
        ],
        company_specific_prep: CompanySpecificPrep {
            values: &[
                "Research company core values and prepare 2-3 specific examples of alignment",
                "Prepare stories that demonstrate their principles in your work",
            ],
            recent_news: &[
                "Review the last 6 months of announcements and press releases",
                "Identify growth opportunities, challenges and strategic initiatives",
            ],
            tech_stack: &[
                "Study the technology requirements in the job description",
                "Read the engineering blog, GitHub repos and technical talks",
                "Prepare examples of relevant experience with similar technologies",
            ],
            interview_style: "Research interview experiences on Glassdoor, Blind and LeetCode Discuss. \
                Look for patterns in format, question types and evaluation criteria.",
            common_questions: vec![
                format!("Why do you want to work at {company} specifically?"),
                "How would you contribute to our mission and values?".to_string(),
                "What excites you most about this role and our company?".to_string(),
                "How do you handle challenges and setbacks in a fast-paced environment?".to_string(),
                "What do you know about our recent developments and market position?".to_string(),
            ],
        },
        networking_strategy: NetworkingStrategy {
            linkedin_approach: format!(
                "Connect with current {company} employees in similar roles, engage with company content and ask for informational interviews."
            ),
            informational_interviews: &[
                "Identify 3-5 current employees in similar or adjacent roles",
                "Send personalized connection requests",
                "Follow up with thank you notes and key insights gained",
            ],
            insider_tips: &[
                "Ask what makes someone successful on the team",
                "Learn about mentorship and career development paths",
                "Ask about current team challenges",
            ],
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// STAR method
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarMethodGuide {
    pub framework: StarFramework,
    pub story_bank: StoryBank,
    pub practice_exercises: Vec<PracticeExercise>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarFramework {
    pub situation: StarComponent,
    pub task: StarComponent,
    pub action: StarComponent,
    pub result: StarComponent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarComponent {
    pub definition: &'static str,
    pub time_allocation: &'static str,
    pub key_elements: StaticList,
    pub common_mistakes: StaticList,
    pub examples: Vec<String>,
    pub power_words: StaticList,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBank {
    pub leadership: StoryTemplate,
    pub problem_solving: StoryTemplate,
    pub teamwork: StoryTemplate,
    pub innovation: StoryTemplate,
    pub failure: StoryTemplate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryTemplate {
    pub category: &'static str,
    pub prompt_questions: StaticList,
    pub structure_guide: &'static str,
    pub personalization_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeExercise {
    pub scenario: String,
    pub time_limit: &'static str,
    pub evaluation_criteria: StaticList,
}

const EXERCISE_CRITERIA: StaticList = &[
    "Clear problem definition",
    "Systematic approach to solution",
    "Quantifiable results",
    "Lessons learned and application",
];

fn star_guide(resume: &ResumeData, questions: &[Question]) -> StarMethodGuide {
    let role = if resume.current_role.is_empty() {
        "an engineer"
    } else {
        resume.current_role.as_str()
    };
    let years = resume.experience_years;
    let projects = resume.stats.total_projects;
    let primary = resume.primary_tech().unwrap_or("your main language");
    let top_project = resume
        .top_project()
        .map(|p| p.title.as_str())
        .unwrap_or("a recent project");
    let framework = resume
        .technical_skills
        .frameworks
        .first()
        .map(String::as_str)
        .unwrap_or("the right tools");

    let mut practice_exercises = vec![PracticeExercise {
        scenario: "Technical Challenge Resolution".to_string(),
        time_limit: "3-4 minutes",
        evaluation_criteria: EXERCISE_CRITERIA,
    }];
    practice_exercises.extend(
        of_type(questions, QuestionType::Behavioral)
            .into_iter()
            .map(|q| PracticeExercise {
                scenario: q.title,
                time_limit: "2-3 minutes",
                evaluation_criteria: EXERCISE_CRITERIA,
            }),
    );

    StarMethodGuide {
        framework: StarFramework {
            situation: StarComponent {
                definition: "Set the context and background for your story",
                time_allocation: "20% of response (30-45 seconds)",
                key_elements: &["Specific context", "Key stakeholders", "Timeline and constraints"],
                common_mistakes: &["Too much background detail", "Vague or generic situations"],
                examples: vec![
                    format!("During my role as {role}..."),
                    format!("When our team was tasked with {top_project}..."),
                    format!("In my {years} years of experience, I encountered..."),
                ],
                power_words: &["challenged", "tasked", "faced", "encountered"],
            },
            task: StarComponent {
                definition: "Explain your specific responsibility and what needed to be accomplished",
                time_allocation: "20% of response (30-45 seconds)",
                key_elements: &["Your specific role", "Clear objectives", "Success criteria"],
                common_mistakes: &["Confusing task with actions taken", "Being vague about responsibilities"],
                examples: vec![
                    format!("I needed to ensure that our {primary} implementation..."),
                    "The goal was to improve performance by...".to_string(),
                ],
                power_words: &["responsible", "accountable", "required"],
            },
            action: StarComponent {
                definition: "Describe the specific steps you took to address the situation",
                time_allocation: "50% of response (75-90 seconds)",
                key_elements: &["Actions you personally took", "Decision-making process", "How you overcame obstacles"],
                common_mistakes: &["Using \"we\" instead of \"I\"", "Not showing personal initiative"],
                examples: vec![
                    format!("I developed a solution using {framework}..."),
                    "I collaborated with cross-functional teams to...".to_string(),
                ],
                power_words: &["implemented", "developed", "led", "collaborated"],
            },
            result: StarComponent {
                definition: "Share the outcomes and impact of your actions",
                time_allocation: "10% of response (15-30 seconds)",
                key_elements: &["Quantifiable results", "Impact on team or organization", "Lessons learned"],
                common_mistakes: &["No specific metrics", "Not connecting to business impact"],
                examples: vec![
                    "The solution improved performance by 40%...".to_string(),
                    "The project was delivered 2 weeks ahead of schedule...".to_string(),
                ],
                power_words: &["achieved", "delivered", "improved", "reduced"],
            },
        },
        story_bank: StoryBank {
            leadership: StoryTemplate {
                category: "Leadership & Initiative",
                prompt_questions: &[
                    "When did you lead a project or team?",
                    "Describe a time you took initiative beyond your role",
                ],
                structure_guide: "Focus on your decision-making and how you influenced others",
                personalization_tips: vec![
                    format!("Reference specific projects from your {projects} project portfolio"),
                    format!("Connect to your {years} years of experience"),
                ],
            },
            problem_solving: StoryTemplate {
                category: "Problem Solving & Innovation",
                prompt_questions: &[
                    "Describe a complex technical problem you solved",
                    "How did you approach a challenge with limited resources?",
                ],
                structure_guide: "Emphasize your analytical approach and systematic problem-solving",
                personalization_tips: vec![
                    format!("Use examples from {top_project} or similar projects"),
                    format!("Highlight technical skills in {primary}"),
                ],
            },
            teamwork: StoryTemplate {
                category: "Teamwork & Collaboration",
                prompt_questions: &[
                    "Describe a successful team project you contributed to",
                    "How do you handle conflicts within a team?",
                ],
                structure_guide: "Highlight your communication and conflict resolution",
                personalization_tips: vec![
                    "Reference cross-functional collaboration in your projects".to_string(),
                    format!("Connect to your role as {role}"),
                ],
            },
            innovation: StoryTemplate {
                category: "Innovation & Improvement",
                prompt_questions: &[
                    "Describe a time you improved an existing process",
                    "How did you introduce a new idea or technology?",
                ],
                structure_guide: "Focus on implementation strategy and measurable improvements",
                personalization_tips: vec![format!("Show impact across your {projects} projects")],
            },
            failure: StoryTemplate {
                category: "Learning from Failure",
                prompt_questions: &[
                    "Tell me about a time you failed and what you learned",
                    "Describe a project that didn't go as planned",
                ],
                structure_guide: "Be honest about the failure and focus on lessons learned",
                personalization_tips: vec![format!(
                    "Connect to your professional growth over {years} years"
                )],
            },
        },
        practice_exercises,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metrics and day-of
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessMetrics {
    pub preparation_kpis: Vec<Kpi>,
    pub interview_performance: Vec<PerformanceArea>,
    pub follow_up_metrics: Vec<FollowUp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Kpi {
    pub metric: &'static str,
    pub target: &'static str,
    pub measurement: &'static str,
    pub timeline: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceArea {
    pub area: &'static str,
    pub self_assessment: Vec<String>,
    pub improvement_actions: StaticList,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub action: String,
    pub timing: &'static str,
    pub success_indicators: StaticList,
}

fn success_metrics(resume: &ResumeData, context: &JobContext) -> SuccessMetrics {
    let primary = resume.primary_tech().unwrap_or("your core stack");
    SuccessMetrics {
        preparation_kpis: vec![
            Kpi {
                metric: "Company Research Depth",
                target: "90% confidence in company knowledge",
                measurement: "Self-assessment quiz (20 questions)",
                timeline: "Complete by Day 3 of preparation",
            },
            Kpi {
                metric: "Technical Question Readiness",
                target: "Fluent responses to top 10 questions",
                measurement: "Mock interview performance scores",
                timeline: "Achieve by 70% of preparation timeline",
            },
            Kpi {
                metric: "STAR Story Quality",
                target: "5 polished stories across different themes",
                measurement: "Story structure and impact assessment",
                timeline: "Finalize by 80% of preparation timeline",
            },
            Kpi {
                metric: "Mock Interview Performance",
                target: "Consistent 8/10 or higher scores",
                measurement: "Peer and self-evaluation ratings",
                timeline: "Achieve in final week of preparation",
            },
        ],
        interview_performance: vec![
            PerformanceArea {
                area: "Technical Competency",
                self_assessment: vec![
                    "Clearly explained technical concepts".to_string(),
                    format!("Showed relevant experience with {primary}"),
                    "Handled follow-up questions confidently".to_string(),
                ],
                improvement_actions: &["Practice more technical explanations", "Work on simplifying complex topics"],
            },
            PerformanceArea {
                area: "Behavioral Responses",
                self_assessment: owned(&[
                    "Used STAR method effectively",
                    "Provided specific, relevant examples",
                    "Demonstrated cultural fit",
                ]),
                improvement_actions: &["Develop more diverse story examples", "Research company culture more deeply"],
            },
        ],
        follow_up_metrics: vec![
            FollowUp {
                action: format!("Thank you note to the {} team", context.company),
                timing: "Within 24 hours",
                success_indicators: &[
                    "Personalized message referencing specific conversation points",
                    "Reiterated interest and value proposition",
                ],
            },
            FollowUp {
                action: "Additional information".to_string(),
                timing: "If requested, within 48 hours",
                success_indicators: &["Prompt response to any requests", "High-quality work samples or references"],
            },
        ],
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOfPreparation {
    pub timeline: Vec<DayOfStep>,
    pub mental_preparation: MentalPreparation,
    pub physical_preparation: PhysicalPreparation,
    pub final_review: FinalReview,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayOfStep {
    pub time: &'static str,
    pub activity: &'static str,
    pub duration: &'static str,
    pub purpose: &'static str,
    pub tips: StaticList,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentalPreparation {
    pub mindset_techniques: StaticList,
    pub confidence_builders: StaticList,
    pub stress_management: StaticList,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhysicalPreparation {
    pub checklist: StaticList,
    pub backup: StaticList,
    pub technology: StaticList,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReview {
    pub key_points: Vec<String>,
    pub questions: StaticList,
    pub materials: StaticList,
}

const DAY_OF_TIMELINE: [DayOfStep; 4] = [
    DayOfStep {
        time: "2 hours before",
        activity: "Final Review & Mental Preparation",
        duration: "45 minutes",
        purpose: "Refresh key information and build confidence",
        tips: &["Review company key facts and your value proposition", "Avoid learning new information"],
    },
    DayOfStep {
        time: "90 minutes before",
        activity: "Physical & Technical Setup",
        duration: "30 minutes",
        purpose: "Ensure optimal interview environment",
        tips: &["Test camera, microphone and internet", "Prepare backup connection options"],
    },
    DayOfStep {
        time: "60 minutes before",
        activity: "Personal Preparation",
        duration: "30 minutes",
        purpose: "Present your best professional self",
        tips: &["Dress professionally (even if virtual)", "Eat a light, energizing snack"],
    },
    DayOfStep {
        time: "15 minutes before",
        activity: "Final Confidence Building",
        duration: "10 minutes",
        purpose: "Enter interview with peak confidence",
        tips: &["Review your key talking points one last time", "Practice your elevator pitch"],
    },
];

fn day_of(context: &JobContext, level: Seniority) -> DayOfPreparation {
    let level_point = match level {
        Seniority::Junior => "Your eagerness to learn and strong fundamentals",
        Seniority::Mid => "Projects you owned end to end",
        Seniority::Senior => "Architecture decisions you led and people you mentored",
    };

    DayOfPreparation {
        timeline: DAY_OF_TIMELINE.to_vec(),
        mental_preparation: MentalPreparation {
            mindset_techniques: &[
                "Growth mindset: view this as a learning opportunity",
                "Curiosity mindset: focus on learning about them too",
            ],
            confidence_builders: &[
                "Review your accomplishments and success stories",
                "Focus on the value you bring, not what you lack",
            ],
            stress_management: &["Deep breathing exercises (4-7-8 technique)", "Reframe nerves as energy"],
        },
        physical_preparation: PhysicalPreparation {
            checklist: &[
                "Professional attire ready",
                "Resume copies printed (if in-person)",
                "Notebook and pen for notes",
                "Phone charged with backup power",
            ],
            backup: &["Backup internet connection (mobile hotspot)", "Alternative device for video calls"],
            technology: &["Test video conferencing platform", "Close unnecessary applications"],
        },
        final_review: FinalReview {
            key_points: vec![
                "Your elevator pitch and value proposition".to_string(),
                format!("Top 3 reasons why you want to join {}", context.company),
                format!("Your best STAR stories for the {} role", context.role),
                level_point.to_string(),
            ],
            questions: &[
                "Thoughtful questions about the role and team",
                "Questions about growth and development opportunities",
            ],
            materials: &["Resume", "Portfolio or work samples", "Questions for the interviewer"],
        },
    }
}

/// Builds the full preparation plan.
pub fn generate_premium_content(
    resume: &ResumeData,
    context: &JobContext,
    questions: &[Question],
) -> PremiumPreparationPlan {
    let level = resume.seniority();
    let bucket = RoleBucket::for_context(context);

    PremiumPreparationPlan {
        timeline_options: timelines(resume, level, bucket),
        company_research: company_research(context, bucket),
        star_method_guide: star_guide(resume, questions),
        success_metrics: success_metrics(resume, context),
        day_of_preparation: day_of(context, level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::questions::generate_questions;
    use crate::models::job::JobData;

    fn resume(years: u32) -> ResumeData {
        ResumeData {
            name: "Jane Doe".to_string(),
            current_role: "Backend Developer".to_string(),
            experience_years: years,
            ..Default::default()
        }
    }

    fn context(title: &str) -> JobContext {
        let job = JobData {
            title: Some(title.to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        JobContext::new(&job, None, Seniority::Mid)
    }

    fn tech_importance(plan: &PremiumPreparationPlan) -> Importance {
        plan.company_research
            .research_areas
            .iter()
            .find(|a| a.area == "Technology Stack & Innovation")
            .map(|a| a.importance)
            .unwrap()
    }

    #[test]
    fn test_daily_commitment_by_seniority() {
        let ctx = context("Software Engineer");
        let plan = generate_premium_content(&resume(1), &ctx, &[]);
        assert_eq!(plan.timeline_options.one_week.daily_commitment, "2-3 hours daily (intensive)");
        let plan = generate_premium_content(&resume(4), &ctx, &[]);
        assert_eq!(plan.timeline_options.two_weeks.daily_commitment, "1.5-2 hours daily (balanced)");
        let plan = generate_premium_content(&resume(8), &ctx, &[]);
        assert_eq!(plan.timeline_options.one_month.daily_commitment, "1-1.5 hours daily (comprehensive)");
    }

    #[test]
    fn test_tech_research_importance_follows_bucket() {
        let plan = generate_premium_content(&resume(3), &context("Software Engineer"), &[]);
        assert_eq!(tech_importance(&plan), Importance::Critical);
        let plan = generate_premium_content(&resume(3), &context("Data Scientist"), &[]);
        assert_eq!(tech_importance(&plan), Importance::Critical);
        let plan = generate_premium_content(&resume(3), &context("Product Manager"), &[]);
        assert_eq!(tech_importance(&plan), Importance::High);
    }

    #[test]
    fn test_company_name_in_common_questions() {
        let plan = generate_premium_content(&resume(3), &context("Software Engineer"), &[]);
        assert_eq!(plan.company_research.research_areas.len(), 6);
        assert_eq!(
            plan.company_research.company_specific_prep.common_questions[0],
            "Why do you want to work at Acme specifically?"
        );
    }

    #[test]
    fn test_behavioral_questions_become_practice_exercises() {
        let r = resume(3);
        let ctx = context("Software Engineer");
        let questions = generate_questions(&r, &ctx);
        let plan = generate_premium_content(&r, &ctx, &questions);
        let behavioral = of_type(&questions, QuestionType::Behavioral);
        assert_eq!(plan.star_method_guide.practice_exercises.len(), 1 + behavioral.len());
        assert_eq!(plan.star_method_guide.practice_exercises[1].scenario, behavioral[0].title);
    }

    #[test]
    fn test_serialized_shape() {
        let plan = generate_premium_content(&resume(3), &context("Software Engineer"), &[]);
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value["timelineOptions"]["oneWeek"]["phases"].is_array());
        assert_eq!(value["companyResearch"]["researchAreas"][0]["importance"], "Critical");
        assert_eq!(value["starMethodGuide"]["framework"]["action"]["timeAllocation"], "50% of response (75-90 seconds)");
        assert!(value["starMethodGuide"]["storyBank"].get("problemSolving").is_some());
        assert_eq!(value["dayOfPreparation"]["timeline"].as_array().unwrap().len(), 4);
    }
}
