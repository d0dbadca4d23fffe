//! Seven-step analysis run shared by the JSON and SSE endpoints.
//!
//! Steps run one after another. Model-backed steps never fail the run; the
//! only error is losing the progress receiver.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::coaching::{generate_premium_coaching, PremiumCoaching};
use crate::analysis::guide::{assemble_guide, final_analysis, ComprehensiveGuide, FinalAnalysis};
use crate::analysis::job_analyzer::analyze_job;
use crate::analysis::match_scorer::{score_match, MatchResult};
use crate::analysis::outcome::{Provenance, Staged};
use crate::analysis::premium_content::{generate_premium_content, PremiumPreparationPlan};
use crate::analysis::questions::{generate_questions, Question};
use crate::analysis::resume_extractor::extract_resume;
use crate::llm_client::LanguageModel;
use crate::models::job::{JobContext, JobData};
use crate::models::lenient_string;
use crate::models::resume::ResumeData;

/// Upper bound on a single progress write.
pub const EMIT_TIMEOUT: Duration = Duration::from_secs(5);
pub const PROCESSING_STEPS: u8 = 7;

// ────────────────────────────────────────────────────────────────────────────
// Input / output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub resume_text: String,
    pub job_description: Option<String>,
    pub job_data: Option<JobData>,
    /// Pre-extracted résumé; skips step 1.
    pub resume_analysis_data: Option<ResumeData>,
    /// Pre-analyzed job fields; merged over `job_data` and skips step 2.
    pub job_analysis_data: Option<JobData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sources {
    pub resume: Provenance,
    pub job: Provenance,
    #[serde(rename = "match")]
    pub match_score: Provenance,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub candidate_name: String,
    pub target_role: String,
    pub overall_match: u8,
    pub questions_generated: usize,
    pub key_strengths: Vec<String>,
    pub completed_at: DateTime<Utc>,
    pub processing_steps: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub analysis_id: Uuid,
    pub resume_data: ResumeData,
    pub job_data: JobData,
    pub match_data: MatchResult,
    pub questions: Vec<Question>,
    pub final_analysis: FinalAnalysis,
    pub comprehensive_guide: ComprehensiveGuide,
    pub premium_content: PremiumPreparationPlan,
    pub premium_coaching: PremiumCoaching,
    pub summary: AnalysisSummary,
    pub sources: Sources,
}

// ────────────────────────────────────────────────────────────────────────────
// Progress events
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ResumeAnalysis,
    JobAnalysis,
    JobMatching,
    QuestionGeneration,
    ComprehensiveGuide,
    PremiumContent,
    PremiumCoaching,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageEvent {
    pub step: Step,
    pub status: StepStatus,
    pub message: String,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl StageEvent {
    fn processing(step: Step, message: &str) -> Self {
        Self {
            step,
            status: StepStatus::Processing,
            message: message.to_string(),
            progress: 10,
            results: None,
            error: false,
        }
    }

    fn completed(step: Step, message: &str, results: &impl Serialize) -> Self {
        Self {
            step,
            status: StepStatus::Completed,
            message: message.to_string(),
            progress: 100,
            results: serde_json::to_value(results).ok(),
            error: false,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            step: Step::Error,
            status: StepStatus::Error,
            message: message.into(),
            progress: 0,
            results: None,
            error: true,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("progress receiver closed")]
    ClientGone,

    #[error("progress write timed out after {}s", EMIT_TIMEOUT.as_secs())]
    EmitTimeout,
}

/// Where stage progress goes. JSON callers use `Silent`.
#[derive(Debug, Clone)]
pub enum ProgressSink {
    Silent,
    Channel(mpsc::Sender<StageEvent>),
}

impl ProgressSink {
    pub async fn emit(&self, event: StageEvent) -> Result<(), PipelineError> {
        let ProgressSink::Channel(tx) = self else {
            return Ok(());
        };
        match timeout(EMIT_TIMEOUT, tx.send(event)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(PipelineError::ClientGone),
            Err(_) => Err(PipelineError::EmitTimeout),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Run
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_analysis(
    llm: &dyn LanguageModel,
    input: AnalysisInput,
    progress: &ProgressSink,
) -> Result<AnalysisResults, PipelineError> {
    let AnalysisInput {
        resume_text,
        job_description,
        job_data,
        resume_analysis_data,
        job_analysis_data,
    } = input;
    let job_description = job_description.as_deref().map(str::trim).filter(|s| !s.is_empty());

    // 1. Resume
    progress
        .emit(StageEvent::processing(Step::ResumeAnalysis, "Analyzing resume..."))
        .await?;
    let resume = match resume_analysis_data {
        Some(pre) => {
            info!("Using pre-processed resume data");
            Staged::provided(pre.normalize())
        }
        None => extract_resume(llm, &resume_text).await,
    };
    log_fallback("resume", &resume.provenance);
    progress
        .emit(StageEvent::completed(Step::ResumeAnalysis, "Resume analysis complete", &resume.data))
        .await?;

    // 2. Job
    progress
        .emit(StageEvent::processing(Step::JobAnalysis, "Analyzing job posting..."))
        .await?;
    let mut job_base = job_data.unwrap_or_default();
    let job = match job_analysis_data {
        Some(pre) => {
            info!("Using pre-processed job data");
            job_base.merge_from(pre);
            Staged::provided(job_base)
        }
        None => analyze_job(llm, job_base, job_description).await,
    };
    log_fallback("job", &job.provenance);
    progress
        .emit(StageEvent::completed(Step::JobAnalysis, "Job analysis complete", &job.data))
        .await?;

    // 3. Match
    progress
        .emit(StageEvent::processing(Step::JobMatching, "Analyzing job compatibility..."))
        .await?;
    let matched = score_match(llm, &resume.data, &job.data, job_description.unwrap_or_default()).await;
    log_fallback("match", &matched.provenance);
    progress
        .emit(StageEvent::completed(Step::JobMatching, "Job matching complete", &matched.data))
        .await?;

    let resume_data = resume.data;
    let job_data = job.data;
    let match_data = matched.data;
    let seniority = resume_data.seniority();
    let context = JobContext::new(&job_data, job_description, seniority);

    // 4. Questions
    progress
        .emit(StageEvent::processing(Step::QuestionGeneration, "Generating interview questions..."))
        .await?;
    let questions = generate_questions(&resume_data, &context);
    progress
        .emit(StageEvent::completed(Step::QuestionGeneration, "Question generation complete", &questions))
        .await?;

    // 5. Guide
    progress
        .emit(StageEvent::processing(Step::ComprehensiveGuide, "Creating comprehensive guide..."))
        .await?;
    let analysis = final_analysis(&resume_data, &match_data);
    let guide = assemble_guide(&resume_data, &job_data, &context, &match_data, &questions, Utc::now());
    progress
        .emit(StageEvent::completed(Step::ComprehensiveGuide, "Comprehensive guide ready", &guide))
        .await?;

    // 6. Premium content
    progress
        .emit(StageEvent::processing(Step::PremiumContent, "Building preparation plan..."))
        .await?;
    let premium_content = generate_premium_content(&resume_data, &context, &questions);
    progress
        .emit(StageEvent::completed(Step::PremiumContent, "Preparation plan ready", &premium_content))
        .await?;

    // 7. Coaching
    progress
        .emit(StageEvent::processing(Step::PremiumCoaching, "Preparing coaching insights..."))
        .await?;
    let premium_coaching = generate_premium_coaching(&resume_data, &context, seniority);
    progress
        .emit(StageEvent::completed(Step::PremiumCoaching, "Coaching insights ready", &premium_coaching))
        .await?;

    let summary = AnalysisSummary {
        candidate_name: resume_data.name.clone(),
        target_role: context.role.clone(),
        overall_match: match_data.overall_match,
        questions_generated: questions.len(),
        key_strengths: match_data.strong_matches.iter().take(3).cloned().collect(),
        completed_at: Utc::now(),
        processing_steps: PROCESSING_STEPS,
    };

    let results = AnalysisResults {
        analysis_id: Uuid::new_v4(),
        resume_data,
        job_data,
        match_data,
        questions,
        final_analysis: analysis,
        comprehensive_guide: guide,
        premium_content,
        premium_coaching,
        summary,
        sources: Sources {
            resume: resume.provenance,
            job: job.provenance,
            match_score: matched.provenance,
        },
    };

    info!(
        "Analysis {} complete: {} questions, {}% match",
        results.analysis_id, results.summary.questions_generated, results.summary.overall_match
    );

    progress
        .emit(StageEvent::completed(
            Step::Completed,
            "Analysis complete! All steps finished successfully.",
            &results,
        ))
        .await?;

    Ok(results)
}

fn log_fallback(stage: &str, provenance: &Provenance) {
    if let Provenance::Fallback { reason } = provenance {
        warn!("{stage} stage used fallback data: {reason}");
    }
}
