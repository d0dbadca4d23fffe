//! Axum route handlers for the analysis API.

use std::convert::Infallible;
use std::time::Instant;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::analysis::job_analyzer::analyze_job;
use crate::analysis::outcome::Provenance;
use crate::analysis::pipeline::{run_analysis, AnalysisInput, AnalysisResults, ProgressSink, StageEvent};
use crate::analysis::resume_extractor::extract_resume;
use crate::errors::{ApiJson, AppError};
use crate::models::job::JobData;
use crate::models::lenient_string;
use crate::models::resume::ResumeData;
use crate::state::AppState;

const STREAM_BUFFER: usize = 16;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeResponse {
    pub success: bool,
    pub resume_data: ResumeData,
    pub source: Provenance,
    pub processing_time: u64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobRequest {
    pub job_data: Option<JobData>,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobResponse {
    pub success: bool,
    pub job_analysis: JobData,
    pub source: Provenance,
    pub processing_time: u64,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCompleteResponse {
    pub success: bool,
    pub processing_time: u64,
    pub message: String,
    pub results: AnalysisResults,
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn require_resume_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::validation("Resume text is required"));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    require_resume_text(&request.resume_text)?;
    let started = Instant::now();

    let staged = extract_resume(state.llm.as_ref(), &request.resume_text).await;
    let message = if staged.is_fallback() {
        "Resume analyzed with heuristic extraction"
    } else {
        "Resume analyzed successfully"
    };

    Ok(Json(AnalyzeResumeResponse {
        success: true,
        resume_data: staged.data,
        source: staged.provenance,
        processing_time: elapsed_ms(started),
        message: message.to_string(),
    }))
}

/// POST /api/analyze-job
///
/// Returns the scraped fields untouched when enhancement fails.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    let job = request
        .job_data
        .ok_or_else(|| AppError::validation("Job data is required"))?;
    let started = Instant::now();

    let staged = analyze_job(state.llm.as_ref(), job, request.job_description.as_deref()).await;
    let message = match &staged.provenance {
        Provenance::Ai => "Job analyzed with AI enhancement",
        Provenance::Provided => "Job analyzed from provided fields",
        Provenance::Fallback { .. } => "Job analyzed from scraped fields (AI enhancement unavailable)",
    };

    Ok(Json(AnalyzeJobResponse {
        success: true,
        job_analysis: staged.data.with_display_defaults(),
        source: staged.provenance,
        processing_time: elapsed_ms(started),
        message: message.to_string(),
    }))
}

/// POST /api/analyze-complete
pub async fn handle_analyze_complete(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AnalysisInput>,
) -> Result<Json<AnalyzeCompleteResponse>, AppError> {
    require_resume_text(&input.resume_text)?;
    let started = Instant::now();

    let results = run_analysis(state.llm.as_ref(), input, &ProgressSink::Silent)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(AnalyzeCompleteResponse {
        success: true,
        processing_time: elapsed_ms(started),
        message: "Complete analysis finished successfully".to_string(),
        results,
    }))
}

/// POST /api/analyze-stream
///
/// Validates before opening the stream; afterwards every outcome is an event.
pub async fn handle_analyze_stream(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AnalysisInput>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    require_resume_text(&input.resume_text)?;

    let (tx, rx) = mpsc::channel::<StageEvent>(STREAM_BUFFER);
    let llm = state.llm.clone();
    tokio::spawn(async move {
        let sink = ProgressSink::Channel(tx);
        match run_analysis(llm.as_ref(), input, &sink).await {
            Ok(results) => info!("Streamed analysis {} finished", results.analysis_id),
            Err(e) => {
                warn!("Streamed analysis aborted: {e}");
                // Best effort; the receiver is usually gone by now.
                let _ = sink.emit(StageEvent::failed(e.to_string())).await;
            }
        }
    });

    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    })
    .map(|event| Ok(to_sse_event(&event)));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &StageEvent) -> Event {
    Event::default().json_data(event).unwrap_or_else(|e| {
        warn!("Failed to encode stage event: {e}");
        Event::default().data(r#"{"step":"error","status":"error","message":"encoding failed","progress":0,"error":true}"#)
    })
}
