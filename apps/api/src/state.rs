use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::llm_client::LanguageModel;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Swappable model backend; tests inject a scripted stub.
    pub llm: Arc<dyn LanguageModel>,
    pub config: Config,
    /// Outbound client for Document AI, Firecrawl and direct page fetches.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn LanguageModel>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { llm, config, http })
    }
}
