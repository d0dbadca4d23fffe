use anyhow::{Context, Result};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini-2024-07-18";

/// Application configuration loaded from environment variables.
/// Fails at startup if `OPENAI_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub firecrawl_api_key: Option<String>,
    /// Present only when project, processor and access token are all set.
    pub document_ai: Option<DocumentAiConfig>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct DocumentAiConfig {
    pub project_id: String,
    pub processor_id: String,
    pub location: String,
    pub access_token: String,
}

impl DocumentAiConfig {
    pub fn process_url(&self) -> String {
        format!(
            "https://{loc}-documentai.googleapis.com/v1/projects/{project}/locations/{loc}/processors/{processor}:process",
            loc = self.location,
            project = self.project_id,
            processor = self.processor_id,
        )
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let document_ai = match (
            optional("GOOGLE_CLOUD_PROJECT_ID"),
            optional("GOOGLE_DOCUMENT_AI_PROCESSOR_ID"),
            optional("GOOGLE_DOCUMENT_AI_ACCESS_TOKEN"),
        ) {
            (Some(project_id), Some(processor_id), Some(access_token)) => Some(DocumentAiConfig {
                project_id,
                processor_id,
                location: optional("GOOGLE_DOCUMENT_AI_LOCATION").unwrap_or_else(|| "us".to_string()),
                access_token,
            }),
            _ => None,
        };

        Ok(Config {
            openai_api_key: require(&optional, "OPENAI_API_KEY")?,
            openai_model: optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            firecrawl_api_key: optional("FIRECRAWL_API_KEY"),
            document_ai,
            port: optional("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(optional: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_openai_key_fails_fast() {
        let err = config_from(&[("PORT", "3000")]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_openai_key_counts_as_missing() {
        assert!(config_from(&[("OPENAI_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.firecrawl_api_key.is_none());
        assert!(config.document_ai.is_none());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(config_from(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_document_ai_requires_all_parts() {
        let partial = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_CLOUD_PROJECT_ID", "proj"),
            ("GOOGLE_DOCUMENT_AI_PROCESSOR_ID", "proc"),
        ])
        .unwrap();
        assert!(partial.document_ai.is_none());

        let full = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_CLOUD_PROJECT_ID", "proj"),
            ("GOOGLE_DOCUMENT_AI_PROCESSOR_ID", "proc"),
            ("GOOGLE_DOCUMENT_AI_ACCESS_TOKEN", "token"),
        ])
        .unwrap();
        let doc_ai = full.document_ai.unwrap();
        assert_eq!(doc_ai.location, "us");
        assert_eq!(
            doc_ai.process_url(),
            "https://us-documentai.googleapis.com/v1/projects/proj/locations/us/processors/proc:process"
        );
    }
}
