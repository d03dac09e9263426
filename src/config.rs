//! Service configuration from environment variables.

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP API listens on.
    pub port: u16,
    /// Base URL of the task-tracking backend, e.g. `http://localhost:3001/api`.
    pub backend_url: String,
    /// Optional bearer token for the task backend.
    pub backend_api_key: Option<String>,
    /// OpenRouter API key for the extraction model.
    pub openrouter_api_key: String,
    /// Model used for task extraction.
    pub extraction_model: String,
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `OPENROUTER_API_KEY`, `TASK_BACKEND_URL`.
    /// Optional: `PORT` (default 3000), `TASK_BACKEND_API_KEY`,
    /// `EXTRACTION_MODEL` (default `openai/gpt-4o-mini`).
    pub fn from_env() -> anyhow::Result<Self> {
        let openrouter_api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENROUTER_API_KEY is not set"))?;
        let backend_url = std::env::var("TASK_BACKEND_URL")
            .map_err(|_| anyhow::anyhow!("TASK_BACKEND_URL is not set"))?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT is not a valid port number: {}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            backend_url,
            backend_api_key: std::env::var("TASK_BACKEND_API_KEY").ok(),
            openrouter_api_key,
            extraction_model: std::env::var("EXTRACTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}
