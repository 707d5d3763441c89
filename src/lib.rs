pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod llm;
pub mod logging;
pub mod prompt;

use std::sync::Arc;
use config::Config;
use error::Result;
use extractor::{ContentExtractor, ReadabilityExtractor};
use fetcher::{HttpFetcher, PageFetcher};
use llm::{GeminiClient, TextGenerator};

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub extractor: Arc<dyn ContentExtractor>,
    /// `None` when the service has no usable API key.
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    /// Wires the production collaborators for `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let generator = match GeminiClient::from_config(&config) {
            Ok(Some(client)) => Some(Arc::new(client) as Arc<dyn TextGenerator>),
            Ok(None) => {
                tracing::error!("GEMINI_API_KEY not set; generation requests will be rejected");
                None
            }
            Err(e) => {
                tracing::error!("Error configuring Gemini client: {}", e);
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(HttpFetcher::new()?),
            extractor: Arc::new(ReadabilityExtractor),
            generator,
        })
    }
}
