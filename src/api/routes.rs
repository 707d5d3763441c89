use axum::{
    routing::post,
    Router,
    extract::{rejection::JsonRejection, Json, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result};
use crate::api::models::{SummarizeRequest, SummaryResponse, TakeawaysRequest, TakeawaysResponse};
use crate::prompt::{build_prompt, Mode};
use crate::{AppState, TARGET_LLM_REQUEST, TARGET_WEB_REQUEST};

const URL_REQUIRED: &str = "URL is required";
const MISCONFIGURED: &str = "Server error: Gemini model is not configured correctly.";

pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.allowed_origins());

    Router::new()
        .route("/api/summarize", post(summarize_handler))
        .route("/api/takeaways", post(takeaways_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

async fn summarize_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>> {
    let Json(req) = payload.map_err(reject_body)?;
    let url = required_url(req.url.clone())?;
    let mode = Mode::Summary {
        length: req.length_hint(),
    };

    let summary = digest_article(&state, &url, mode).await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn takeaways_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TakeawaysRequest>, JsonRejection>,
) -> Result<Json<TakeawaysResponse>> {
    let Json(req) = payload.map_err(reject_body)?;
    let url = required_url(req.url)?;

    let takeaways = digest_article(&state, &url, Mode::Takeaways).await?;
    Ok(Json(TakeawaysResponse { takeaways }))
}

fn reject_body(rejection: JsonRejection) -> AppError {
    debug!("Rejected request body: {}", rejection);
    AppError::InputError(format!("Invalid request body: {}", rejection.body_text()))
}

fn required_url(url: Option<String>) -> Result<String> {
    url.map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::InputError(URL_REQUIRED.to_string()))
}

/// Fetch, extract, prompt and generate for one request. Stops at the first failure.
async fn digest_article(state: &AppState, url: &str, mode: Mode) -> Result<String> {
    let generator = state.generator.as_ref().ok_or_else(|| {
        error!("Rejecting request for {}: generation client is not configured", url);
        AppError::ConfigError(MISCONFIGURED.to_string())
    })?;

    info!(target: TARGET_WEB_REQUEST, "Fetching {} for {}", url, mode.response_key());
    let html = state.fetcher.fetch(url).await.map_err(|e| {
        warn!(target: TARGET_WEB_REQUEST, "Error fetching article {}: {}", url, e);
        AppError::FetchError(mode.scrape_failure_message().to_string())
    })?;

    let extractor = Arc::clone(&state.extractor);
    let page_url = url.to_string();
    let extracted = tokio::task::spawn_blocking(move || extractor.extract(&html, &page_url))
        .await
        .map_err(|e| AppError::ParseError(format!("Extraction task failed: {}", e)))
        .and_then(|result| result);

    let article = match extracted {
        Ok(article) if !article.content.trim().is_empty() => article,
        Ok(_) => {
            warn!(target: TARGET_WEB_REQUEST, "Extracted article is empty for {}", url);
            return Err(AppError::ParseError(mode.scrape_failure_message().to_string()));
        }
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Error extracting article {}: {}", url, e);
            return Err(AppError::ParseError(mode.scrape_failure_message().to_string()));
        }
    };
    info!(
        target: TARGET_WEB_REQUEST,
        "Extracted {:?} ({} chars) from {}", article.title, article.content.len(), url
    );

    let prompt = build_prompt(&mode, &article.content);
    let start = std::time::Instant::now();
    let output = generator.generate(&prompt).await.map_err(|e| {
        error!(target: TARGET_LLM_REQUEST, "Generation failed for {}: {}", url, e);
        AppError::LlmError(mode.generation_failure_message(e.message()))
    })?;
    info!(target: TARGET_LLM_REQUEST, "Generated {} for {} in {:?}", mode.response_key(), url, start.elapsed());

    Ok(output)
}
