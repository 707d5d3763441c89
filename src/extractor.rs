use once_cell::sync::Lazy;
use readability::extractor;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::{AppError, Result};
use crate::TARGET_WEB_REQUEST;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("head > title, title").expect("Failed to parse title selector")
});

/// Main readable content of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub content: String,
    /// Not used in prompts or responses yet.
    pub title: String,
}

/// Boilerplate removal over raw HTML. CPU bound, so callers run it off the async executor.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, html: &str, url: &str) -> Result<Article>;
}

#[derive(Default)]
pub struct ReadabilityExtractor;

impl ContentExtractor for ReadabilityExtractor {
    fn extract(&self, html: &str, url: &str) -> Result<Article> {
        let base = Url::parse(url).map_err(|e| AppError::ParseError(format!("Invalid URL {}: {}", url, e)))?;

        let mut input = html.as_bytes();
        let product = extractor::extract(&mut input, &base)
            .map_err(|e| AppError::ParseError(format!("Readability failed for {}: {}", url, e)))?;

        let title = if product.title.trim().is_empty() {
            document_title(html).unwrap_or_default()
        } else {
            product.title.trim().to_string()
        };

        let content = product.text.trim().to_string();
        debug!(target: TARGET_WEB_REQUEST, "Extracted {} chars titled {:?} from {}", content.len(), title, url);

        Ok(Article { content, title })
    }
}

/// Text of the document's `<title>`, if any.
pub fn document_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
