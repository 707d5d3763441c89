use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::DEFAULT_SUMMARY_LENGTH;

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Approximate word count. Any JSON value is accepted and passed through to the prompt.
    #[serde(default)]
    pub length: Option<Value>,
}

impl SummarizeRequest {
    /// `length` as it appears in the prompt; absent or `null` means the default.
    pub fn length_hint(&self) -> String {
        match &self.length {
            None | Some(Value::Null) => DEFAULT_SUMMARY_LENGTH.to_string(),
            Some(Value::String(length)) => length.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TakeawaysRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct TakeawaysResponse {
    pub takeaways: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hint(body: Value) -> String {
        serde_json::from_value::<SummarizeRequest>(body).unwrap().length_hint()
    }

    #[test]
    fn length_defaults_when_absent_or_null() {
        assert_eq!(hint(json!({ "url": "http://example.com" })), "100");
        assert_eq!(hint(json!({ "url": "http://example.com", "length": null })), "100");
    }

    #[test]
    fn length_is_rendered_as_sent() {
        assert_eq!(hint(json!({ "length": 50 })), "50");
        assert_eq!(hint(json!({ "length": "50" })), "50");
        assert_eq!(hint(json!({ "length": 50.5 })), "50.5");
        assert_eq!(hint(json!({ "length": -3 })), "-3");
    }
}
