pub const DEFAULT_SUMMARY_LENGTH: i64 = 100;

/// What the model is asked to produce from an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Plain-text summary of roughly `length` words. The length is rendered as sent, never checked.
    Summary { length: String },
    /// Three to five hyphen-prefixed points.
    Takeaways,
}

impl Mode {
    /// Key the generated text is returned under.
    pub fn response_key(&self) -> &'static str {
        match self {
            Mode::Summary { .. } => "summary",
            Mode::Takeaways => "takeaways",
        }
    }

    pub fn scrape_failure_message(&self) -> &'static str {
        match self {
            Mode::Summary { .. } => "Failed to scrape article. The website might be blocking scrapers or requires JavaScript.",
            Mode::Takeaways => "Failed to scrape article.",
        }
    }

    pub fn generation_failure_message(&self, detail: &str) -> String {
        format!("Failed to generate {} from AI model: {}", self.response_key(), detail)
    }
}

pub fn build_prompt(mode: &Mode, content: &str) -> String {
    let instruction = match mode {
        Mode::Summary { length } => format!(
            "Summarize the following article in approximately {} words. Provide the summary as plain text, with no special formatting, titles, or markdown.",
            length
        ),
        Mode::Takeaways => "Analyze the following article and provide 3 to 5 key takeaways. Format them as a simple list using a hyphen (-) for each point. Do not add any other titles, markdown, or special formatting.".to_string(),
    };

    let mut result = String::with_capacity(instruction.len() + content.len() + 8);
    result.push_str(&instruction);
    result.push_str(":\n\n---\n\n");
    result.push_str(content);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Hello world. This is a test article.";

    #[test]
    fn summary_prompt_embeds_length_and_text() {
        let prompt = build_prompt(&Mode::Summary { length: "50".into() }, TEXT);
        assert!(prompt.contains("approximately 50 words"));
        assert!(prompt.contains("plain text"));
        assert!(prompt.ends_with(TEXT));
    }

    #[test]
    fn takeaways_prompt_has_no_word_count() {
        let prompt = build_prompt(&Mode::Takeaways, TEXT);
        assert!(prompt.contains("3 to 5 key takeaways"));
        assert!(prompt.contains("hyphen (-)"));
        assert!(!prompt.contains("words"));
        assert!(prompt.ends_with(TEXT));
    }

    #[test]
    fn length_is_not_bounded() {
        let prompt = build_prompt(&Mode::Summary { length: "-3".into() }, TEXT);
        assert!(prompt.contains("approximately -3 words"));
    }

    #[test]
    fn text_is_separated_from_instruction() {
        let prompt = build_prompt(&Mode::Takeaways, TEXT);
        assert!(prompt.contains("formatting.:\n\n---\n\nHello world."));
    }

    #[test]
    fn failure_messages_name_the_mode() {
        assert_eq!(
            Mode::Takeaways.generation_failure_message("boom"),
            "Failed to generate takeaways from AI model: boom"
        );
        assert_eq!(Mode::Summary { length: "1".into() }.response_key(), "summary");
    }
}
