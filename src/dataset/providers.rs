//! Per-chatbot dataset settings.
//!
//! Which output fields to request from each chatbot's dataset and how
//! to build the input rows for a job.

use crate::models::Chatbot;
use serde_json::{json, Value};
use std::collections::HashMap;

const CHATGPT_OUTPUT_FIELDS: &[&str] = &[
    "url",
    "prompt",
    "links_attached",
    "citations",
    "recommendations",
    "country",
    "is_map",
    "references",
    "shopping",
    "shopping_visible",
    "index",
    "answer_text_markdown",
    "web_search_triggered",
    "additional_prompt",
    "additional_answer_text",
    "map",
    "search_sources",
    "model",
    "web_search_query",
];

const PERPLEXITY_OUTPUT_FIELDS: &[&str] = &[
    "url",
    "prompt",
    "answer_text_markdown",
    "sources",
    "is_shopping_data",
    "shopping_data",
    "index",
    "exported_markdown",
    "related_prompts",
    "citations",
    "web_search_query",
];

const GEMINI_OUTPUT_FIELDS: &[&str] = &[
    "url",
    "prompt",
    "answer_text_markdown",
    "sources",
    "citations",
    "index",
    "web_search_query",
];

/// Output field lists keyed by chatbot.
#[derive(Debug, Clone)]
pub struct ProviderTable {
    fields: HashMap<Chatbot, Vec<String>>,
}

impl Default for ProviderTable {
    fn default() -> Self {
        let mut fields = HashMap::new();
        fields.insert(Chatbot::ChatGpt, owned_fields(CHATGPT_OUTPUT_FIELDS));
        fields.insert(Chatbot::Perplexity, owned_fields(PERPLEXITY_OUTPUT_FIELDS));
        fields.insert(Chatbot::Gemini, owned_fields(GEMINI_OUTPUT_FIELDS));
        Self { fields }
    }
}

fn owned_fields(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl ProviderTable {
    /// Replace the output fields requested for one chatbot.
    pub fn with_fields(mut self, chatbot: Chatbot, fields: Vec<String>) -> Self {
        self.fields.insert(chatbot, fields);
        self
    }

    /// The `custom_output_fields` value for a chatbot (`|`-joined).
    pub fn output_fields(&self, chatbot: Chatbot) -> String {
        self.fields
            .get(&chatbot)
            .map(|f| f.join("|"))
            .unwrap_or_default()
    }

    /// Build one input row per prompt.
    ///
    /// ChatGPT rows also disable the UI web-search toggle and the
    /// follow-up prompt.
    pub fn build_inputs(
        &self,
        chatbot: Chatbot,
        prompts: &[String],
        check_url: &str,
        country: &str,
    ) -> Vec<Value> {
        prompts
            .iter()
            .enumerate()
            .map(|(idx, prompt)| {
                let mut row = json!({
                    "url": check_url,
                    "prompt": prompt,
                    "country": country,
                    "index": idx + 1,
                });
                if chatbot == Chatbot::ChatGpt {
                    row["web_search"] = json!(false);
                    row["additional_prompt"] = json!("");
                }
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_fields_joined() {
        let table = ProviderTable::default();
        let gemini = table.output_fields(Chatbot::Gemini);
        assert_eq!(
            gemini,
            "url|prompt|answer_text_markdown|sources|citations|index|web_search_query"
        );
        assert!(table
            .output_fields(Chatbot::ChatGpt)
            .contains("web_search_triggered"));
    }

    #[test]
    fn test_with_fields_overrides() {
        let table = ProviderTable::default()
            .with_fields(Chatbot::Perplexity, vec!["prompt".into(), "sources".into()]);
        assert_eq!(table.output_fields(Chatbot::Perplexity), "prompt|sources");
    }

    #[test]
    fn test_build_inputs() {
        let table = ProviderTable::default();
        let prompts = vec!["first".to_string(), "second".to_string()];

        let rows = table.build_inputs(Chatbot::ChatGpt, &prompts, "https://acme.com", "US");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["index"], 2);
        assert_eq!(rows[1]["prompt"], "second");
        assert_eq!(rows[0]["web_search"], false);
        assert_eq!(rows[0]["additional_prompt"], "");

        let rows = table.build_inputs(Chatbot::Gemini, &prompts, "https://acme.com", "DE");
        assert_eq!(rows[0]["country"], "DE");
        assert!(rows[0].get("web_search").is_none());
    }
}
