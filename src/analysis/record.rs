//! Chatbot response records.
//!
//! Each provider returns its own loosely-typed JSON shape. A
//! [`ChatbotRecord`] tags a raw JSON object with the provider that
//! produced it, and [`ChatbotRecord::normalize`] maps every variant
//! into the common [`AnswerRecord`] that the metric calculators read.

use crate::models::Chatbot;
use serde_json::{Map, Value};

/// Marker ChatGPT appends to links it fetched through live search.
pub const CHATGPT_SEARCH_MARKER: &str = "utm_source=chatgpt.com";

/// One raw JSON object returned by the dataset API.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Wrap a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|fields| Self(fields.clone()))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field as text, for fields that are normally strings.
    ///
    /// Empty values (`null`, `false`, zero, `""`, empty arrays and objects)
    /// read as `""`. Other scalars are stringified (`42` as `"42"`, `true` as
    /// `"True"`) and non-empty containers as their JSON text.
    pub fn text_field(&self, field: &str) -> String {
        match self.0.get(field) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::Bool(true)) => "True".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Array(items)) if items.is_empty() => String::new(),
            Some(Value::Object(fields)) if fields.is_empty() => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Array field; absent or non-array values read as empty.
    pub fn list_field(&self, field: &str) -> &[Value] {
        match self.0.get(field) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }
}

/// A raw record tagged with the chatbot that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatbotRecord {
    ChatGpt(RawRecord),
    Perplexity(RawRecord),
    Gemini(RawRecord),
}

impl ChatbotRecord {
    pub fn new(chatbot: Chatbot, raw: RawRecord) -> Self {
        match chatbot {
            Chatbot::ChatGpt => ChatbotRecord::ChatGpt(raw),
            Chatbot::Perplexity => ChatbotRecord::Perplexity(raw),
            Chatbot::Gemini => ChatbotRecord::Gemini(raw),
        }
    }

    pub fn chatbot(&self) -> Chatbot {
        match self {
            ChatbotRecord::ChatGpt(_) => Chatbot::ChatGpt,
            ChatbotRecord::Perplexity(_) => Chatbot::Perplexity,
            ChatbotRecord::Gemini(_) => Chatbot::Gemini,
        }
    }

    pub fn raw(&self) -> &RawRecord {
        match self {
            ChatbotRecord::ChatGpt(raw)
            | ChatbotRecord::Perplexity(raw)
            | ChatbotRecord::Gemini(raw) => raw,
        }
    }

    /// Map the provider-specific fields into the common answer shape.
    ///
    /// All providers share the field names for prompt, answer, citations and
    /// search queries; `sources` and `web_search_triggered` are only present
    /// for some of them and read as empty when missing.
    pub fn normalize(&self) -> AnswerRecord {
        let raw = self.raw();

        AnswerRecord {
            prompt: raw.text_field("prompt").trim().to_string(),
            answer_markdown: raw.text_field("answer_text_markdown"),
            citations: references(raw.list_field("citations")),
            sources: references(raw.list_field("sources")),
            web_search_queries: raw.list_field("web_search_query").len(),
            web_search_triggered: matches!(raw.get("web_search_triggered"), Some(Value::Bool(true))),
        }
    }
}

/// A citation or source entry with only its string-typed, non-empty fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    pub url: Option<String>,
    pub title: Option<String>,
    pub domain: Option<String>,
}

impl Reference {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Self {
            url: text("url"),
            title: text("title"),
            domain: text("domain"),
        }
    }
}

fn references(items: &[Value]) -> Vec<Reference> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(Reference::from_fields)
        .collect()
}

/// Provider-independent view of one chatbot answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Trimmed prompt text; empty when the record carried none.
    pub prompt: String,
    pub answer_markdown: String,
    pub citations: Vec<Reference>,
    pub sources: Vec<Reference>,
    /// Number of web-search sub-queries issued (fan-out).
    pub web_search_queries: usize,
    pub web_search_triggered: bool,
}
