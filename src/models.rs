//! Data models for the visibility collector.
//!
//! This module contains the core data structures shared by the
//! analysis pipeline, the dataset client and the run driver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// AI chatbot a dataset job collects answers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chatbot {
    ChatGpt,
    Perplexity,
    Gemini,
}

impl Chatbot {
    /// All chatbots, in the order jobs are run.
    pub const ALL: [Chatbot; 3] = [Chatbot::ChatGpt, Chatbot::Perplexity, Chatbot::Gemini];

    /// Identifier used in file names and persisted JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chatbot::ChatGpt => "chatgpt",
            Chatbot::Perplexity => "perplexity",
            Chatbot::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Chatbot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chatbot::ChatGpt => write!(f, "ChatGPT"),
            Chatbot::Perplexity => write!(f, "Perplexity"),
            Chatbot::Gemini => write!(f, "Gemini"),
        }
    }
}

/// Kind of site a cited source lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// User-generated content (forums, Q&A)
    Ugc,
    Youtube,
    Web,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Ugc => write!(f, "ugc"),
            SourceType::Youtube => write!(f, "youtube"),
            SourceType::Web => write!(f, "web"),
        }
    }
}

/// A citation or source attached to a chatbot answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: Option<String>,
    pub url: Option<String>,
    /// Normalized host (lowercase, no scheme, no path).
    pub domain: Option<String>,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

/// Visibility metrics for one prompt answered by one chatbot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedResult {
    pub chatbot: Chatbot,
    pub prompt: String,
    /// Brand term and target domain occurrences in the answer.
    pub mentions: usize,
    pub cited: bool,
    /// 1-based position of the first source on a target domain.
    pub first_citation_rank: Option<usize>,
    pub fan_out_count: usize,
    pub used_web_search: bool,
    pub sources_count: usize,
    pub ugc_sources_count: usize,
    pub youtube_sources_count: usize,
    /// Sorted, de-duplicated competitor domains found in the answer.
    pub competitor_domains: Vec<String>,
    pub sources: Vec<Source>,
}

/// State of a remote dataset job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Ready,
    Failed,
    Timeout,
}

impl JobStatus {
    /// Map a status string reported by the dataset API.
    ///
    /// Anything other than `ready` or `failed` means the job is still running.
    pub fn from_remote(status: &str) -> Self {
        match status {
            "ready" => JobStatus::Ready,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Ready => write!(f, "ready"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Timeout => write!(f, "timeout"),
        }
    }
}

/// Outcome of one provider's dataset job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub chatbot: Chatbot,
    pub dataset_id: String,
    pub snapshot_id: String,
    pub status: JobStatus,
}

/// The aggregate artifact written to `results.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// UTC timestamp, `%Y-%m-%dT%H:%M:%SZ`.
    pub run_at: String,
    pub check_url: String,
    pub target_domains: Vec<String>,
    pub brand_terms: Vec<String>,
    pub snapshots: Vec<SnapshotRecord>,
    pub results: Vec<AnalyzedResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatbot_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Chatbot::ChatGpt).unwrap(), "\"chatgpt\"");
        assert_eq!(
            serde_json::to_string(&Chatbot::Perplexity).unwrap(),
            "\"perplexity\""
        );
        let parsed: Chatbot = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(parsed, Chatbot::Gemini);
    }

    #[test]
    fn test_chatbot_as_str_matches_serde() {
        for chatbot in Chatbot::ALL {
            let json = serde_json::to_string(&chatbot).unwrap();
            assert_eq!(json.trim_matches('"'), chatbot.as_str());
        }
    }

    #[test]
    fn test_job_status_from_remote() {
        assert_eq!(JobStatus::from_remote("ready"), JobStatus::Ready);
        assert_eq!(JobStatus::from_remote("failed"), JobStatus::Failed);
        assert_eq!(JobStatus::from_remote("running"), JobStatus::Pending);
        assert_eq!(JobStatus::from_remote(""), JobStatus::Pending);
        assert!(!JobStatus::Pending.is_terminal());
        assert!(JobStatus::Timeout.is_terminal());
    }

    #[test]
    fn test_source_serializes_type_field() {
        let source = Source {
            title: None,
            url: Some("https://youtu.be/x".to_string()),
            domain: Some("youtu.be".to_string()),
            source_type: SourceType::Youtube,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "youtube");
        assert!(json["title"].is_null());
    }

    #[test]
    fn test_snapshot_record_shape() {
        let record = SnapshotRecord {
            chatbot: Chatbot::ChatGpt,
            dataset_id: "gd_1".to_string(),
            snapshot_id: "s_1".to_string(),
            status: JobStatus::Timeout,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["chatbot"], "chatgpt");
        assert_eq!(json["status"], "timeout");
        assert_eq!(json["snapshot_id"], "s_1");
    }
}
