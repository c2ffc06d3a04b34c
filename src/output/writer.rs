//! JSON artifact writing.
//!
//! This module lays out a run's output directory and writes the
//! snapshot records, raw payload dumps and the final results file.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::Chatbot;

/// Bulky fields dropped from raw payloads before they are saved.
pub const UNWANTED_FIELDS: &[&str] = &["source_html", "response_raw", "answer_html", "answer_text"];

/// Output directory of one run: `<out_dir>/<YYYY-MM-DD>/`.
#[derive(Debug, Clone)]
pub struct RunLayout {
    dir: PathBuf,
}

impl RunLayout {
    pub fn new(out_dir: &Path, date: &str) -> Self {
        Self {
            dir: out_dir.join(date),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, chatbot: Chatbot) -> PathBuf {
        self.dir
            .join("snapshots")
            .join(format!("{}.json", chatbot.as_str()))
    }

    pub fn raw_path(&self, chatbot: Chatbot, snapshot_id: &str) -> PathBuf {
        self.dir
            .join("raw")
            .join(format!("{}-{}.json", chatbot.as_str(), snapshot_id))
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.join("results.json")
    }
}

/// Serialize `data` as pretty JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(data).context("Failed to serialize JSON")?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Copy of a record without the unwanted fields.
pub fn clean_record(record: &Map<String, Value>) -> Map<String, Value> {
    record
        .iter()
        .filter(|(k, _)| !UNWANTED_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Clean a downloaded payload: a single record or an array of records.
///
/// Non-object values are kept as they are.
pub fn clean_payload(payload: &Value) -> Value {
    match payload {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(record) => Value::Object(clean_record(record)),
                    other => other.clone(),
                })
                .collect(),
        ),
        Value::Object(record) => Value::Object(clean_record(record)),
        other => other.clone(),
    }
}
