//! Prompt file loading.
//!
//! A `.json` prompts file holds either an array of prompts or an object
//! with a `prompts` array. Any other file is read as one prompt per line.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Load prompts from a file, trimming them and dropping blanks.
pub fn load_prompts(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompts file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let prompts = if is_json {
        parse_json_prompts(&content)
            .with_context(|| format!("Failed to parse prompts file: {}", path.display()))?
    } else {
        parse_text_prompts(&content)
    };

    debug!("Loaded {} prompts from {}", prompts.len(), path.display());
    Ok(prompts)
}

/// One prompt per non-blank line. `\n`, `\r\n` and a bare `\r` all end a line.
pub fn parse_text_prompts(content: &str) -> Vec<String> {
    content
        .split(|c: char| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Prompts from a JSON array or a `{"prompts": [...]}` object.
pub fn parse_json_prompts(content: &str) -> Result<Vec<String>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(content)?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("prompts") {
            Some(Value::Array(items)) => items,
            _ => {
                warn!("Prompts JSON object has no \"prompts\" array");
                return Ok(Vec::new());
            }
        },
        _ => {
            warn!("Prompts JSON is neither an array nor an object");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .iter()
        .map(prompt_text)
        .filter(|p| !p.is_empty())
        .collect())
}

/// Text of a prompt entry; non-string entries are stringified.
fn prompt_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_text_prompts() {
        let prompts = parse_text_prompts("  best widget  \n\n\t\nwidget reviews\n");
        assert_eq!(prompts, vec!["best widget", "widget reviews"]);
        assert!(parse_text_prompts("").is_empty());
    }

    #[test]
    fn test_parse_text_prompts_mixed_line_endings() {
        let prompts = parse_text_prompts("first\rsecond\r\nthird\n");
        assert_eq!(prompts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_parse_json_array() {
        let prompts = parse_json_prompts(r#"["  a ", "", "b", 3]"#).unwrap();
        assert_eq!(prompts, vec!["a", "b", "3"]);
    }

    #[test]
    fn test_parse_json_object() {
        let prompts = parse_json_prompts(r#"{"prompts": ["x", "y"]}"#).unwrap();
        assert_eq!(prompts, vec!["x", "y"]);

        assert!(parse_json_prompts(r#"{"other": ["x"]}"#).unwrap().is_empty());
        assert!(parse_json_prompts("42").unwrap().is_empty());
        assert!(parse_json_prompts("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(parse_json_prompts("[not json").is_err());
    }

    #[test]
    fn test_load_prompts_by_extension() {
        let temp_dir = TempDir::new().unwrap();

        let text_path = temp_dir.path().join("prompts.txt");
        std::fs::write(&text_path, "first\nsecond\n").unwrap();
        assert_eq!(load_prompts(&text_path).unwrap(), vec!["first", "second"]);

        let json_path = temp_dir.path().join("prompts.JSON");
        std::fs::write(&json_path, r#"{"prompts": ["only"]}"#).unwrap();
        assert_eq!(load_prompts(&json_path).unwrap(), vec!["only"]);
    }

    #[test]
    fn test_load_prompts_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompts(&temp_dir.path().join("missing.txt")).is_err());
    }
}
