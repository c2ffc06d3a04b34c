//! Result aggregation and statistics.
//!
//! This module summarizes analyzed results per chatbot for the
//! console summary printed at the end of a run.

use crate::models::{AnalyzedResult, Chatbot};
use std::collections::{BTreeMap, HashMap};

/// Aggregate visibility statistics for one chatbot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatbotSummary {
    /// Number of prompts analyzed.
    pub prompts: usize,
    /// Prompts where a target domain was cited.
    pub cited: usize,
    /// Sum of all first-citation ranks (for the mean).
    rank_total: usize,
    /// Total brand mentions across all answers.
    pub mentions: usize,
    /// Prompts answered with a live web search.
    pub web_search: usize,
    pub sources: usize,
    pub ugc_sources: usize,
    pub youtube_sources: usize,
}

impl ChatbotSummary {
    /// Creates a summary from a list of results.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a AnalyzedResult>) -> Self {
        let mut summary = Self::default();

        for result in results {
            summary.prompts += 1;
            if let Some(rank) = result.first_citation_rank {
                summary.cited += 1;
                summary.rank_total += rank;
            }
            summary.mentions += result.mentions;
            if result.used_web_search {
                summary.web_search += 1;
            }
            summary.sources += result.sources_count;
            summary.ugc_sources += result.ugc_sources_count;
            summary.youtube_sources += result.youtube_sources_count;
        }

        summary
    }

    /// Share of prompts with a citation, in percent.
    pub fn citation_rate(&self) -> f64 {
        percent(self.cited, self.prompts)
    }

    /// Share of prompts backed by web search, in percent.
    pub fn web_search_rate(&self) -> f64 {
        percent(self.web_search, self.prompts)
    }

    /// Mean first-citation rank over cited prompts.
    pub fn mean_rank(&self) -> Option<f64> {
        (self.cited > 0).then(|| self.rank_total as f64 / self.cited as f64)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Summarize results per chatbot, in job order.
pub fn summarize_by_chatbot(results: &[AnalyzedResult]) -> BTreeMap<Chatbot, ChatbotSummary> {
    let mut grouped: BTreeMap<Chatbot, Vec<&AnalyzedResult>> = BTreeMap::new();

    for result in results {
        grouped.entry(result.chatbot).or_default().push(result);
    }

    grouped
        .into_iter()
        .map(|(chatbot, group)| (chatbot, ChatbotSummary::from_results(group)))
        .collect()
}

/// Competitor domains by number of answers mentioning them, most frequent first.
pub fn top_competitors(results: &[AnalyzedResult], n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for result in results {
        for domain in &result.competitor_domains {
            *counts.entry(domain.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(domain, count)| (domain.to_string(), count))
        .collect();

    // Ties broken alphabetically so the output is stable.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);

    ranked
}

/// Generate a text summary of per-chatbot statistics.
pub fn generate_summary_text(results: &[AnalyzedResult]) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Total prompts analyzed: {}", results.len()));

    for (chatbot, summary) in summarize_by_chatbot(results) {
        let rank = summary
            .mean_rank()
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());

        lines.push(format!(
            "- {}: {} prompts | cited {} ({:.0}%) | mean rank {} | mentions {} | web search {:.0}% | sources {} (ugc {}, youtube {})",
            chatbot,
            summary.prompts,
            summary.cited,
            summary.citation_rate(),
            rank,
            summary.mentions,
            summary.web_search_rate(),
            summary.sources,
            summary.ugc_sources,
            summary.youtube_sources,
        ));
    }

    let competitors = top_competitors(results, 5);
    if !competitors.is_empty() {
        lines.push(String::new());
        lines.push("Top competitors:".to_string());

        for (domain, count) in competitors {
            lines.push(format!("- {}: {}", domain, count));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_result(chatbot: Chatbot, rank: Option<usize>, competitors: &[&str]) -> AnalyzedResult {
        AnalyzedResult {
            chatbot,
            prompt: "test prompt".to_string(),
            mentions: 2,
            cited: rank.is_some(),
            first_citation_rank: rank,
            fan_out_count: 0,
            used_web_search: rank.is_some(),
            sources_count: 3,
            ugc_sources_count: 1,
            youtube_sources_count: 0,
            competitor_domains: competitors.iter().map(|s| s.to_string()).collect(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_summarize_by_chatbot() {
        let results = vec![
            create_test_result(Chatbot::Gemini, None, &[]),
            create_test_result(Chatbot::ChatGpt, Some(1), &[]),
            create_test_result(Chatbot::ChatGpt, Some(3), &[]),
            create_test_result(Chatbot::ChatGpt, None, &[]),
        ];

        let summaries = summarize_by_chatbot(&results);
        let order: Vec<Chatbot> = summaries.keys().copied().collect();
        assert_eq!(order, vec![Chatbot::ChatGpt, Chatbot::Gemini]);

        let chatgpt = &summaries[&Chatbot::ChatGpt];
        assert_eq!(chatgpt.prompts, 3);
        assert_eq!(chatgpt.cited, 2);
        assert_eq!(chatgpt.mean_rank(), Some(2.0));
        assert_eq!(chatgpt.mentions, 6);
        assert_eq!(chatgpt.sources, 9);

        let gemini = &summaries[&Chatbot::Gemini];
        assert_eq!(gemini.mean_rank(), None);
        assert_eq!(gemini.citation_rate(), 0.0);
    }

    #[test]
    fn test_rates_on_empty_summary() {
        let summary = ChatbotSummary::default();
        assert_eq!(summary.citation_rate(), 0.0);
        assert_eq!(summary.web_search_rate(), 0.0);
    }

    #[test]
    fn test_top_competitors() {
        let results = vec![
            create_test_result(Chatbot::ChatGpt, None, &["b.com", "a.com"]),
            create_test_result(Chatbot::Gemini, None, &["b.com"]),
            create_test_result(Chatbot::Gemini, None, &["c.com"]),
        ];

        let top = top_competitors(&results, 2);
        assert_eq!(top, vec![("b.com".to_string(), 2), ("a.com".to_string(), 1)]);
    }

    #[test]
    fn test_generate_summary_text() {
        let results = vec![create_test_result(Chatbot::Perplexity, Some(2), &["rival.com"])];
        let text = generate_summary_text(&results);

        assert!(text.contains("Total prompts analyzed: 1"));
        assert!(text.contains("Perplexity: 1 prompts"));
        assert!(text.contains("mean rank 2.0"));
        assert!(text.contains("rival.com: 1"));
    }
}
