//! Record analysis.
//!
//! Turns one chatbot response record into an [`AnalyzedResult`].

use crate::analysis::metrics::{count_mentions, find_competitors, first_citation_rank, used_web_search};
use crate::analysis::record::ChatbotRecord;
use crate::analysis::sources::extract_sources;
use crate::models::{AnalyzedResult, SourceType};

/// Brand configuration the metrics are computed against.
#[derive(Debug, Clone, Default)]
pub struct BrandProfile {
    pub target_domains: Vec<String>,
    pub brand_terms: Vec<String>,
    pub competitor_domains: Vec<String>,
}

/// Analyze a single record.
///
/// Records without a prompt still produce a result (with an empty
/// `prompt`); dropping them is up to the caller.
pub fn analyze_record(record: &ChatbotRecord, profile: &BrandProfile) -> AnalyzedResult {
    let answer = record.normalize();
    let sources = extract_sources(&answer);

    let first_citation_rank = first_citation_rank(&sources, &profile.target_domains);
    let count_type = |t: SourceType| sources.iter().filter(|s| s.source_type == t).count();

    AnalyzedResult {
        chatbot: record.chatbot(),
        mentions: count_mentions(
            &answer.answer_markdown,
            &profile.brand_terms,
            &profile.target_domains,
        ),
        cited: first_citation_rank.is_some(),
        first_citation_rank,
        fan_out_count: answer.web_search_queries,
        used_web_search: used_web_search(&answer),
        sources_count: sources.len(),
        ugc_sources_count: count_type(SourceType::Ugc),
        youtube_sources_count: count_type(SourceType::Youtube),
        competitor_domains: find_competitors(&answer.answer_markdown, &profile.competitor_domains),
        prompt: answer.prompt,
        sources,
    }
}
