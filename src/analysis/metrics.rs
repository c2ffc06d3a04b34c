//! Visibility metric calculators.
//!
//! Each function is pure and independent; the analyzer composes them.

use crate::analysis::domain::{matches_target, normalize_domain, normalize_domains};
use crate::analysis::record::{AnswerRecord, CHATGPT_SEARCH_MARKER};
use crate::models::Source;
use std::collections::BTreeSet;

/// Count case-insensitive literal occurrences of brand terms and target
/// domains in `text`.
///
/// Every non-overlapping occurrence of every term counts, so a brand term
/// that is also part of a target domain is counted once for each.
pub fn count_mentions<S: AsRef<str>>(text: &str, brand_terms: &[S], target_domains: &[S]) -> usize {
    if text.is_empty() {
        return 0;
    }

    let hay = text.to_lowercase();

    let terms = brand_terms
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty());
    let domains = normalize_domains(target_domains);

    terms
        .chain(domains)
        .map(|needle| hay.matches(needle.as_str()).count())
        .sum()
}

/// 1-based position of the first source hosted on a target domain.
///
/// A source without a domain is compared by its URL instead.
pub fn first_citation_rank<S: AsRef<str>>(sources: &[Source], target_domains: &[S]) -> Option<usize> {
    let targets = normalize_domains(target_domains);

    sources.iter().enumerate().find_map(|(index, source)| {
        let key = source
            .domain
            .as_deref()
            .or(source.url.as_deref())
            .map(normalize_domain)
            .unwrap_or_default();

        if key.is_empty() {
            return None;
        }

        targets
            .iter()
            .any(|t| matches_target(&key, t))
            .then_some(index + 1)
    })
}

/// Whether a live web search backed the answer.
pub fn used_web_search(answer: &AnswerRecord) -> bool {
    answer.web_search_queries > 0
        || answer.web_search_triggered
        || answer
            .citations
            .iter()
            .filter_map(|c| c.url.as_deref())
            .any(|url| url.contains(CHATGPT_SEARCH_MARKER))
}

/// Competitor domains mentioned in `text`, sorted and de-duplicated.
pub fn find_competitors<S: AsRef<str>>(text: &str, competitor_domains: &[S]) -> Vec<String> {
    let hay = text.to_lowercase();

    normalize_domains(competitor_domains)
        .into_iter()
        .filter(|d| hay.contains(d.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::record::Reference;
    use crate::models::SourceType;

    fn source(domain: Option<&str>, url: Option<&str>) -> Source {
        Source {
            title: None,
            url: url.map(String::from),
            domain: domain.map(String::from),
            source_type: SourceType::Web,
        }
    }

    #[test]
    fn test_count_mentions_counts_every_occurrence() {
        assert_eq!(count_mentions("Acme Acme", &["acme"], &[]), 2);
        assert_eq!(count_mentions("ACME, acme and Acme!", &["Acme"], &[]), 3);
    }

    #[test]
    fn test_count_mentions_empty_text() {
        assert_eq!(count_mentions("", &["acme"], &["acme.com"]), 0);
    }

    #[test]
    fn test_count_mentions_sums_terms_and_domains() {
        // "acme" matches inside "acme.com" too; both are counted.
        let text = "Try Acme at https://Acme.com today";
        assert_eq!(count_mentions(text, &["acme"], &["https://acme.com/"]), 3);
    }

    #[test]
    fn test_count_mentions_is_literal() {
        assert_eq!(count_mentions("a.b axb", &["a.b"], &[]), 1);
        assert_eq!(count_mentions("aaaa", &["aa"], &[]), 2);
        assert_eq!(count_mentions("acme", &["  ", ""], &[" "]), 0);
    }

    #[test]
    fn test_first_citation_rank_subdomain() {
        let sources = vec![source(Some("other.com"), None), source(Some("sub.target.com"), None)];
        assert_eq!(first_citation_rank(&sources, &["target.com"]), Some(2));
    }

    #[test]
    fn test_first_citation_rank_absent() {
        let sources = vec![source(Some("other.com"), None), source(Some("nottarget.com"), None)];
        assert_eq!(first_citation_rank(&sources, &["target.com"]), None);
        assert_eq!(first_citation_rank::<&str>(&sources, &[]), None);
    }

    #[test]
    fn test_first_citation_rank_falls_back_to_url() {
        let sources = vec![
            source(None, None),
            source(None, Some("target.com/pricing")),
        ];
        assert_eq!(first_citation_rank(&sources, &["HTTPS://Target.com"]), Some(2));
    }

    #[test]
    fn test_first_citation_rank_takes_first_match() {
        let sources = vec![
            source(Some("a.com"), None),
            source(Some("target.com"), None),
            source(Some("www.target.com"), None),
        ];
        assert_eq!(first_citation_rank(&sources, &["target.com"]), Some(2));
    }

    #[test]
    fn test_used_web_search_signals() {
        let mut answer = AnswerRecord::default();
        assert!(!used_web_search(&answer));

        answer.web_search_queries = 1;
        assert!(used_web_search(&answer));

        let answer = AnswerRecord {
            web_search_triggered: true,
            ..Default::default()
        };
        assert!(used_web_search(&answer));

        let answer = AnswerRecord {
            citations: vec![Reference {
                url: Some("https://acme.com/?utm_source=chatgpt.com".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(used_web_search(&answer));
    }

    #[test]
    fn test_search_marker_only_counts_in_citations() {
        let answer = AnswerRecord {
            sources: vec![Reference {
                url: Some("https://acme.com/?utm_source=chatgpt.com".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(!used_web_search(&answer));
    }

    #[test]
    fn test_find_competitors_sorted_and_deduplicated() {
        let text = "Visit rival.com today. Really, visit Rival.com!";
        assert_eq!(
            find_competitors(text, &["rival.com", "other.com"]),
            vec!["rival.com"]
        );

        let text = "zeta.io beats alpha.io";
        assert_eq!(
            find_competitors(text, &["zeta.io", "alpha.io", "https://zeta.io/"]),
            vec!["alpha.io", "zeta.io"]
        );
    }
}
