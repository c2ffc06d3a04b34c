//! Source extraction.
//!
//! Merges an answer's citations and sources into one ordered list of
//! [`Source`] values with normalized domains and a site classification.

use crate::analysis::domain::{classify_domain, normalize_domain};
use crate::analysis::record::{AnswerRecord, Reference};
use crate::models::Source;
use url::Url;

/// Extract sources from an answer, citations first.
///
/// Entries with neither a URL nor a title are dropped.
pub fn extract_sources(answer: &AnswerRecord) -> Vec<Source> {
    answer
        .citations
        .iter()
        .chain(answer.sources.iter())
        .map(to_source)
        .filter(|s| s.url.is_some() || s.title.is_some())
        .collect()
}

fn to_source(reference: &Reference) -> Source {
    let domain = reference
        .domain
        .clone()
        .or_else(|| reference.url.as_deref().map(host_of).filter(|h| !h.is_empty()))
        .unwrap_or_default();

    let source_type = if domain.is_empty() {
        classify_domain(reference.url.as_deref().unwrap_or(""))
    } else {
        classify_domain(&domain)
    };

    Source {
        title: reference.title.clone(),
        url: reference.url.clone(),
        domain: Some(normalize_domain(&domain)).filter(|d| !d.is_empty()),
        source_type,
    }
}

/// Host component of a URL, empty if it cannot be parsed.
///
/// `Url` stores internationalized hosts as punycode; they are turned back
/// into Unicode so they compare equal to configured target domains.
fn host_of(url: &str) -> String {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) else {
        return String::new();
    };

    if !host.contains("xn--") {
        return host;
    }

    match idna::domain_to_unicode(&host) {
        (unicode, Ok(())) => unicode,
        (_, Err(_)) => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;

    fn reference(url: Option<&str>, title: Option<&str>, domain: Option<&str>) -> Reference {
        Reference {
            url: url.map(String::from),
            title: title.map(String::from),
            domain: domain.map(String::from),
        }
    }

    #[test]
    fn test_empty_answer_has_no_sources() {
        assert!(extract_sources(&AnswerRecord::default()).is_empty());
    }

    #[test]
    fn test_citations_come_before_sources() {
        let answer = AnswerRecord {
            citations: vec![reference(Some("https://first.com/a"), None, None)],
            sources: vec![reference(Some("https://second.com/b"), None, None)],
            ..Default::default()
        };

        let sources = extract_sources(&answer);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].domain.as_deref(), Some("first.com"));
        assert_eq!(sources[1].domain.as_deref(), Some("second.com"));
    }

    #[test]
    fn test_explicit_domain_wins_over_url() {
        let answer = AnswerRecord {
            sources: vec![reference(
                Some("https://redirect.example/x"),
                Some("Thread"),
                Some("WWW.Reddit.com"),
            )],
            ..Default::default()
        };

        let sources = extract_sources(&answer);
        assert_eq!(sources[0].domain.as_deref(), Some("www.reddit.com"));
        assert_eq!(sources[0].source_type, SourceType::Ugc);
    }

    #[test]
    fn test_unparseable_url_leaves_domain_empty() {
        let answer = AnswerRecord {
            citations: vec![reference(Some("youtube.com/watch?v=1"), None, None)],
            ..Default::default()
        };

        let sources = extract_sources(&answer);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].domain, None);
        // Classification still falls back to the raw URL.
        assert_eq!(sources[0].source_type, SourceType::Youtube);
    }

    #[test]
    fn test_unicode_host_stays_unicode() {
        let answer = AnswerRecord {
            citations: vec![
                reference(Some("https://Bücher.de/page"), None, None),
                reference(Some("https://xn--bcher-kva.de/other"), None, None),
            ],
            ..Default::default()
        };

        let sources = extract_sources(&answer);
        assert_eq!(sources[0].domain.as_deref(), Some("bücher.de"));
        assert_eq!(sources[1].domain.as_deref(), Some("bücher.de"));
    }

    #[test]
    fn test_drops_entries_without_url_or_title() {
        let answer = AnswerRecord {
            citations: vec![
                reference(None, None, Some("acme.com")),
                reference(None, Some("Only a title"), None),
            ],
            ..Default::default()
        };

        let sources = extract_sources(&answer);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title.as_deref(), Some("Only a title"));
        assert_eq!(sources[0].domain, None);
        assert_eq!(sources[0].source_type, SourceType::Web);
        assert!(sources.iter().all(|s| s.url.is_some() || s.title.is_some()));
    }
}
