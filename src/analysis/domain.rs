//! Domain normalization and classification.

use crate::models::SourceType;

const UGC_DOMAINS: &[&str] = &[
    "reddit.com",
    "quora.com",
    "medium.com",
    "stackoverflow.com",
    "stackexchange.com",
];

const YOUTUBE_DOMAINS: &[&str] = &["youtube.com", "youtu.be"];

/// Reduce a URL or bare host to a lowercase host.
///
/// Strips a leading `http://` or `https://` and everything from the
/// first `/` onward. Never fails; blank input yields an empty string.
pub fn normalize_domain(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    match without_scheme.split_once('/') {
        Some((host, _)) => host.to_string(),
        None => without_scheme.to_string(),
    }
}

/// Classify a domain or URL by suffix.
pub fn classify_domain(value: &str) -> SourceType {
    let domain = normalize_domain(value);

    if UGC_DOMAINS.iter().any(|d| domain.ends_with(d)) {
        SourceType::Ugc
    } else if YOUTUBE_DOMAINS.iter().any(|d| domain.ends_with(d)) {
        SourceType::Youtube
    } else {
        SourceType::Web
    }
}

/// Normalize a list of domains, dropping entries that end up empty.
pub fn normalize_domains<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|v| normalize_domain(v.as_ref()))
        .filter(|d| !d.is_empty())
        .collect()
}

/// True if `domain` is `target` or one of its subdomains.
pub fn matches_target(domain: &str, target: &str) -> bool {
    domain == target
        || domain
            .strip_suffix(target)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_and_path() {
        assert_eq!(normalize_domain("HTTPS://Example.com/path?q=1"), "example.com");
        assert_eq!(normalize_domain("http://acme.io"), "acme.io");
        assert_eq!(normalize_domain("  Sub.Acme.io/a/b "), "sub.acme.io");
    }

    #[test]
    fn test_normalize_blank() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("   "), "");
        assert_eq!(normalize_domain("https://"), "");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_domain("www.reddit.com"), SourceType::Ugc);
        assert_eq!(classify_domain("https://math.stackexchange.com/q/1"), SourceType::Ugc);
        assert_eq!(classify_domain("youtu.be"), SourceType::Youtube);
        assert_eq!(classify_domain("https://www.youtube.com/watch?v=1"), SourceType::Youtube);
        assert_eq!(classify_domain("acme.io"), SourceType::Web);
        assert_eq!(classify_domain(""), SourceType::Web);
    }

    #[test]
    fn test_normalize_domains_drops_empty() {
        let domains = normalize_domains(&["Acme.com", " ", "https://rival.io/x"]);
        assert_eq!(domains, vec!["acme.com", "rival.io"]);
    }

    #[test]
    fn test_matches_target() {
        assert!(matches_target("target.com", "target.com"));
        assert!(matches_target("sub.target.com", "target.com"));
        assert!(!matches_target("nottarget.com", "target.com"));
        assert!(!matches_target("target.com.evil", "target.com"));
    }
}
