//! Pattern-based IOC extraction from unstructured text.
//!
//! Three independent, stateless scanners for dotted-quad IPs, URLs and
//! domain-like tokens. All of them return matches in order of occurrence
//! and an empty vec for empty input; none of them can fail.
//!
//! The IP pattern is syntactic only: octets above 255 (999.999.999.999)
//! still match. Semantic IPv4 validation is out of scope here, the goal
//! is triage material, not address validation. IPv6 is not extracted.

use once_cell::sync::Lazy;
use regex::Regex;

/// Dotted-quad shape, no octet range check.
static IP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("valid IP regex"));

/// http/https URLs over a conservative character set. Matching stops at the
/// first character outside the set, so query strings and fragments are cut.
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://(?:[-\w./]|%[0-9a-fA-F]{2})+").expect("valid URL regex"));

/// Free-standing domain tokens: dot-separated labels (alphanumeric with
/// internal hyphens, 63 chars max) ending in an alphabetic TLD of 2+ chars.
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}")
        .expect("valid domain regex")
});

/// Extract IP-shaped tokens from text, in order of occurrence.
pub fn extract_ips(text: &str) -> Vec<String> {
    IP_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Extract http/https URLs from text, in order of occurrence. Raw matches;
/// duplicates are left in (record assembly dedups).
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Extract domains from text: hosts pulled out of URL matches first, then
/// free-standing domain tokens from the full text. First-seen order,
/// deduplicated by exact string equality.
pub fn extract_domains(text: &str) -> Vec<String> {
    let mut domains = Vec::new();

    for url in extract_urls(text) {
        let host = url
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let host = host.split('/').next().unwrap_or("");
        push_unique(&mut domains, host);
    }

    for m in DOMAIN_RE.find_iter(text) {
        push_unique(&mut domains, m.as_str());
    }

    domains
}

/// Append a value unless it is empty or already present. Linear scan is
/// fine at the cardinalities a single message produces.
pub fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_vecs() {
        assert!(extract_ips("").is_empty());
        assert!(extract_urls("").is_empty());
        assert!(extract_domains("").is_empty());
    }

    #[test]
    fn no_ip_shaped_substrings() {
        assert!(extract_ips("nothing to see here, just 1.2 and 3.4.5").is_empty());
    }

    #[test]
    fn ips_in_order_of_occurrence() {
        let text = "from [203.0.113.7] by relay (10.0.0.1) id 4;";
        assert_eq!(extract_ips(text), vec!["203.0.113.7", "10.0.0.1"]);
    }

    #[test]
    fn ip_match_is_syntactic_only() {
        assert_eq!(extract_ips("bogus 999.999.999.999 hop"), vec!["999.999.999.999"]);
    }

    #[test]
    fn url_truncates_at_query_string() {
        let urls = extract_urls("visit https://example.com/page?x=1 now");
        assert_eq!(urls, vec!["https://example.com/page"]);
    }

    #[test]
    fn url_percent_escapes_survive() {
        let urls = extract_urls("get http://evil.example/a%2Fb here");
        assert_eq!(urls, vec!["http://evil.example/a%2Fb"]);
    }

    #[test]
    fn domains_merge_url_hosts_and_free_standing_tokens() {
        let text = "visit https://example.com/page?x=1 now, see also cdn.bad-host.net";
        let domains = extract_domains(text);
        assert_eq!(domains, vec!["example.com", "cdn.bad-host.net"]);
    }

    #[test]
    fn domains_are_deduplicated_first_seen() {
        let text = "http://a.example/x then a.example again and b.example";
        let domains = extract_domains(text);
        assert_eq!(domains, vec!["a.example", "b.example"]);
    }

    #[test]
    fn numeric_tld_is_not_a_domain() {
        // The free-standing scan requires an alphabetic final label.
        assert!(extract_domains("released 1.2.3 yesterday").is_empty());
    }

    #[test]
    fn push_unique_skips_empty_and_duplicates() {
        let mut list = Vec::new();
        push_unique(&mut list, "a.example");
        push_unique(&mut list, "");
        push_unique(&mut list, "a.example");
        push_unique(&mut list, "b.example");
        assert_eq!(list, vec!["a.example", "b.example"]);
    }
}
