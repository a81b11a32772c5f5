//! Link discovery in notification email bodies.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::order::rules::patterns::{ORDER_NUMBER, URL};

/// Host suffix of Outlook's link-rewriting service.
const SAFELINKS_HOST: &str = "safelinks.protection.outlook.com";

/// Characters stripped from the end of a URL found in running text.
const URL_TRAILING: &[char] = &['\'', ')', '.', ',', '>', '\\', '"', ']'];

/// Percent-decoding passes applied to each candidate.
const DECODE_PASSES: usize = 3;

/// Decoded variants of a string: the original, HTML-unescaped, then up to
/// three percent-decoding passes. Duplicates are dropped, order is kept.
pub fn decode_candidates(s: &str) -> Vec<String> {
    let mut variants = Vec::new();
    if s.is_empty() {
        return variants;
    }

    variants.push(s.to_string());

    let mut current = html_escape::decode_html_entities(s).into_owned();
    push_unique(&mut variants, current.clone());

    for _ in 0..DECODE_PASSES {
        current = percent_decode(&current);
        push_unique(&mut variants, current.clone());
    }

    variants
}

/// Find URLs in text, unwrapping Outlook SafeLinks to their target.
pub fn extract_urls(s: &str) -> Vec<String> {
    URL.find_iter(s)
        .filter_map(|m| {
            let url = m.as_str().trim_end_matches(URL_TRAILING);
            match unwrap_safelink(url) {
                Some(target) => target,
                None => Some(url.to_string()),
            }
        })
        .collect()
}

/// Order numbers (`/orders/<digits>`) appearing in a string.
pub fn order_numbers_in(s: &str) -> impl Iterator<Item = &str> {
    ORDER_NUMBER
        .captures_iter(s)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// `None` when the URL is not a SafeLink; `Some(None)` when it is one
/// without a target.
fn unwrap_safelink(url: &str) -> Option<Option<String>> {
    let parsed = Url::parse(url).ok()?;
    if !parsed.host_str()?.contains(SAFELINKS_HOST) {
        return None;
    }

    let target = parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());

    Some(target.map(|mut value| {
        for _ in 0..DECODE_PASSES {
            value = percent_decode(&value);
        }
        value
    }))
}

fn percent_decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

fn push_unique(variants: &mut Vec<String>, value: String) {
    if !variants.contains(&value) {
        variants.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_candidates() {
        let s = "https%253A%252F%252Fwww.walmart.ca%252Forders%252F123&amp;x";
        let variants = decode_candidates(s);
        assert_eq!(variants[0], s);
        assert_eq!(
            variants[1],
            "https%253A%252F%252Fwww.walmart.ca%252Forders%252F123&x"
        );
        assert_eq!(variants[2], "https%3A%2F%2Fwww.walmart.ca%2Forders%2F123&x");
        assert_eq!(variants[3], "https://www.walmart.ca/orders/123&x");
        assert_eq!(variants.len(), 4);
    }

    #[test]
    fn test_decode_candidates_empty() {
        assert!(decode_candidates("").is_empty());
        assert_eq!(decode_candidates("plain"), vec!["plain".to_string()]);
    }

    #[test]
    fn test_extract_urls_trims_punctuation() {
        let urls = extract_urls(
            r#"See (https://www.walmart.ca/en/orders/200013456789). or <a href="https://x.test/a">"#,
        );
        assert_eq!(
            urls,
            vec![
                "https://www.walmart.ca/en/orders/200013456789".to_string(),
                "https://x.test/a".to_string(),
            ]
        );
    }

    #[test]
    fn test_unwraps_safelinks() {
        let text = "https://can01.safelinks.protection.outlook.com/?url=https%3A%2F%2Fwww.walmart.ca%2Fen%2Forders%2F200013456789%3Fsrc%3Demail&data=05";
        let urls = extract_urls(text);
        assert_eq!(
            urls,
            vec!["https://www.walmart.ca/en/orders/200013456789?src=email".to_string()]
        );
    }

    #[test]
    fn test_safelink_without_target_is_dropped() {
        let text = "https://can01.safelinks.protection.outlook.com/?data=05";
        assert!(extract_urls(text).is_empty());
    }

    #[test]
    fn test_order_numbers_in() {
        let found: Vec<&str> =
            order_numbers_in("/en/orders/111 and /ORDERS/222?x /orders/abc").collect();
        assert_eq!(found, vec!["111", "222"]);
    }
}
