//! Allow-list sanitization for upload metadata fields.
//!
//! The media store takes tags as a comma-delimited list and context as
//! pipe-delimited `key=value` pairs. Caller text is rebuilt item by item,
//! keeping only allow-listed characters, so it can never add a delimiter.

use crate::defaults::UNKNOWN_CLIENT_IP;

/// Tag list delimiter.
pub const TAG_DELIMITER: char = ',';

/// Context entry delimiter.
pub const CONTEXT_DELIMITER: char = '|';

/// Context key/value separator.
pub const CONTEXT_KV_SEPARATOR: char = '=';

/// Longest kept value for a single tag or context entry.
const MAX_ITEM_CHARS: usize = 128;

/// Characters allowed inside a tag or a context key/value.
pub fn is_allowed_field_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.' | ':' | '/' | '@' | '+')
}

/// Characters allowed in a network address.
fn is_allowed_address_char(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, '.' | ':')
}

/// Keep only allow-listed characters and trim the result.
pub fn sanitize_item(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| is_allowed_field_char(*c))
        .take(MAX_ITEM_CHARS)
        .collect();
    kept.trim().to_string()
}

/// Normalize a client network address, or `unknown` if nothing usable remains.
pub fn sanitize_address(input: &str) -> String {
    let kept: String = input
        .trim()
        .chars()
        .filter(|c| is_allowed_address_char(*c))
        .take(64)
        .collect();
    if kept.is_empty() {
        UNKNOWN_CLIENT_IP.to_string()
    } else {
        kept
    }
}

/// First hop of an `X-Forwarded-For` header value.
pub fn client_address(forwarded_for: Option<&str>) -> String {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(sanitize_address)
        .unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string())
}

/// Rebuild a caller tag list and append the `ip:<addr>` tag.
pub fn build_tags(caller_tags: Option<&str>, address: &str) -> String {
    let mut tags: Vec<String> = caller_tags
        .unwrap_or_default()
        .split(TAG_DELIMITER)
        .map(sanitize_item)
        .filter(|t| !t.is_empty())
        .collect();
    tags.push(format!("ip:{}", sanitize_address(address)));
    tags.join(&TAG_DELIMITER.to_string())
}

/// Rebuild caller context pairs and append the `ip=<addr>` entry.
///
/// Entries without a separator are kept as bare keys. Empty keys are dropped.
pub fn build_context(caller_context: Option<&str>, address: &str) -> String {
    let mut entries: Vec<String> = caller_context
        .unwrap_or_default()
        .split(CONTEXT_DELIMITER)
        .filter_map(|entry| {
            let (key, value) = match entry.split_once(CONTEXT_KV_SEPARATOR) {
                Some((k, v)) => (sanitize_item(k), Some(sanitize_item(v))),
                None => (sanitize_item(entry), None),
            };
            if key.is_empty() || key == "ip" {
                return None;
            }
            Some(match value {
                Some(v) => format!("{}{}{}", key, CONTEXT_KV_SEPARATOR, v),
                None => key,
            })
        })
        .collect();
    entries.push(format!(
        "ip{}{}",
        CONTEXT_KV_SEPARATOR,
        sanitize_address(address)
    ));
    entries.join(&CONTEXT_DELIMITER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_item_strips_delimiters() {
        assert_eq!(sanitize_item("a,b|c=d"), "abcd");
        assert_eq!(sanitize_item("  summer shoot  "), "summer shoot");
        assert_eq!(sanitize_item("<script>"), "script");
    }

    #[test]
    fn test_sanitize_item_keeps_unicode_letters() {
        assert_eq!(sanitize_item("café-séance"), "café-séance");
    }

    #[test]
    fn test_sanitize_item_truncates() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_item(&long).len(), MAX_ITEM_CHARS);
    }

    #[test]
    fn test_client_address_first_hop() {
        assert_eq!(client_address(Some("203.0.113.7, 10.0.0.1")), "203.0.113.7");
        assert_eq!(client_address(Some("2001:db8::1")), "2001:db8::1");
        assert_eq!(client_address(None), "unknown");
        assert_eq!(client_address(Some("")), "unknown");
    }

    #[test]
    fn test_client_address_cannot_inject() {
        let addr = client_address(Some("1.2.3.4|admin=true"));
        assert!(addr.starts_with("1.2.3.4"));
        assert!(!addr.contains('|'));
        assert!(!addr.contains('='));
    }

    #[test]
    fn test_build_tags_without_caller_tags() {
        assert_eq!(build_tags(None, "1.2.3.4"), "ip:1.2.3.4");
        assert_eq!(build_tags(Some(""), "1.2.3.4"), "ip:1.2.3.4");
    }

    #[test]
    fn test_build_tags_rebuilds_caller_list() {
        assert_eq!(
            build_tags(Some("portrait, studio ,,"), "1.2.3.4"),
            "portrait,studio,ip:1.2.3.4"
        );
    }

    #[test]
    fn test_build_tags_neutralizes_injection() {
        let tags = build_tags(Some("a|context=evil"), "1.2.3.4");
        assert_eq!(tags, "acontextevil,ip:1.2.3.4");
    }

    #[test]
    fn test_build_context_pairs() {
        assert_eq!(
            build_context(Some("source=app|step=3"), "1.2.3.4"),
            "source=app|step=3|ip=1.2.3.4"
        );
    }

    #[test]
    fn test_build_context_without_caller_context() {
        assert_eq!(build_context(None, "unknown"), "ip=unknown");
    }

    #[test]
    fn test_build_context_drops_spoofed_ip_and_empty_keys() {
        assert_eq!(
            build_context(Some("ip=9.9.9.9|=orphan|flag"), "1.2.3.4"),
            "flag|ip=1.2.3.4"
        );
    }

    #[test]
    fn test_build_context_value_cannot_add_separator() {
        let ctx = build_context(Some("note=a=b,c"), "1.2.3.4");
        assert_eq!(ctx, "note=abc|ip=1.2.3.4");
    }
}
