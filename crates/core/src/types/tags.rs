//! Vendor tag normalization.
//!
//! Shopify encodes multi-value tags as a single comma-space-delimited string
//! (`"VIP, Newsletter"`). The internal model never depends on that encoding:
//! tags are normalized to a deduplicated list of trimmed strings at the
//! ingestion boundary, before any record reaches the reconciler.

/// Split a vendor tag string into a canonical list of tags.
///
/// Splits on commas, trims surrounding whitespace, drops empty segments, and
/// deduplicates while preserving first-seen order.
#[must_use]
pub fn normalize_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for segment in raw.split(',') {
        let tag = segment.trim();
        if tag.is_empty() {
            continue;
        }
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_space_delimited() {
        assert_eq!(normalize_tags("VIP, Newsletter"), vec!["VIP", "Newsletter"]);
    }

    #[test]
    fn test_no_space_after_comma() {
        assert_eq!(normalize_tags("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_string() {
        assert!(normalize_tags("").is_empty());
    }

    #[test]
    fn test_blank_segments_dropped() {
        assert_eq!(normalize_tags("VIP, , ,Newsletter,"), vec!["VIP", "Newsletter"]);
    }

    #[test]
    fn test_duplicates_removed_order_preserved() {
        assert_eq!(
            normalize_tags("wholesale, VIP, wholesale"),
            vec!["wholesale", "VIP"]
        );
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(
            normalize_tags("repeat buyer, VIP"),
            vec!["repeat buyer", "VIP"]
        );
    }
}
