//! `link` response-header parsing for cursor pagination.
//!
//! Shopify paginates list endpoints with an opaque `page_info` token embedded
//! in a `link` header, e.g.:
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/orders.json?page_info=abc&limit=250>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-01/orders.json?page_info=def&limit=250>; rel="next"
//! ```

/// Extract the `page_info` token for the `rel="next"` relation, if present.
#[must_use]
pub fn next_page_info(link_header: &str) -> Option<String> {
    for part in link_header.split(',') {
        let mut sections = part.split(';');
        let url_section = sections.next()?.trim();

        let is_next = sections
            .any(|param| param.trim().eq_ignore_ascii_case(r#"rel="next""#));
        if !is_next {
            continue;
        }

        let url = url_section.strip_prefix('<')?.strip_suffix('>')?;
        return page_info_param(url);
    }
    None
}

/// Extract the `page_info` query parameter value from a URL.
fn page_info_param(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("page_info="))
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEXT_ONLY: &str =
        r#"<https://x.myshopify.com/admin/api/2024-01/orders.json?page_info=tokenA&limit=250>; rel="next""#;

    const BOTH: &str = concat!(
        r#"<https://x.myshopify.com/admin/api/2024-01/orders.json?page_info=prevTok&limit=250>; rel="previous", "#,
        r#"<https://x.myshopify.com/admin/api/2024-01/orders.json?limit=250&page_info=nextTok>; rel="next""#
    );

    #[test]
    fn test_next_only() {
        assert_eq!(next_page_info(NEXT_ONLY).as_deref(), Some("tokenA"));
    }

    #[test]
    fn test_previous_and_next() {
        assert_eq!(next_page_info(BOTH).as_deref(), Some("nextTok"));
    }

    #[test]
    fn test_previous_only() {
        let header =
            r#"<https://x.myshopify.com/admin/api/2024-01/orders.json?page_info=p>; rel="previous""#;
        assert_eq!(next_page_info(header), None);
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(next_page_info(""), None);
    }

    #[test]
    fn test_missing_page_info_param() {
        let header = r#"<https://x.myshopify.com/admin/api/2024-01/orders.json?limit=250>; rel="next""#;
        assert_eq!(next_page_info(header), None);
    }
}
