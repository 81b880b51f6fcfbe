use scraper::{Html, Selector};

/// Extracts candidate hrefs from an HTML document.
///
/// Returns the raw `href` values of all anchor elements, trimmed, in
/// document order. Anchors whose href contains a `#` are dropped here:
/// fragment navigation points back into a page rather than at a new one.
/// Everything else (relative paths, absolute URLs, other schemes) is kept
/// as written and left to the caller to resolve and filter.
///
/// # Examples
///
/// ```
/// use site_census::parser::extract_links;
///
/// let html = r#"<a href="/about">About</a><a href="/docs#intro">Docs</a>"#;
/// let links = extract_links(html);
/// assert_eq!(links, vec!["/about"]);
/// ```
pub fn extract_links(html_body: &str) -> Vec<String> {
    let document = Html::parse_document(html_body);
    let selector = Selector::parse("a[href]").expect("Invalid CSS selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.contains('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_links() {
        let html = r#"
            <html><body>
                <a href="https://test.local/one">One</a>
                <a href="https://test.local/two">Two</a>
            </body></html>
        "#;
        let links = extract_links(html);
        assert_eq!(
            links,
            vec!["https://test.local/one", "https://test.local/two"]
        );
    }

    #[test]
    fn test_extract_relative_links_kept_raw() {
        let html = r#"<a href="/about">About</a><a href="contact.html">Contact</a>"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["/about", "contact.html"]);
    }

    #[test]
    fn test_fragment_links_skipped() {
        let html = r##"
            <a href="#top">Top</a>
            <a href="/docs#section">Docs section</a>
            <a href="https://test.local/page#anchor">Anchored</a>
            <a href="/plain">Plain</a>
        "##;
        let links = extract_links(html);
        assert_eq!(links, vec!["/plain"]);
    }

    #[test]
    fn test_empty_and_whitespace_hrefs_skipped() {
        let html = r#"<a href="">Empty</a><a href="   ">Blank</a><a href=" /ok ">Ok</a>"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["/ok"]);
    }

    #[test]
    fn test_no_links() {
        let html = "<html><body><p>No links here</p></body></html>";
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_malformed_html_still_parses() {
        let html = r#"<a href="/one">One<a href="/two">Two"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["/one", "/two"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="marker">Marker</a><a href="/real">Real</a>"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["/real"]);
    }

    #[test]
    fn test_duplicate_links_preserved() {
        let html = r#"<a href="/same">A</a><a href="/same">B</a>"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["/same", "/same"]);
    }

    #[test]
    fn test_other_schemes_kept_for_caller_to_filter() {
        let html = r#"<a href="mailto:team@test.local">Mail</a><a href="/page">Page</a>"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["mailto:team@test.local", "/page"]);
    }
}
