//! URL helpers shared by the link collector and the redirect logic.

use url::Url;

/// Suffixes that mark a URL as a static asset rather than a page.
const ASSET_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".svg"];

/// Resolve an href or Location value against the URL it appeared on.
///
/// Handles relative paths, protocol-relative forms and absolute URLs alike.
/// Returns None when the value cannot be turned into a valid URL.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    base.join(href).ok()
}

/// Case-insensitive test of the asset suffix list against the full URL
/// string. A query string or trailing path segment after the suffix makes
/// the URL count as a page again.
pub fn is_static_asset(url: &str) -> bool {
    let lowered = url.to_lowercase();
    ASSET_SUFFIXES
        .iter()
        .any(|suffix| lowered.ends_with(suffix))
}

/// Same-prefix scope rule: a URL is in scope iff its string form starts
/// with the root URL string. Plain text comparison, no host or path
/// normalization.
pub fn in_scope(url: &str, root: &str) -> bool {
    url.starts_with(root)
}
