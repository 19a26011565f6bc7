//! Per-anchor admission rules: href normalization, article-shape check, sponsor check.

use scraper::ElementRef;
use url::Url;

use super::ExtractRules;

/// Path segments that mark navigation pages rather than articles.
const EXCLUDED_SEGMENTS: [&str; 4] = ["/tag/", "/category/", "/author/", "/video/"];

const ARTICLE_SEGMENT: &str = "/article/";

/// Normalize an anchor href to an absolute URL.
///
/// Hrefs starting with `http` are kept verbatim; hrefs starting with `/` are
/// resolved against `base` without re-encoding the path, so a relative and an
/// absolute link to the same article give the same string. Everything else
/// (fragments, `mailto:`, bare relative paths, empty strings) yields `None`.
pub fn normalize_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    if href.starts_with("//") {
        return Some(format!("{}:{}", base.scheme(), href));
    }
    if href.starts_with('/') {
        let origin = base.origin();
        if !origin.is_tuple() {
            return None;
        }
        return Some(format!("{}{}", origin.ascii_serialization(), href));
    }
    None
}

/// Whether an absolute URL has the shape of an article on the watched site.
///
/// Excluded segments win over the positive markers, so `/tag/.../article/`
/// is rejected.
pub fn looks_like_article_link(url: &str, rules: &ExtractRules) -> bool {
    if !url.starts_with(&rules.site_prefix) {
        return false;
    }
    if EXCLUDED_SEGMENTS.iter().any(|seg| url.contains(seg)) {
        return false;
    }
    (!rules.section_marker.is_empty() && url.contains(&rules.section_marker))
        || url.contains(ARTICLE_SEGMENT)
}

/// Visible text of an anchor: every text node trimmed, empties dropped, joined by spaces.
pub fn anchor_text(anchor: &ElementRef<'_>) -> String {
    anchor
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn contains_sponsor_keyword(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| text.contains(&k.to_lowercase()))
}
