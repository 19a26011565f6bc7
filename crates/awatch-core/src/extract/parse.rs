//! Collect admissible links from the card containers of a listing page.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

use super::filter::{anchor_text, contains_sponsor_keyword, looks_like_article_link, normalize_href};
use super::{ExtractError, ExtractRules};

/// Links found in card containers, sorted and unique.
///
/// Fails with `ExtractError::Structural` when the page yields no admissible
/// link at all, which usually means the markup changed.
pub fn collect_card_links(html: &str, rules: &ExtractRules) -> Result<Vec<String>, ExtractError> {
    let base = Url::parse(&rules.target_url).map_err(|source| ExtractError::TargetUrl {
        url: rules.target_url.clone(),
        source,
    })?;
    let cards = parse_selector(&rules.card_selector)?;
    let anchors = parse_selector("a[href]")?;

    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();
    let mut containers = 0usize;
    let mut sponsored = 0usize;

    for card in document.select(&cards) {
        containers += 1;
        for anchor in card.select(&anchors) {
            let Some(href) = anchor
                .value()
                .attr("href")
                .and_then(|h| normalize_href(h, &base))
            else {
                continue;
            };
            if contains_sponsor_keyword(&anchor_text(&anchor), &rules.sponsor_keywords) {
                sponsored += 1;
                continue;
            }
            if looks_like_article_link(&href, rules) {
                links.insert(href);
            }
        }
    }

    tracing::debug!(containers, sponsored, links = links.len(), "scanned card containers");

    if links.is_empty() {
        let reason = if containers == 0 {
            format!(
                "Card セレクタ `{}` に一致する要素がありませんでした。ページ構造が変わっていないか確認してください。",
                rules.card_selector
            )
        } else {
            "Card セレクタに一致する書評リンクを取得できませんでした。ページ構造が変わっていないか確認してください。"
                .to_string()
        };
        return Err(ExtractError::Structural { reason });
    }

    Ok(links.into_iter().collect())
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
