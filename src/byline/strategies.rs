use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

static PROFILE_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="@"]"#).unwrap());
static BYLINE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        ".byline",
        ".post-meta",
        r#"[data-testid="post-byline"]"#,
        ".author-name",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

/// Anchors whose visible text is longer than this many words are sentences,
/// not names.
const MAX_NAME_TOKENS: usize = 5;

/// One heuristic pass over a parsed article page. Byline markup varies
/// across publication themes, so several independent strategies run in
/// order and their candidates are unioned; a new theme means a new impl,
/// not a change to the driver.
pub trait Extract {
    /// Produce zero or more author-name candidates from the document.
    fn candidates(&self, doc: &Html) -> Vec<String>;
}

/// Profile-style links: any anchor whose target contains `@`, keeping the
/// visible text only when short enough to plausibly be a name.
pub struct ProfileLinks;

impl Extract for ProfileLinks {
    fn candidates(&self, doc: &Html) -> Vec<String> {
        doc.select(&PROFILE_LINKS)
            .map(|el| visible_text(el))
            .filter(|txt| {
                !txt.is_empty() && txt.split_whitespace().count() <= MAX_NAME_TOKENS
            })
            .collect()
    }
}

/// Fixed list of byline-ish selectors, taking each match's full visible
/// text as one candidate.
pub struct BylineSelectors;

impl Extract for BylineSelectors {
    fn candidates(&self, doc: &Html) -> Vec<String> {
        BYLINE_SELECTORS
            .iter()
            .flat_map(|sel| doc.select(sel))
            .map(|el| visible_text(el))
            .filter(|txt| !txt.is_empty())
            .collect()
    }
}

pub fn default_strategies() -> Vec<Box<dyn Extract>> {
    vec![Box::new(ProfileLinks), Box::new(BylineSelectors)]
}

/// Run the strategy list over an article page and union the candidates,
/// deduplicated in first-seen order. Unmatched pages yield an empty list.
pub fn extract_authors(html: &str, strategies: &[Box<dyn Extract>]) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut authors = Vec::new();
    for strategy in strategies {
        for candidate in strategy.candidates(&doc) {
            if !candidate.is_empty() && seen.insert(candidate.clone()) {
                authors.push(candidate);
            }
        }
    }
    authors
}

/// Element text with internal whitespace collapsed to single spaces.
fn visible_text(el: scraper::ElementRef) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn authors(html: &str) -> Vec<String> {
        extract_authors(html, &default_strategies())
    }

    #[test]
    fn article_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/article.html").unwrap();
        let got = authors(&html);
        assert_eq!(got, vec!["Jane Doe", "John Roe", "Jane Doe and John Roe"]);
    }

    #[test]
    fn no_matches_is_empty_not_error() {
        let got = authors("<html><body><p>Nothing to see</p></body></html>");
        assert!(got.is_empty());
    }

    #[test]
    fn profile_link_text_too_long_is_dropped() {
        let html = r#"<a href="/@jane">Read the latest dispatch from our newsroom today</a>"#;
        assert!(authors(html).is_empty());
    }

    #[test]
    fn profile_link_without_at_ignored() {
        let html = r#"<a href="/about">Jane Doe</a>"#;
        assert!(authors(html).is_empty());
    }

    #[test]
    fn dedup_preserves_first_seen_order() {
        let html = r#"
            <a href="/@jane">Jane Doe</a>
            <a href="/@jane2">Jane Doe</a>
            <a href="/@john">John Roe</a>
        "#;
        assert_eq!(authors(html), vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn byline_selector_whitespace_collapsed() {
        let html = "<div class=\"byline\">\n  Jane\n  Doe\n</div>";
        assert_eq!(authors(html), vec!["Jane Doe"]);
    }

    #[test]
    fn data_testid_byline_matched() {
        let html = r#"<span data-testid="post-byline">John Roe</span>"#;
        assert_eq!(authors(html), vec!["John Roe"]);
    }

    #[test]
    fn dedup_spans_strategies() {
        let html = r#"
            <a href="/@jane">Jane Doe</a>
            <div class="author-name">Jane Doe</div>
            <div class="byline">John Roe</div>
        "#;
        assert_eq!(authors(html), vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn strategies_union_across_markup() {
        let html = r#"
            <a href="/@jane">Jane Doe</a>
            <div class="author-name">John Roe</div>
        "#;
        assert_eq!(authors(html), vec!["Jane Doe", "John Roe"]);
    }
}
