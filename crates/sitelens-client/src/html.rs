use scraper::{ElementRef, Html, Selector};
use sitelens_core::WebsiteData;

/// Elements whose subtrees never contribute visible text.
const SKIPPED_TAGS: [&str; 4] = ["script", "style", "img", "input"];

/// Reduces an HTML document to its title and visible body text.
///
/// Body text nodes outside [`SKIPPED_TAGS`] are trimmed individually and
/// joined with newlines, in document order. Whitespace-only nodes are dropped.
pub fn parse_page(url: &str, html: &str) -> WebsiteData {
    let document = Html::parse_document(html);

    let title = extract_title(&document).unwrap_or_else(|| WebsiteData::NO_TITLE.to_string());
    let text = extract_body_text(&document).unwrap_or_else(|| WebsiteData::NO_BODY.to_string());

    WebsiteData::new(url, title, text)
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}

fn extract_body_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("body").ok()?;
    let body = document.select(&selector).next()?;

    let mut lines = Vec::new();
    collect_visible_text(body, &mut lines);

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Appends the trimmed, non-empty text nodes under `root` to `lines`.
///
/// The parser keeps `<noscript>` content as a single raw text node, so that
/// text is parsed again as a fragment and walked with the same rules.
fn collect_visible_text(root: ElementRef<'_>, lines: &mut Vec<String>) {
    for node in root.descendants() {
        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
        });
        if skipped {
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let in_noscript = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name() == "noscript"))
            .unwrap_or(false);
        if in_noscript {
            let fragment = Html::parse_fragment(text);
            collect_visible_text(fragment.root_element(), lines);
            continue;
        }

        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }
}
