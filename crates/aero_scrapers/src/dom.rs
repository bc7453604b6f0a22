use scraper::{ElementRef, Html, Selector};

use aero_core::extract::Fragment;
use aero_core::{Error, Result};

// Inline tags the station wraps values in; an empty stack of these is a
// blank value, not leaked markup.
const FORMATTING_TAGS: &[&str] = &["font", "strong", "small", "b", "i", "em", "span", "br"];

/// Decide the fragment shape of an element once, at the DOM boundary.
///
/// Text nodes are collected across the whole subtree, so the drifting stack
/// of formatting tags the station wraps values in does not matter. A textless
/// element is `Empty` when it holds nothing but formatting tags, and `Markup`
/// when some other element leaked into a position the caller expected to be
/// text.
pub fn fragment_of(el: ElementRef) -> Fragment {
    let texts: Vec<String> = el
        .text()
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.to_string())
        .collect();
    match texts.len() {
        0 => {
            let foreign_markup = el
                .descendants()
                .skip(1)
                .filter_map(|node| node.value().as_element())
                .any(|child| !FORMATTING_TAGS.contains(&child.name()));
            if foreign_markup {
                Fragment::Markup(el.html())
            } else {
                Fragment::Empty
            }
        }
        1 => Fragment::Text(texts.into_iter().next().unwrap()),
        _ => Fragment::List(texts),
    }
}

/// First match for a selector, or `Empty`.
pub fn select_fragment(document: &Html, selector: &str) -> Result<Fragment> {
    let selector = Selector::parse(selector)
        .map_err(|e| Error::UnexpectedShape(format!("invalid selector {:?}: {}", selector, e)))?;
    Ok(document
        .select(&selector)
        .next()
        .map(fragment_of)
        .unwrap_or(Fragment::Empty))
}
