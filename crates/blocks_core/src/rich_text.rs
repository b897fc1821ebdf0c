use scraper::node::Node;
use scraper::ElementRef;
use url::Url;

use crate::model::{ListKind, TextRun};
use crate::resolve::resolve_link;
use crate::text::{attr, element_text, tag_name};
use crate::ConvertError;

/// Converts the direct children of `element` into text runs.
///
/// - text nodes become one plain run each
/// - `a` children become one linked run
/// - nested `ul`/`ol` are skipped; lists are handled structurally
/// - any other element contributes its whole text as one plain run
///
/// Empty runs are dropped, so the result may be empty.
pub fn extract_rich_text(element: ElementRef, base: &Url) -> Result<Vec<TextRun>, ConvertError> {
    let mut runs = Vec::new();
    for child in element.children() {
        let run = match child.value() {
            Node::Text(text) => TextRun::plain(text),
            Node::Element(_) => match ElementRef::wrap(child) {
                Some(child) => inline_run(child, base)?,
                None => None,
            },
            _ => None,
        };
        runs.extend(run);
    }
    Ok(runs)
}

fn inline_run(element: ElementRef, base: &Url) -> Result<Option<TextRun>, ConvertError> {
    let tag = tag_name(element);
    if tag == "a" {
        return anchor_run(element, base);
    }
    if ListKind::from_tag(&tag).is_some() {
        return Ok(None);
    }
    Ok(TextRun::plain(&element_text(element)))
}

/// One run for an anchor: its visible text (or the raw href when the text is
/// empty), linked to the resolved href.
pub(crate) fn anchor_run(anchor: ElementRef, base: &Url) -> Result<Option<TextRun>, ConvertError> {
    let href = attr(anchor, "href");
    let link = match href {
        Some(href) => resolve_link(href, base)?,
        None => None,
    };
    let text = element_text(anchor);
    let content = if text.is_empty() {
        href.unwrap_or_default()
    } else {
        text.as_str()
    };
    Ok(TextRun::new(content, link))
}
