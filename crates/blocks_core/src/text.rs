use scraper::ElementRef;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Collapses runs of whitespace into single spaces and trims both ends,
/// the way a browser renders normal-flow text.
pub(crate) fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Full descendant text of an element, normalized.
pub(crate) fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Trimmed, non-empty attribute value.
pub(crate) fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) fn tag_name(element: ElementRef) -> String {
    element.value().name().to_ascii_lowercase()
}

/// Whether `element` belongs to the HTML namespace rather than embedded
/// SVG or MathML.
pub(crate) fn is_html_element(element: ElementRef) -> bool {
    &*element.value().name.ns == HTML_NAMESPACE
}

/// Direct element children of `element`, in document order.
pub(crate) fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}
