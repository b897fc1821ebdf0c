use crate::model::{HeadingLevel, ListKind};

/// Elements whose subtree never carries document content.
const PRUNED_TAGS: &[&str] = &["script", "style", "link", "meta"];

/// How the transducer treats an element, decided from its tag name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCategory {
    /// Skipped together with all descendants.
    Pruned,
    Heading(HeadingLevel),
    Title,
    Paragraph,
    List(ListKind),
    Select,
    Anchor,
    Image,
    Table,
    /// Not converted itself; its children are walked instead.
    Container,
}

/// Classifies a lowercase tag name. Custom elements (any name with a
/// hyphen) are pruned.
pub fn classify(tag: &str) -> ElementCategory {
    if PRUNED_TAGS.contains(&tag) || tag.contains('-') {
        return ElementCategory::Pruned;
    }
    if let Some(level) = HeadingLevel::from_tag(tag) {
        return ElementCategory::Heading(level);
    }
    if let Some(kind) = ListKind::from_tag(tag) {
        return ElementCategory::List(kind);
    }
    match tag {
        "title" => ElementCategory::Title,
        "p" => ElementCategory::Paragraph,
        "select" => ElementCategory::Select,
        "a" => ElementCategory::Anchor,
        "img" => ElementCategory::Image,
        "table" => ElementCategory::Table,
        _ => ElementCategory::Container,
    }
}
