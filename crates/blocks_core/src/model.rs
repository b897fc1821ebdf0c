use std::fmt;

use crate::text::normalize_whitespace;

/// A fragment of text, optionally linked. Content is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    content: String,
    link: Option<String>,
}

impl TextRun {
    /// Builds a run from raw markup text. Whitespace is collapsed and the
    /// result trimmed; returns `None` when nothing visible remains.
    pub fn new(raw: &str, link: Option<String>) -> Option<Self> {
        let content = normalize_whitespace(raw);
        if content.is_empty() {
            return None;
        }
        Some(Self { content, link })
    }

    pub fn plain(raw: &str) -> Option<Self> {
        Self::new(raw, None)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::One),
            "h2" => Some(Self::Two),
            "h3" => Some(Self::Three),
            _ => None,
        }
    }
}

/// Which list-item kind a list container produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ul" => Some(Self::Bulleted),
            "ol" => Some(Self::Numbered),
            _ => None,
        }
    }
}

/// One table row; each cell is a sequence of plain-text fragments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BulletedListItem,
    NumberedListItem,
    Toggle,
    Image,
    Table,
    TableRow,
}

impl BlockKind {
    /// Wire name of the kind, also used as the payload key.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::Paragraph => "paragraph",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::Toggle => "toggle",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::TableRow => "table_row",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the target document tree.
///
/// Each variant carries only the fields valid for its kind; children are
/// only possible on list items and toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        rich_text: Vec<TextRun>,
    },
    Paragraph {
        rich_text: Vec<TextRun>,
    },
    BulletedListItem {
        rich_text: Vec<TextRun>,
        children: Vec<Block>,
    },
    NumberedListItem {
        rich_text: Vec<TextRun>,
        children: Vec<Block>,
    },
    Toggle {
        rich_text: Vec<TextRun>,
        children: Vec<Block>,
    },
    Image {
        url: String,
    },
    Table {
        table_width: usize,
        has_column_header: bool,
        rows: Vec<TableRow>,
    },
    TableRow(TableRow),
}

impl Block {
    pub fn list_item(kind: ListKind, rich_text: Vec<TextRun>, children: Vec<Block>) -> Self {
        match kind {
            ListKind::Bulleted => Block::BulletedListItem {
                rich_text,
                children,
            },
            ListKind::Numbered => Block::NumberedListItem {
                rich_text,
                children,
            },
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { level, .. } => match level {
                HeadingLevel::One => BlockKind::Heading1,
                HeadingLevel::Two => BlockKind::Heading2,
                HeadingLevel::Three => BlockKind::Heading3,
            },
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::BulletedListItem { .. } => BlockKind::BulletedListItem,
            Block::NumberedListItem { .. } => BlockKind::NumberedListItem,
            Block::Toggle { .. } => BlockKind::Toggle,
            Block::Image { .. } => BlockKind::Image,
            Block::Table { .. } => BlockKind::Table,
            Block::TableRow(_) => BlockKind::TableRow,
        }
    }

    pub fn rich_text(&self) -> &[TextRun] {
        match self {
            Block::Heading { rich_text, .. }
            | Block::Paragraph { rich_text }
            | Block::BulletedListItem { rich_text, .. }
            | Block::NumberedListItem { rich_text, .. }
            | Block::Toggle { rich_text, .. } => rich_text,
            Block::Image { .. } | Block::Table { .. } | Block::TableRow(_) => &[],
        }
    }

    pub fn children(&self) -> &[Block] {
        match self {
            Block::BulletedListItem { children, .. }
            | Block::NumberedListItem { children, .. }
            | Block::Toggle { children, .. } => children,
            _ => &[],
        }
    }

    /// Concatenated run contents, handy for logging and assertions.
    pub fn plain_text(&self) -> String {
        self.rich_text()
            .iter()
            .map(TextRun::content)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
