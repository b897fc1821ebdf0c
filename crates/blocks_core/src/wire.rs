//! JSON shape of blocks as accepted by the block-append endpoint.
//!
//! ```json
//! {"object": "block", "type": "paragraph",
//!  "paragraph": {"rich_text": [{"type": "text", "text": {"content": "Hi"}}]}}
//! ```

use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::{json, Value};

use crate::model::{Block, TableRow, TextRun};

/// Longest `content` a single text object may carry.
pub const MAX_TEXT_CONTENT: usize = 2000;

/// Request body appending `blocks` as children of a container.
pub fn append_payload(blocks: &[Block]) -> Value {
    json!({ "children": blocks })
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind().as_str();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", kind)?;
        match self {
            Block::Heading { rich_text, .. } | Block::Paragraph { rich_text } => {
                map.serialize_entry(
                    kind,
                    &TextPayload {
                        rich_text: RichText(rich_text),
                    },
                )?;
            }
            Block::BulletedListItem {
                rich_text,
                children,
            }
            | Block::NumberedListItem {
                rich_text,
                children,
            }
            | Block::Toggle {
                rich_text,
                children,
            } => {
                map.serialize_entry(
                    kind,
                    &NestedPayload {
                        rich_text: RichText(rich_text),
                        children,
                    },
                )?;
            }
            Block::Image { url } => {
                map.serialize_entry(
                    kind,
                    &ImagePayload {
                        kind: "external",
                        external: LinkTarget { url },
                    },
                )?;
            }
            Block::Table {
                table_width,
                has_column_header,
                rows,
            } => {
                map.serialize_entry(
                    kind,
                    &TablePayload {
                        table_width: *table_width,
                        has_column_header: *has_column_header,
                        has_row_header: false,
                        children: rows.iter().map(RowBlock).collect(),
                    },
                )?;
            }
            Block::TableRow(row) => {
                map.serialize_entry(kind, &RowPayload::new(row))?;
            }
        }
        map.end()
    }
}

#[derive(Serialize)]
struct TextPayload<'a> {
    rich_text: RichText<'a>,
}

#[derive(Serialize)]
struct NestedPayload<'a> {
    rich_text: RichText<'a>,
    #[serde(skip_serializing_if = "no_children")]
    children: &'a [Block],
}

fn no_children(children: &&[Block]) -> bool {
    children.is_empty()
}

#[derive(Serialize)]
struct ImagePayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    external: LinkTarget<'a>,
}

#[derive(Serialize)]
struct TablePayload<'a> {
    table_width: usize,
    has_column_header: bool,
    has_row_header: bool,
    children: Vec<RowBlock<'a>>,
}

struct RowBlock<'a>(&'a TableRow);

impl Serialize for RowBlock<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", "table_row")?;
        map.serialize_entry("table_row", &RowPayload::new(self.0))?;
        map.end()
    }
}

#[derive(Serialize)]
struct RowPayload<'a> {
    cells: Vec<Vec<TextObject<'a>>>,
}

impl<'a> RowPayload<'a> {
    fn new(row: &'a TableRow) -> Self {
        let cells = row
            .cells
            .iter()
            .map(|cell| cell.iter().map(|text| TextObject::new(text, None)).collect())
            .collect();
        Self { cells }
    }
}

/// Runs longer than [`MAX_TEXT_CONTENT`] become several text objects that
/// share the run's link.
struct RichText<'a>(&'a [TextRun]);

impl Serialize for RichText<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for run in self.0 {
            for piece in split_content(run.content(), MAX_TEXT_CONTENT) {
                seq.serialize_element(&TextObject::new(piece, run.link()))?;
            }
        }
        seq.end()
    }
}

#[derive(Serialize)]
struct TextObject<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextContent<'a>,
}

impl<'a> TextObject<'a> {
    fn new(content: &'a str, link: Option<&'a str>) -> Self {
        Self {
            kind: "text",
            text: TextContent {
                content,
                link: link.map(|url| LinkTarget { url }),
            },
        }
    }
}

#[derive(Serialize)]
struct TextContent<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<LinkTarget<'a>>,
}

#[derive(Serialize)]
struct LinkTarget<'a> {
    url: &'a str,
}

fn split_content(content: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (count, (index, _)) in content.char_indices().enumerate() {
        if count > 0 && count % max_chars == 0 {
            pieces.push(&content[start..index]);
            start = index;
        }
    }
    pieces.push(&content[start..]);
    pieces
}
