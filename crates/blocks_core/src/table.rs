use scraper::ElementRef;

use crate::model::{Block, TableRow};
use crate::text::{child_elements, element_text, tag_name};

/// Converts a `table` element into one table block.
///
/// Only rows owned by this table are read; rows of tables nested inside a
/// cell belong to those tables. The first row decides the width and whether
/// the table has a column header. Every row is padded with empty cells or
/// cut to exactly that width.
pub fn convert_table(table: ElementRef) -> Block {
    let rows: Vec<Vec<ElementRef>> = own_rows(table)
        .into_iter()
        .map(|row| child_elements(row).filter(|cell| is_cell(*cell)).collect())
        .collect();

    let (table_width, has_column_header) = match rows.first() {
        Some(first) => (
            first.len().max(1),
            !first.is_empty() && first.iter().all(|cell| tag_name(*cell) == "th"),
        ),
        None => (1, false),
    };

    let rows = rows
        .iter()
        .map(|cells| {
            let mut cells: Vec<Vec<String>> = cells
                .iter()
                .take(table_width)
                .map(|cell| cell_fragments(*cell))
                .collect();
            cells.resize_with(table_width, Vec::new);
            TableRow { cells }
        })
        .collect();

    Block::Table {
        table_width,
        has_column_header,
        rows,
    }
}

fn is_cell(element: ElementRef) -> bool {
    matches!(tag_name(element).as_str(), "td" | "th")
}

fn cell_fragments(cell: ElementRef) -> Vec<String> {
    let text = element_text(cell);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

/// `tr` elements reachable from `table` without crossing another `table`.
fn own_rows(table: ElementRef) -> Vec<ElementRef> {
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);
    rows
}

fn collect_rows<'a>(element: ElementRef<'a>, rows: &mut Vec<ElementRef<'a>>) {
    for child in child_elements(element) {
        match tag_name(child).as_str() {
            "tr" => rows.push(child),
            "table" => {}
            _ => collect_rows(child, rows),
        }
    }
}
