use engine_logging::engine_debug;
use scraper::ElementRef;

use crate::model::{Block, ListKind};
use crate::rich_text::extract_rich_text;
use crate::text::{child_elements, tag_name};
use crate::transducer::Transducer;
use crate::{ConvertError, Diagnostic};

impl Transducer<'_> {
    /// Converts the direct `li` children of `list` into items of `kind`.
    ///
    /// Lists nested directly inside an item become that item's children
    /// while `depth` is below the configured maximum. At the maximum the
    /// nested lists are dropped; their text was never part of the item's
    /// own rich text.
    pub fn process_list(
        &self,
        list: ElementRef,
        kind: ListKind,
        depth: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<Block>, ConvertError> {
        let mut items = Vec::new();
        for item in child_elements(list).filter(|child| tag_name(*child) == "li") {
            let converted = self.list_item(item, kind, depth, diagnostics);
            items.extend(self.isolate("li", converted.map(Some), diagnostics)?);
        }
        Ok(items)
    }

    fn list_item(
        &self,
        item: ElementRef,
        kind: ListKind,
        depth: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Block, ConvertError> {
        let rich_text = extract_rich_text(item, self.base())?;
        let nested: Vec<(ElementRef, ListKind)> = child_elements(item)
            .filter_map(|child| ListKind::from_tag(&tag_name(child)).map(|kind| (child, kind)))
            .collect();

        let mut children = Vec::new();
        if depth < self.options().max_list_depth {
            for (list, nested_kind) in nested {
                children.extend(self.process_list(list, nested_kind, depth + 1, diagnostics)?);
            }
        } else if !nested.is_empty() {
            engine_debug!(
                "List depth {depth} reached; flattening {} nested list(s)",
                nested.len()
            );
        }

        Ok(Block::list_item(kind, rich_text, children))
    }
}
