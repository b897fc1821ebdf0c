use ego_tree::NodeRef;
use engine_logging::{engine_debug, engine_trace, engine_warn};
use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

use crate::classify::{classify, ElementCategory};
use crate::model::{Block, HeadingLevel, ListKind, TextRun};
use crate::resolve::{is_data_uri, parse_base, resolve_reference, unsupported_image_scheme};
use crate::rich_text::{anchor_run, extract_rich_text};
use crate::table::convert_table;
use crate::text::{attr, element_text, is_html_element, tag_name};
use crate::{ConvertError, ConvertOptions, Diagnostic};

/// Result of converting one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversion {
    pub blocks: Vec<Block>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses `html` and converts its body into top-level blocks.
pub fn convert_html(
    html: &str,
    base_url: &str,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let document = Html::parse_document(html);
    convert_document(&document, base_url, options)
}

pub fn convert_document(
    document: &Html,
    base_url: &str,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let supplied = parse_base(base_url)?;
    let mut diagnostics = Vec::new();
    let base = effective_base(document, supplied, options, &mut diagnostics)?;

    let transducer = Transducer::new(base, options);
    let blocks = transducer.process_node(*body_of(document), &mut diagnostics)?;

    engine_debug!(
        "Converted document: blocks={} diagnostics={}",
        blocks.len(),
        diagnostics.len()
    );
    Ok(Conversion {
        blocks,
        diagnostics,
    })
}

fn body_of(document: &Html) -> ElementRef<'_> {
    let root = document.root_element();
    root.children()
        .filter_map(ElementRef::wrap)
        .find(|child| tag_name(*child) == "body")
        .unwrap_or(root)
}

/// The first `<base href>` wins, resolved against the supplied base.
fn effective_base(
    document: &Html,
    supplied: Url,
    options: &ConvertOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Url, ConvertError> {
    if !options.honor_base_element {
        return Ok(supplied);
    }
    let href = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| tag_name(*element) == "base")
        .find_map(|element| attr(element, "href"));
    let Some(href) = href else {
        return Ok(supplied);
    };

    match resolve_reference(href, &supplied).and_then(|resolved| parse_base(&resolved)) {
        Ok(base) => {
            engine_debug!("Using document base {base}");
            Ok(base)
        }
        Err(err) if !options.strict_urls => {
            engine_warn!("Ignoring <base href={href:?}>: {err}");
            diagnostics.push(Diagnostic::skipped("base", &err));
            Ok(supplied)
        }
        Err(err) => Err(err),
    }
}

/// Recursive walk from DOM nodes to blocks.
///
/// Only generic containers are descended into. Every classified element
/// consumes its whole subtree, so an `a` reached by the walk was never part
/// of an ancestor's rich text and is converted as a standalone link.
pub struct Transducer<'o> {
    base: Url,
    options: &'o ConvertOptions,
}

impl<'o> Transducer<'o> {
    pub fn new(base: Url, options: &'o ConvertOptions) -> Self {
        Self { base, options }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub(crate) fn options(&self) -> &ConvertOptions {
        self.options
    }

    /// Converts one node and, for containers, its subtree. Output is in
    /// document order.
    pub fn process_node(
        &self,
        node: NodeRef<'_, Node>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<Block>, ConvertError> {
        let Some(element) = ElementRef::wrap(node) else {
            return Ok(Vec::new());
        };
        let tag = tag_name(element);
        // Foreign content (svg, math) carries no document blocks.
        let category = if is_html_element(element) {
            classify(&tag)
        } else {
            ElementCategory::Pruned
        };
        engine_trace!("Visiting <{tag}> as {category:?}");

        match category {
            ElementCategory::Pruned => {
                engine_debug!("Ignoring <{tag}>");
                Ok(Vec::new())
            }
            ElementCategory::Heading(level) => {
                let converted = self.heading(element, level);
                self.isolate(&tag, converted, diagnostics)
            }
            ElementCategory::Title => Ok(title(element).into_iter().collect()),
            ElementCategory::Paragraph => {
                let converted = self.paragraph(element);
                self.isolate(&tag, converted, diagnostics)
            }
            ElementCategory::List(kind) => self.process_list(element, kind, 0, diagnostics),
            ElementCategory::Select => Ok(self.select(element).into_iter().collect()),
            ElementCategory::Anchor => {
                let converted = anchor_run(element, &self.base).map(|run| {
                    run.map(|run| Block::Paragraph {
                        rich_text: vec![run],
                    })
                });
                self.isolate(&tag, converted, diagnostics)
            }
            ElementCategory::Image => {
                let converted = self.image(element, diagnostics);
                self.isolate(&tag, converted, diagnostics)
            }
            ElementCategory::Table => Ok(vec![convert_table(element)]),
            ElementCategory::Container => {
                let mut blocks = Vec::new();
                for child in element.children() {
                    blocks.extend(self.process_node(child, diagnostics)?);
                }
                Ok(blocks)
            }
        }
    }

    /// Lenient mode turns a failed element into a diagnostic; strict mode
    /// propagates the error.
    pub(crate) fn isolate<B>(
        &self,
        tag: &str,
        converted: Result<B, ConvertError>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<Block>, ConvertError>
    where
        B: IntoIterator<Item = Block>,
    {
        match converted {
            Ok(blocks) => Ok(blocks.into_iter().collect()),
            Err(err) if !self.options.strict_urls => {
                engine_warn!("Skipping <{tag}>: {err}");
                diagnostics.push(Diagnostic::skipped(tag, &err));
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    fn heading(
        &self,
        element: ElementRef,
        level: HeadingLevel,
    ) -> Result<Option<Block>, ConvertError> {
        if element_text(element).is_empty() {
            return Ok(None);
        }
        let rich_text = extract_rich_text(element, &self.base)?;
        Ok((!rich_text.is_empty()).then_some(Block::Heading { level, rich_text }))
    }

    fn paragraph(&self, element: ElementRef) -> Result<Option<Block>, ConvertError> {
        if element_text(element).is_empty() {
            return Ok(None);
        }
        let rich_text = extract_rich_text(element, &self.base)?;
        Ok((!rich_text.is_empty()).then_some(Block::Paragraph { rich_text }))
    }

    /// A toggle listing every `option` under the `select`.
    fn select(&self, element: ElementRef) -> Option<Block> {
        let children: Vec<Block> = element
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|option| tag_name(*option) == "option")
            .map(|option| {
                let rich_text = TextRun::plain(&element_text(option)).into_iter().collect();
                Block::list_item(ListKind::Bulleted, rich_text, Vec::new())
            })
            .collect();
        if children.is_empty() {
            return None;
        }

        let header = attr(element, "id").unwrap_or(self.options.select_placeholder.as_str());
        Some(Block::Toggle {
            rich_text: TextRun::plain(header).into_iter().collect(),
            children,
        })
    }

    fn image(
        &self,
        element: ElementRef,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<Block>, ConvertError> {
        let Some(src) = attr(element, "src") else {
            return Ok(None);
        };
        if is_data_uri(src) {
            engine_debug!("Suppressing data-uri image ({} bytes)", src.len());
            diagnostics.push(Diagnostic::data_uri_image(src));
            return Ok(None);
        }
        let url = resolve_reference(src, &self.base)?;
        if let Some(scheme) = unsupported_image_scheme(&url) {
            engine_debug!("Dropping image with {scheme}: source");
            diagnostics.push(Diagnostic::unsupported_image(&scheme, &url));
            return Ok(None);
        }
        Ok(Some(Block::Image { url }))
    }
}

fn title(element: ElementRef) -> Option<Block> {
    TextRun::plain(&element_text(element)).map(|run| Block::Heading {
        level: HeadingLevel::One,
        rich_text: vec![run],
    })
}
