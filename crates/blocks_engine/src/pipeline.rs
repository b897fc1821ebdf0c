use blocks_core::{convert_html, ConvertError, ConvertOptions, Diagnostic};
use engine_logging::{engine_info, engine_warn};

use crate::batch::{append_in_batches, AppendError, BATCH_SIZE};
use crate::decode::decode_html;
use crate::fetch::{FetchError, HtmlFetcher};
use crate::sink::BlockSink;

/// One import: a source page and the container its blocks are appended to.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub source_url: String,
    pub container_id: String,
    /// Base for relative references; the fetched page's final URL when unset.
    pub base_url: Option<String>,
    pub options: ConvertOptions,
    pub batch_size: usize,
}

impl ImportRequest {
    pub fn new(source_url: impl Into<String>, container_id: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            container_id: container_id.into(),
            base_url: None,
            options: ConvertOptions::default(),
            batch_size: BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub final_url: String,
    pub encoding: &'static str,
    pub block_count: usize,
    pub batches: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Append(#[from] AppendError),
}

/// Blocks appended by [`import_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlImport {
    pub block_count: usize,
    pub batches: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fetches the page, converts it completely, then appends every batch in
/// order. Nothing is written when fetching or conversion fails.
pub async fn run_import(
    fetcher: &dyn HtmlFetcher,
    sink: &dyn BlockSink,
    request: &ImportRequest,
) -> Result<ImportReport, ImportError> {
    let page = fetcher.fetch(&request.source_url).await?;
    let decoded = decode_html(&page.bytes, page.content_type.as_deref());
    let base_url = request.base_url.as_deref().unwrap_or(&page.final_url);

    let imported = import_html(
        sink,
        &decoded.html,
        base_url,
        &request.container_id,
        &request.options,
        request.batch_size,
    )
    .await?;

    Ok(ImportReport {
        final_url: page.final_url,
        encoding: decoded.encoding,
        block_count: imported.block_count,
        batches: imported.batches,
        diagnostics: imported.diagnostics,
    })
}

/// Converts an HTML string and appends the resulting top-level blocks.
pub async fn import_html(
    sink: &dyn BlockSink,
    html: &str,
    base_url: &str,
    container_id: &str,
    options: &ConvertOptions,
    batch_size: usize,
) -> Result<HtmlImport, ImportError> {
    let conversion = convert_html(html, base_url, options)?;
    for diagnostic in &conversion.diagnostics {
        engine_warn!("{diagnostic}");
    }
    engine_info!(
        "Converted {} top-level blocks ({} diagnostics) for {container_id}",
        conversion.blocks.len(),
        conversion.diagnostics.len()
    );

    let summary = append_in_batches(sink, container_id, &conversion.blocks, batch_size).await?;
    Ok(HtmlImport {
        block_count: summary.blocks,
        batches: summary.batches,
        diagnostics: conversion.diagnostics,
    })
}
