//! Blocks core: pure HTML to block-tree conversion.
//!
//! [`convert_html`] walks the document body and returns the top-level
//! blocks in document order. Nothing here performs I/O.
mod classify;
mod error;
mod list;
mod model;
mod options;
mod resolve;
mod rich_text;
mod table;
mod text;
mod transducer;
mod wire;

pub use classify::{classify, ElementCategory};
pub use error::{ConvertError, Diagnostic, DiagnosticKind};
pub use model::{Block, BlockKind, HeadingLevel, ListKind, TableRow, TextRun};
pub use options::{ConvertOptions, DEFAULT_MAX_LIST_DEPTH, DEFAULT_SELECT_PLACEHOLDER};
pub use resolve::{parse_base, resolve_reference};
pub use rich_text::extract_rich_text;
pub use table::convert_table;
pub use transducer::{convert_document, convert_html, Conversion, Transducer};
pub use wire::{append_payload, MAX_TEXT_CONTENT};
