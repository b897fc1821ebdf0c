//! Blocks engine: fetching, decoding and batched delivery of converted blocks.
mod batch;
mod decode;
mod fetch;
mod persist;
mod pipeline;
mod sink;

pub use batch::{append_in_batches, AppendError, AppendSummary, BATCH_SIZE};
pub use decode::{decode_html, DecodedHtml};
pub use fetch::{FailureKind, FetchError, FetchSettings, FetchedPage, HtmlFetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{import_html, run_import, HtmlImport, ImportError, ImportReport, ImportRequest};
pub use sink::{
    batch_filename, BlockSink, JsonDirSink, NotionSink, NotionSinkSettings, SinkError,
    DEFAULT_API_BASE, DEFAULT_API_VERSION,
};
