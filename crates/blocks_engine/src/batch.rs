use blocks_core::Block;
use engine_logging::{engine_info, engine_warn};

use crate::sink::{BlockSink, SinkError};

/// Largest number of blocks sent in one append.
pub const BATCH_SIZE: usize = 100;

/// A failed append. Batches before `batch_index` are already committed and
/// are not rolled back; retrying from `blocks_committed` resumes the run.
#[derive(Debug, thiserror::Error)]
#[error(
    "append to container {container_id} failed at batch {batch_index} \
     ({blocks_committed} blocks already committed): {source}"
)]
pub struct AppendError {
    pub container_id: String,
    pub batch_index: usize,
    pub blocks_committed: usize,
    #[source]
    pub source: SinkError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendSummary {
    pub batches: usize,
    pub blocks: usize,
}

/// Appends `blocks` to `container_id` in consecutive batches of at most
/// `batch_size` (zero means [`BATCH_SIZE`]), awaiting each before the next.
pub async fn append_in_batches(
    sink: &dyn BlockSink,
    container_id: &str,
    blocks: &[Block],
    batch_size: usize,
) -> Result<AppendSummary, AppendError> {
    let batch_size = if batch_size == 0 { BATCH_SIZE } else { batch_size };
    let mut summary = AppendSummary::default();

    for (batch_index, batch) in blocks.chunks(batch_size).enumerate() {
        if let Err(source) = sink.append(container_id, batch).await {
            engine_warn!(
                "Batch {batch_index} for {container_id} failed after {} blocks: {source}",
                summary.blocks
            );
            return Err(AppendError {
                container_id: container_id.to_string(),
                batch_index,
                blocks_committed: summary.blocks,
                source,
            });
        }
        summary.batches += 1;
        summary.blocks += batch.len();
        engine_info!(
            "Appended batch {batch_index} ({} blocks) to {container_id}",
            batch.len()
        );
    }

    Ok(summary)
}
