use std::sync::{Arc, Mutex};

use blocks_core::{Block, TextRun};
use blocks_engine::{append_in_batches, BlockSink, SinkError, BATCH_SIZE};
use pretty_assertions::assert_eq;

#[derive(Default, Clone)]
struct RecordingSink {
    calls: Arc<Mutex<Vec<(String, Vec<Block>)>>>,
    fail_on_call: Option<usize>,
}

impl RecordingSink {
    fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    fn batch_sizes(&self) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, blocks)| blocks.len())
            .collect()
    }

    fn appended_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, blocks)| blocks.iter().map(Block::plain_text))
            .collect()
    }
}

#[async_trait::async_trait]
impl BlockSink for RecordingSink {
    async fn append(&self, container_id: &str, blocks: &[Block]) -> Result<(), SinkError> {
        let mut calls = self.calls.lock().unwrap();
        if self.fail_on_call == Some(calls.len()) {
            return Err(SinkError::HttpStatus {
                status: 500,
                body: "boom".to_string(),
            });
        }
        calls.push((container_id.to_string(), blocks.to_vec()));
        Ok(())
    }
}

fn paragraphs(count: usize) -> Vec<Block> {
    (0..count)
        .map(|i| Block::Paragraph {
            rich_text: vec![TextRun::plain(&format!("p{i}")).unwrap()],
        })
        .collect()
}

#[tokio::test]
async fn splits_into_ordered_batches_of_at_most_batch_size() {
    let sink = RecordingSink::default();
    let blocks = paragraphs(250);

    let summary = append_in_batches(&sink, "page-1", &blocks, BATCH_SIZE)
        .await
        .expect("append ok");

    assert_eq!(summary.batches, 3);
    assert_eq!(summary.blocks, 250);
    assert_eq!(sink.batch_sizes(), vec![100, 100, 50]);
    let expected: Vec<String> = (0..250).map(|i| format!("p{i}")).collect();
    assert_eq!(sink.appended_texts(), expected);
    assert!(sink
        .calls
        .lock()
        .unwrap()
        .iter()
        .all(|(container, _)| container == "page-1"));
}

#[tokio::test]
async fn exact_multiple_has_no_trailing_empty_batch() {
    let sink = RecordingSink::default();
    append_in_batches(&sink, "page-1", &paragraphs(200), BATCH_SIZE)
        .await
        .unwrap();
    assert_eq!(sink.batch_sizes(), vec![100, 100]);
}

#[tokio::test]
async fn empty_input_makes_no_calls() {
    let sink = RecordingSink::default();
    let summary = append_in_batches(&sink, "page-1", &[], BATCH_SIZE)
        .await
        .unwrap();
    assert_eq!(summary.batches, 0);
    assert!(sink.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn zero_batch_size_falls_back_to_default() {
    let sink = RecordingSink::default();
    append_in_batches(&sink, "page-1", &paragraphs(150), 0)
        .await
        .unwrap();
    assert_eq!(sink.batch_sizes(), vec![100, 50]);
}

#[tokio::test]
async fn failure_stops_and_reports_committed_prefix() {
    let sink = RecordingSink::failing_on(1);
    let err = append_in_batches(&sink, "page-1", &paragraphs(250), BATCH_SIZE)
        .await
        .unwrap_err();

    assert_eq!(err.container_id, "page-1");
    assert_eq!(err.batch_index, 1);
    assert_eq!(err.blocks_committed, 100);
    assert!(matches!(err.source, SinkError::HttpStatus { status: 500, .. }));
    assert_eq!(sink.batch_sizes(), vec![100]);
}
