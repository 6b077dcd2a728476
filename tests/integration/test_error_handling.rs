// エラーハンドリングの統合テスト
// アイテム単位の失敗はタグ付き結果、設定不正はエラー、プロトコル違反はpanic

use crate::fixtures::{quiet_config, RecordedEvent, RecordingReporter, TEST_DEADLINE};
use conc_pipeline::{
    start_pipeline, BoundedQueue, DefaultPipelineConfig, FnTransform, MemoryResultSink,
    NoOpProgressReporter, PipelineEngine, PipelineError, ResultItem, ResultSink, ScaleTransform,
    WorkItem,
};
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failing_items_are_tagged_and_counted() {
    let transform = FnTransform::new(|item: &WorkItem| {
        if item.id % 5 == 0 {
            anyhow::bail!("rejected by validation")
        }
        Ok(item.payload * 10.0)
    });
    let reporter = RecordingReporter::new();
    let sink = MemoryResultSink::new();
    let engine = PipelineEngine::new(
        transform,
        quiet_config(3, 2).with_progress_reporting(true),
        reporter.clone(),
        sink.clone(),
    );

    let summary = timeout(TEST_DEADLINE, engine.run(20))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.processed_count, 20);
    assert_eq!(summary.failed_count, 4);
    assert_eq!(summary.succeeded_count, 16);

    let failed_ids: Vec<u64> = sink
        .stored_results()
        .iter()
        .filter(|result| result.is_failed())
        .map(ResultItem::id)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    assert_eq!(failed_ids, vec![5, 10, 15, 20]);

    let failures: Vec<RecordedEvent> = reporter
        .events()
        .into_iter()
        .filter(|event| matches!(event, RecordedEvent::Failure { .. }))
        .collect();
    assert_eq!(failures.len(), 4);
    assert!(failures.iter().all(|event| matches!(
        event,
        RecordedEvent::Failure { error, .. } if error.contains("rejected by validation")
    )));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_transform_does_not_stall_pipeline() {
    let transform = FnTransform::new(|item: &WorkItem| {
        if item.id == 7 {
            panic!("item 7 is poisoned");
        }
        Ok(item.payload)
    });
    let sink = MemoryResultSink::new();
    let engine = PipelineEngine::new(
        transform,
        quiet_config(2, 1),
        NoOpProgressReporter::new(),
        sink.clone(),
    );

    let summary = timeout(TEST_DEADLINE, engine.run(10))
        .await
        .expect("a panicking item must not hang the pipeline")
        .unwrap();

    assert_eq!(summary.processed_count, 10);
    assert_eq!(summary.failed_count, 1);

    let failed = sink
        .stored_results()
        .into_iter()
        .find(ResultItem::is_failed)
        .unwrap();
    assert!(matches!(
        failed,
        ResultItem::Failed { id: 7, ref error, .. } if error.contains("poisoned")
    ));
}

struct PanickingSink;

#[async_trait::async_trait]
impl ResultSink for PanickingSink {
    async fn store_batch(&self, _results: &[ResultItem]) -> anyhow::Result<()> {
        panic!("sink crashed");
    }
    async fn finalize(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_crashing_sink_fails_the_run_instead_of_hanging() {
    let engine = PipelineEngine::new(
        ScaleTransform::default(),
        quiet_config(2, 1).with_batch_size(1),
        NoOpProgressReporter::new(),
        PanickingSink,
    );

    let result = timeout(TEST_DEADLINE, engine.run(20))
        .await
        .expect("a crashed collector must not hang the pipeline");

    assert!(matches!(result, Err(PipelineError::TaskError { .. })));
}

#[tokio::test]
async fn test_invalid_configuration_is_rejected() {
    let invalid = [
        quiet_config(0, 10),
        quiet_config(2, 0),
        quiet_config(2, 10).with_batch_size(0),
        quiet_config(2, 10).with_progress_interval(0),
    ];

    for config in invalid {
        let sink = MemoryResultSink::new();
        let engine = PipelineEngine::new(
            ScaleTransform::default(),
            config,
            NoOpProgressReporter::new(),
            sink.clone(),
        );

        let error = engine.run(5).await.unwrap_err();
        assert!(matches!(error, PipelineError::ConfigurationError { .. }));
        // タスクを起動する前に弾かれるのでシンクは手つかず
        assert!(!sink.is_finalized());
    }

    assert!(matches!(
        start_pipeline(1, 1, 0).await,
        Err(PipelineError::ConfigurationError { .. })
    ));
}

#[test]
fn test_malformed_json_config_is_configuration_error() {
    let error = DefaultPipelineConfig::from_json_str("{ worker_count: ").unwrap_err();

    assert!(matches!(error, PipelineError::ConfigurationError { .. }));
    assert!(!error.is_recoverable());
}

#[tokio::test]
#[should_panic(expected = "put on a closed BoundedQueue")]
async fn test_put_after_close_panics() {
    let queue = BoundedQueue::new(1);
    queue.close();
    queue.put(1u32).await;
}

#[test]
#[should_panic(expected = "BoundedQueue closed twice")]
fn test_double_close_panics() {
    let queue = BoundedQueue::<u32>::new(1);
    queue.close();
    queue.close();
}

#[test]
#[should_panic(expected = "capacity must be at least 1")]
fn test_zero_capacity_queue_panics() {
    let _ = BoundedQueue::<u32>::new(0);
}
