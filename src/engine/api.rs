// 高レベル公開API
// PipelineEngineを簡単に使用できるようにするための便利な関数

use super::PipelineEngine;
use crate::{
    core::{CompletionSummary, ItemTransform, PipelineResult},
    services::{
        ConsoleProgressReporter, DefaultPipelineConfig, DiscardResultSink, MemoryResultSink,
        NoOpProgressReporter, ScaleTransform,
    },
};

/// パイプラインを一回実行して完了サマリーを返す
///
/// id 1..=item_count のアイテムを`worker_count`個のワーカーで2倍し、
/// 容量`queue_capacity`の有界キューで受け渡す。進捗は出力しない。
pub async fn start_pipeline(
    item_count: u64,
    worker_count: usize,
    queue_capacity: usize,
) -> PipelineResult<CompletionSummary> {
    let config = DefaultPipelineConfig::default()
        .with_worker_count(worker_count)
        .with_queue_capacity(queue_capacity)
        .with_progress_reporting(false);

    let engine = PipelineEngine::new(
        ScaleTransform::default(),
        config,
        NoOpProgressReporter::new(),
        DiscardResultSink::new(),
    );

    engine.run(item_count).await
}

/// PipelineEngine作成のヘルパー関数
///
/// デフォルト設定・コンソール出力・メモリ上のシンクで組み立てる
pub fn create_default_engine<T>(
    transform: T,
) -> PipelineEngine<T, DefaultPipelineConfig, ConsoleProgressReporter, MemoryResultSink>
where
    T: ItemTransform + 'static,
{
    PipelineEngine::new(
        transform,
        DefaultPipelineConfig::default(),
        ConsoleProgressReporter::new(),
        MemoryResultSink::new(),
    )
}

/// PipelineEngine作成のヘルパー関数（静音版）
///
/// テストやバックグラウンド処理用
pub fn create_quiet_engine<T>(
    transform: T,
) -> PipelineEngine<T, DefaultPipelineConfig, NoOpProgressReporter, MemoryResultSink>
where
    T: ItemTransform + 'static,
{
    PipelineEngine::new(
        transform,
        DefaultPipelineConfig::default(),
        NoOpProgressReporter::new(),
        MemoryResultSink::new(),
    )
}
