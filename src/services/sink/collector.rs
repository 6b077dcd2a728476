// Collector - 結果収集と完了通知

use crate::core::{
    CompletionSummary, PipelineError, PipelineResult, ProgressReporter, ResultItem, ResultSink,
};
use crate::primitives::BoundedQueue;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Collectorの動作設定
#[derive(Debug, Clone, Copy)]
pub struct CollectorSettings {
    pub total_items: u64,
    pub batch_size: usize,
    pub progress_interval: usize,
    pub report_progress: bool,
    pub started_at: Instant,
}

/// Collector: 出力キューが枯渇するまで結果を収集する
///
/// 枯渇を観測したら残りのバッチをシンクへ渡し、`done`へサマリーを一度だけ送る。
/// シンクが失敗しても出力キューは最後まで読み切る（ワーカーを詰まらせないため）。
/// その場合サマリーは送らず、タスクの戻り値でエラーを返す。
pub fn spawn_collector<R, S>(
    output: Arc<BoundedQueue<ResultItem>>,
    settings: CollectorSettings,
    reporter: Arc<R>,
    sink: Arc<S>,
    done: oneshot::Sender<CompletionSummary>,
) -> tokio::task::JoinHandle<PipelineResult<()>>
where
    R: ProgressReporter + 'static,
    S: ResultSink + 'static,
{
    tokio::spawn(async move {
        let batch_size = settings.batch_size.max(1);
        let progress_interval = settings.progress_interval.max(1) as u64;

        let mut batch = Vec::with_capacity(batch_size);
        let mut sink_error = None;
        let mut collected = 0u64;
        let mut succeeded = 0u64;
        let mut failed = 0u64;
        let mut value_sum = 0.0;

        while let Some(result) = output.get().await {
            collected += 1;
            match &result {
                ResultItem::Processed { value, .. } => {
                    succeeded += 1;
                    value_sum += value;
                }
                ResultItem::Failed { id, error, .. } => {
                    failed += 1;
                    if settings.report_progress {
                        reporter.report_failure(*id, error).await;
                    }
                }
            }

            if sink_error.is_none() {
                batch.push(result);
                if batch.len() >= batch_size {
                    if let Err(e) = sink.store_batch(&batch).await {
                        sink_error = Some(e);
                    }
                    batch.clear();
                }
            }

            if settings.report_progress && collected % progress_interval == 0 {
                reporter
                    .report_progress(collected, settings.total_items)
                    .await;
            }
        }

        if let Some(e) = sink_error {
            return Err(PipelineError::sink(e));
        }

        // 残りバッチの受け渡し
        if !batch.is_empty() {
            sink.store_batch(&batch).await.map_err(PipelineError::sink)?;
        }

        let summary = CompletionSummary {
            total_items: settings.total_items,
            processed_count: collected,
            succeeded_count: succeeded,
            failed_count: failed,
            value_sum,
            elapsed_ms: settings.started_at.elapsed().as_millis() as u64,
        };

        done.send(summary)
            .map_err(|_| PipelineError::channel("完了通知の受信側が既に閉じられています"))
    })
}
