// Pipeline - Producer → WorkerPool → Collector のファンアウト/ファンイン
// メインパイプライン機能とオーケストレーション

use super::{
    consumer::WorkerPool,
    producer::{spawn_producer, PayloadFn},
};
use crate::{
    core::{
        CompletionSummary, ItemTransform, PipelineConfig, PipelineError, PipelineResult,
        ProgressReporter, ResultSink, WorkerReport,
    },
    primitives::BoundedQueue,
    services::sink::{spawn_collector, CollectorSettings},
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinError;
use tokio::time::Instant;

/// 完了バリアとCollectorのうち先に終わった方
enum FirstExit {
    Pool(PipelineResult<Vec<WorkerReport>>),
    Collector(Result<PipelineResult<()>, JoinError>),
}

// 出力キューのclose前にCollectorが終わった理由をエラーにする
fn collector_failure(joined: Result<PipelineResult<()>, JoinError>) -> PipelineError {
    match joined {
        Ok(Err(e)) => e,
        Ok(Ok(())) => PipelineError::channel("出力キューのclose前にCollectorが終了しました"),
        Err(e) => PipelineError::task(e),
    }
}

/// 責任が明確に分離されたパイプライン
pub struct Pipeline<T: ?Sized> {
    transform: Arc<T>,
}

impl<T> Pipeline<T>
where
    T: ItemTransform + ?Sized + 'static,
{
    /// 新しいパイプラインを作成
    pub fn new(transform: Arc<T>) -> Self {
        Self { transform }
    }

    /// id 1..=item_count のアイテムを流して完了サマリーを返す
    ///
    /// 終了順序: Producerが入力キューをclose → 全ワーカー終了 → 出力キューをclose
    /// → Collectorがサマリーを送信。各closeを行うのはそれぞれ一者のみ。
    /// Collectorが途中で異常終了した場合は残りの結果を捨ててワーカーを終わらせ、
    /// そのエラーを返す。
    pub async fn execute<C, R, S>(
        &self,
        item_count: u64,
        payload: PayloadFn,
        config: &C,
        reporter: Arc<R>,
        sink: Arc<S>,
    ) -> PipelineResult<CompletionSummary>
    where
        C: PipelineConfig + ?Sized,
        R: ProgressReporter + 'static,
        S: ResultSink + 'static,
    {
        let started_at = Instant::now();
        let report_progress = config.enable_progress_reporting();

        // 入力・出力とも同じ容量の有界キュー
        let input = Arc::new(BoundedQueue::new(config.queue_capacity()));
        let output = Arc::new(BoundedQueue::new(config.queue_capacity()));

        if report_progress {
            reporter.report_started(item_count).await;
        }

        let producer = spawn_producer(
            item_count,
            payload,
            config.producer_delay(),
            Arc::clone(&input),
        );

        let pool = WorkerPool::spawn(
            config.worker_count(),
            Arc::clone(&self.transform),
            Arc::clone(&input),
            Arc::clone(&output),
            Arc::clone(&reporter),
            report_progress,
        );

        let (done_tx, done_rx) = oneshot::channel();
        let mut collector = spawn_collector(
            Arc::clone(&output),
            CollectorSettings {
                total_items: item_count,
                batch_size: config.batch_size(),
                progress_interval: config.progress_interval(),
                report_progress,
                started_at,
            },
            Arc::clone(&reporter),
            Arc::clone(&sink),
            done_tx,
        );

        // 完了バリア: ここが出力キューの唯一のcloser
        // Collectorが先に終わった場合は出力キューを読む者がいなくなるので並行して監視する
        let barrier = pool.wait_and_close();
        tokio::pin!(barrier);

        let first_exit = tokio::select! {
            biased;
            result = &mut barrier => FirstExit::Pool(result),
            joined = &mut collector => FirstExit::Collector(joined),
        };

        match first_exit {
            FirstExit::Pool(Ok(_)) => {}
            FirstExit::Pool(Err(e)) => {
                // ワーカーがいなくなった入力キューにProducerが詰まらないように止める
                producer.abort();
                // 出力キューはclose済みなのでCollectorは必ず終了する。
                // 最初に起きたワーカー側のエラーを返し、Collectorの結果は捨てる
                let _ = collector.await;
                return Err(e);
            }
            FirstExit::Collector(joined) => {
                let error = collector_failure(joined);
                // 残りの結果を捨てながらワーカーの終了を待つ
                let discard = async { while output.get().await.is_some() {} };
                let (_, ()) = tokio::join!(barrier, discard);
                producer.abort();
                return Err(error);
            }
        }

        producer.await?;
        collector.await??;

        let summary = done_rx
            .await
            .map_err(|_| PipelineError::channel("Collectorが完了通知を送らずに終了しました"))?;

        sink.finalize().await.map_err(PipelineError::sink)?;

        if report_progress {
            reporter.report_completed(&summary).await;
        }

        Ok(summary)
    }
}
