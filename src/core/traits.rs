// パイプラインのトレイト定義
// 設定・進捗報告・アイテム変換・結果シンクの抽象化インターフェース

use super::types::{CompletionSummary, ResultItem, WorkItem};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// パイプラインの設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// ワーカープールのワーカー数
    fn worker_count(&self) -> usize;

    /// 入力・出力キューの容量
    fn queue_capacity(&self) -> usize;

    /// 結果シンクへ渡すバッチのサイズ
    fn batch_size(&self) -> usize;

    /// 何件ごとに進捗を報告するか
    fn progress_interval(&self) -> usize;

    /// Producerのアイテム間の待ち時間
    fn producer_delay(&self) -> Duration;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// PipelineConfig for Box<dyn PipelineConfig>
impl PipelineConfig for Box<dyn PipelineConfig> {
    fn worker_count(&self) -> usize {
        self.as_ref().worker_count()
    }

    fn queue_capacity(&self) -> usize {
        self.as_ref().queue_capacity()
    }

    fn batch_size(&self) -> usize {
        self.as_ref().batch_size()
    }

    fn progress_interval(&self) -> usize {
        self.as_ref().progress_interval()
    }

    fn producer_delay(&self) -> Duration {
        self.as_ref().producer_delay()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_items: u64);

    /// ワーカーがアイテムを処理し終えたときの報告
    async fn report_item_handled(&self, worker_id: usize, item_id: u64);

    /// 収集件数の報告
    async fn report_progress(&self, collected: u64, total: u64);

    /// アイテム単位の失敗の報告
    async fn report_failure(&self, item_id: u64, error: &str);

    /// ワーカーが入力キューを空にして終了したときの報告
    async fn report_worker_exited(&self, worker_id: usize, handled: u64);

    /// 処理完了時の報告
    async fn report_completed(&self, summary: &CompletionSummary);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: u64) {
        self.as_ref().report_started(total_items).await
    }

    async fn report_item_handled(&self, worker_id: usize, item_id: u64) {
        self.as_ref().report_item_handled(worker_id, item_id).await
    }

    async fn report_progress(&self, collected: u64, total: u64) {
        self.as_ref().report_progress(collected, total).await
    }

    async fn report_failure(&self, item_id: u64, error: &str) {
        self.as_ref().report_failure(item_id, error).await
    }

    async fn report_worker_exited(&self, worker_id: usize, handled: u64) {
        self.as_ref().report_worker_exited(worker_id, handled).await
    }

    async fn report_completed(&self, summary: &CompletionSummary) {
        self.as_ref().report_completed(summary).await
    }
}

/// ワーカーがアイテムごとに実行する変換処理
#[automock]
#[async_trait]
pub trait ItemTransform: Send + Sync {
    /// アイテムを変換して導出値を返す
    async fn transform(&self, item: &WorkItem) -> Result<f64>;
}

// ItemTransform for Box<dyn ItemTransform>
#[async_trait]
impl ItemTransform for Box<dyn ItemTransform> {
    async fn transform(&self, item: &WorkItem) -> Result<f64> {
        self.as_ref().transform(item).await
    }
}

/// 収集した結果の受け渡し先
#[automock]
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// バッチでの結果受け渡し
    async fn store_batch(&self, results: &[ResultItem]) -> Result<()>;

    /// 全結果の受け渡し後に一度だけ呼ばれる
    async fn finalize(&self) -> Result<()>;
}
