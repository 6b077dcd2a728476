// PipelineEngine - 依存性注入によるパイプラインエンジン
// 変換・設定・進捗報告・結果シンクを全てコンストラクタで注入する

use super::{
    pipeline::Pipeline,
    producer::{id_payload, PayloadFn},
};
use crate::core::{
    CompletionSummary, ItemTransform, PipelineConfig, PipelineError, PipelineResult,
    ProgressReporter, ResultSink,
};
use std::sync::Arc;

/// 設定値の検証
///
/// タスクを一つも起動する前に呼ばれる。
pub fn validate_config<C>(config: &C) -> PipelineResult<()>
where
    C: PipelineConfig + ?Sized,
{
    if config.worker_count() == 0 {
        return Err(PipelineError::configuration(
            "ワーカー数は1以上である必要があります",
        ));
    }

    if config.queue_capacity() == 0 {
        return Err(PipelineError::configuration(
            "キュー容量は1以上である必要があります",
        ));
    }

    if config.batch_size() == 0 {
        return Err(PipelineError::configuration(
            "バッチサイズは1以上である必要があります",
        ));
    }

    if config.progress_interval() == 0 {
        return Err(PipelineError::configuration(
            "進捗報告間隔は1以上である必要があります",
        ));
    }

    Ok(())
}

/// 依存性注入によるパイプラインエンジン
///
/// 並列処理で共有される依存関係は初期からArcで管理する。
pub struct PipelineEngine<T, C, R, S> {
    transform: Arc<T>,
    config: Arc<C>,
    reporter: Arc<R>,
    sink: Arc<S>,
    payload: PayloadFn,
}

impl<T, C, R, S> PipelineEngine<T, C, R, S>
where
    T: ItemTransform + 'static,
    C: PipelineConfig,
    R: ProgressReporter + 'static,
    S: ResultSink + 'static,
{
    /// 新しいエンジンを作成（ペイロードはidそのもの）
    pub fn new(transform: T, config: C, reporter: R, sink: S) -> Self {
        Self {
            transform: Arc::new(transform),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            sink: Arc::new(sink),
            payload: id_payload(),
        }
    }

    /// idからペイロードを決める関数を差し替える
    pub fn with_payload<F>(mut self, payload: F) -> Self
    where
        F: Fn(u64) -> f64 + Send + Sync + 'static,
    {
        self.payload = Arc::new(payload);
        self
    }

    /// id 1..=item_count のアイテムを処理
    ///
    /// 設定が不正な場合はタスクを起動せずに`ConfigurationError`を返す。
    pub async fn run(&self, item_count: u64) -> PipelineResult<CompletionSummary> {
        validate_config(self.config.as_ref())?;

        let pipeline = Pipeline::new(Arc::clone(&self.transform));

        pipeline
            .execute(
                item_count,
                Arc::clone(&self.payload),
                self.config.as_ref(),
                Arc::clone(&self.reporter),
                Arc::clone(&self.sink),
            )
            .await
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 結果シンクへの参照を取得
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
