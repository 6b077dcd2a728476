// WorkerPool - 並列ワーカーと完了バリア

use crate::core::{
    ItemTransform, PipelineError, PipelineResult, ProgressReporter, ResultItem, WorkItem,
    WorkerReport,
};
use crate::primitives::{AtomicCounter, BoundedQueue};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// 単一アイテムの変換。失敗もpanicもタグ付きの結果にする
async fn transform_item<T>(worker_id: usize, transform: &T, item: &WorkItem) -> ResultItem
where
    T: ItemTransform + ?Sized,
{
    match AssertUnwindSafe(transform.transform(item)).catch_unwind().await {
        Ok(Ok(value)) => ResultItem::Processed {
            id: item.id,
            worker_id,
            value,
        },
        Ok(Err(e)) => ResultItem::Failed {
            id: item.id,
            worker_id,
            error: PipelineError::transform(item.id, e).to_string(),
        },
        Err(panic) => ResultItem::Failed {
            id: item.id,
            worker_id,
            error: format!("transform panicked: {}", panic_message(panic.as_ref())),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

/// 単一ワーカー
///
/// 入力キューが枯渇するまで取り出し→変換→出力キューへ送信を繰り返す。
/// 出力キューはcloseしない。
pub fn spawn_worker<T, R>(
    worker_id: usize,
    transform: Arc<T>,
    input: Arc<BoundedQueue<WorkItem>>,
    output: Arc<BoundedQueue<ResultItem>>,
    reporter: Arc<R>,
    report_items: bool,
    exited: Arc<AtomicCounter>,
) -> tokio::task::JoinHandle<WorkerReport>
where
    T: ItemTransform + ?Sized + 'static,
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut handled = 0u64;

        while let Some(item) = input.get().await {
            let result = transform_item(worker_id, transform.as_ref(), &item).await;
            handled += 1;

            if report_items {
                reporter.report_item_handled(worker_id, item.id).await;
            }
            output.put(result).await;
        }

        exited.increment();
        if report_items {
            reporter.report_worker_exited(worker_id, handled).await;
        }

        WorkerReport { worker_id, handled }
    })
}

/// 固定数のワーカーからなるプール
///
/// `wait_and_close`は`self`を消費するため、完了バリアを待って出力キューを
/// closeできるのはプールの所有者ただ一人。
pub struct WorkerPool {
    handles: Vec<tokio::task::JoinHandle<WorkerReport>>,
    output: Arc<BoundedQueue<ResultItem>>,
    exited: Arc<AtomicCounter>,
}

impl WorkerPool {
    /// `worker_count`個のワーカーを起動する（ワーカーidは1始まり）
    pub fn spawn<T, R>(
        worker_count: usize,
        transform: Arc<T>,
        input: Arc<BoundedQueue<WorkItem>>,
        output: Arc<BoundedQueue<ResultItem>>,
        reporter: Arc<R>,
        report_items: bool,
    ) -> Self
    where
        T: ItemTransform + ?Sized + 'static,
        R: ProgressReporter + ?Sized + 'static,
    {
        let exited = Arc::new(AtomicCounter::new(0));
        let handles = (1..=worker_count)
            .map(|worker_id| {
                spawn_worker(
                    worker_id,
                    Arc::clone(&transform),
                    Arc::clone(&input),
                    Arc::clone(&output),
                    Arc::clone(&reporter),
                    report_items,
                    Arc::clone(&exited),
                )
            })
            .collect();

        Self {
            handles,
            output,
            exited,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// 入力キューを枯渇させて終了したワーカー数
    pub fn exited_count(&self) -> i64 {
        self.exited.value()
    }

    /// 完了バリア: 全ワーカーの終了を待ってから出力キューをcloseする
    ///
    /// ワーカータスクが異常終了した場合も出力キューはcloseし
    /// （Collectorを終了させるため）、その後でタスクエラーを返す。
    pub async fn wait_and_close(self) -> PipelineResult<Vec<WorkerReport>> {
        let mut reports = Vec::with_capacity(self.handles.len());
        let mut failure = None;

        for handle in self.handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        self.output.close();

        match failure {
            Some(e) => Err(PipelineError::task(e)),
            None => Ok(reports),
        }
    }
}
