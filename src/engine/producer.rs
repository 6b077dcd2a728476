// Producer - WorkItem配信機能

use crate::core::WorkItem;
use crate::primitives::BoundedQueue;
use std::sync::Arc;
use std::time::Duration;

/// idからペイロードを決める関数
pub type PayloadFn = Arc<dyn Fn(u64) -> f64 + Send + Sync>;

/// デフォルトのペイロード: id をそのまま数値にする
pub fn id_payload() -> PayloadFn {
    Arc::new(|id: u64| id as f64)
}

/// Producer: id 1..=item_count のWorkItemを順に入力キューへ配信する
///
/// キューが満杯の間は待機する。全件投入した後に入力キューを一度だけcloseする。
/// これがワーカーが受け取る唯一の終了シグナル。戻り値は投入件数。
pub fn spawn_producer(
    item_count: u64,
    payload: PayloadFn,
    delay: Duration,
    input: Arc<BoundedQueue<WorkItem>>,
) -> tokio::task::JoinHandle<u64> {
    tokio::spawn(async move {
        for id in 1..=item_count {
            input.put(WorkItem::new(id, payload(id))).await;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        input.close();
        item_count
    })
}
