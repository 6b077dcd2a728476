// BoundedQueue - 容量固定のFIFOキューと終了(close)プロトコル

use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

/// 容量固定のFIFOキュー
///
/// `put`は満杯なら空きが出るまで待機し（バックプレッシャー）、`get`は空なら
/// 次のアイテムかcloseまで待機する。close後はバッファに残ったアイテムを
/// 順に返し、その後`None`（枯渇）を返し続ける。
///
/// closeできるのは指定された一つのタスクだけ。二重closeとclose後のputは
/// 協調処理のバグなので即座にpanicする。
#[derive(Debug)]
pub struct BoundedQueue<T> {
    capacity: usize,
    // None = closed。状態フラグと送信側を同じMutexで守る
    sender: Mutex<Option<mpsc::Sender<T>>>,
    // 複数ワーカーが同じ受信側を共有する
    receiver: tokio::sync::Mutex<mpsc::Receiver<T>>,
}

impl<T: Send> BoundedQueue<T> {
    /// 新しいキューを作成
    ///
    /// # Panics
    ///
    /// `capacity`が0の場合
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be at least 1");
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            capacity,
            sender: Mutex::new(Some(sender)),
            receiver: tokio::sync::Mutex::new(receiver),
        }
    }

    /// アイテムを追加する。満杯の間は待機する
    ///
    /// # Panics
    ///
    /// キューがclose済みの場合
    pub async fn put(&self, item: T) {
        let sender = {
            let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
            guard.clone()
        };
        let Some(sender) = sender else {
            panic!("put on a closed BoundedQueue");
        };

        // 受信側はキュー自身が保持しているので送信は失敗しない
        if sender.send(item).await.is_err() {
            unreachable!("BoundedQueue receiver dropped while the queue is alive");
        }
    }

    /// 次のアイテムを取り出す。close済みかつ空なら`None`
    pub async fn get(&self) -> Option<T> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }

    /// キューをcloseする
    ///
    /// 実行中の`put`は完了し、そのアイテムも取り出せる。
    ///
    /// # Panics
    ///
    /// 既にclose済みの場合
    pub fn close(&self) {
        let previous = {
            let mut guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
            guard.take()
        };
        if previous.is_none() {
            panic!("BoundedQueue closed twice");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
