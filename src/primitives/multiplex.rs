// Multiplexer - 複数イベントソースの待ち合わせとタイムアウト

use super::queue::BoundedQueue;
use async_trait::async_trait;
use futures::future::select_all;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// `multiplex`で待ち合わせできるイベントソース
///
/// `next_event`はキャンセル安全であること。選ばれなかったソースの
/// futureは途中でdropされるため、dropでイベントが失われてはならない。
#[async_trait]
pub trait EventSource<T>: Send + Sync {
    /// 次のイベント。ソースが枯渇していれば`None`
    async fn next_event(&self) -> Option<T>;
}

#[async_trait]
impl<T: Send> EventSource<T> for BoundedQueue<T> {
    async fn next_event(&self) -> Option<T> {
        self.get().await
    }
}

// キャンセルされたトークンは何度待っても即座に準備完了になる
#[async_trait]
impl EventSource<()> for CancellationToken {
    async fn next_event(&self) -> Option<()> {
        self.cancelled().await;
        Some(())
    }
}

/// 1回の`multiplex`呼び出しの結果
#[derive(Debug, Clone, PartialEq)]
pub enum Multiplexed<T> {
    /// `source`番目のソースが準備完了になった。`value`が`None`なら枯渇
    Event { source: usize, value: Option<T> },
    /// 待ち時間内にどのソースも準備完了にならなかった
    TimedOut,
}

impl<T> Multiplexed<T> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    pub fn source(&self) -> Option<usize> {
        match self {
            Self::Event { source, .. } => Some(*source),
            Self::TimedOut => None,
        }
    }
}

/// 最初に準備完了になった一つのソースのイベント、またはタイムアウトを返す
///
/// 1回の呼び出しでディスパッチされるのは必ずどちらか一方だけ。
/// 同時に複数のソースが準備完了だった場合にどれが選ばれるかは未規定で、
/// 呼び出し側はその順序に依存してはならない。呼び出しごとに新しい
/// タイムアウト期間が始まる。
pub async fn multiplex<T>(sources: &[&dyn EventSource<T>], timeout: Duration) -> Multiplexed<T> {
    if sources.is_empty() {
        tokio::time::sleep(timeout).await;
        return Multiplexed::TimedOut;
    }

    let pending = sources.iter().map(|source| source.next_event());
    match tokio::time::timeout(timeout, select_all(pending)).await {
        Ok((value, source, _unselected)) => Multiplexed::Event { source, value },
        Err(_) => Multiplexed::TimedOut,
    }
}

/// ソースの組とタイムアウトを保持し、ループから繰り返し呼び出すためのラッパー
pub struct Multiplexer<'a, T> {
    sources: Vec<&'a dyn EventSource<T>>,
    timeout: Duration,
}

impl<'a, T> Multiplexer<'a, T> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            timeout,
        }
    }

    /// ソースを追加する。インデックスは追加順
    pub fn with_source(mut self, source: &'a dyn EventSource<T>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// 次のイベントかタイムアウトを一つ待つ
    pub async fn next(&self) -> Multiplexed<T> {
        multiplex(&self.sources, self.timeout).await
    }
}
