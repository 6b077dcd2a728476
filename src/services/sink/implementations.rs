// 結果シンクの具象実装

use crate::core::{ResultItem, ResultSink};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// 結果をメモリ上に保持するシンク
///
/// Cloneしたインスタンスは同じ保存領域を共有する。
#[derive(Debug, Clone, Default)]
pub struct MemoryResultSink {
    results: Arc<Mutex<Vec<ResultItem>>>,
    batches: Arc<AtomicUsize>,
    finalized: Arc<AtomicBool>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存された結果のコピー（到着順）
    pub fn stored_results(&self) -> Vec<ResultItem> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 保存された結果のidを昇順で返す
    pub fn stored_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.stored_results().iter().map(ResultItem::id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn stored_count(&self) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `store_batch`が呼ばれた回数
    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultSink for MemoryResultSink {
    async fn store_batch(&self, results: &[ResultItem]) -> Result<()> {
        if self.is_finalized() {
            anyhow::bail!("store_batch called after finalize");
        }
        self.results
            .lock()
            .map_err(|e| anyhow::anyhow!("result storage lock poisoned: {e}"))?
            .extend_from_slice(results);
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn finalize(&self) -> Result<()> {
        self.finalized.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// 結果を捨てるシンク（集計だけが必要な場合・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct DiscardResultSink;

impl DiscardResultSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResultSink for DiscardResultSink {
    async fn store_batch(&self, _results: &[ResultItem]) -> Result<()> {
        Ok(())
    }

    async fn finalize(&self) -> Result<()> {
        Ok(())
    }
}
