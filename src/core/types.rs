// パイプラインを流れるデータ型定義

use serde::{Deserialize, Serialize};

/// Producerが生成する作業単位
///
/// 生成後は不変。キューを通じて常に一つのステージだけが所有する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkItem {
    pub id: u64,
    pub payload: f64,
}

impl WorkItem {
    pub fn new(id: u64, payload: f64) -> Self {
        Self { id, payload }
    }
}

/// ワーカーが作業単位ごとに一つだけ生成する結果
#[derive(Debug, Clone, PartialEq)]
pub enum ResultItem {
    Processed {
        id: u64,
        worker_id: usize,
        value: f64,
    },
    Failed {
        id: u64,
        worker_id: usize,
        error: String,
    },
}

impl ResultItem {
    /// 元になったWorkItemのid
    pub fn id(&self) -> u64 {
        match self {
            Self::Processed { id, .. } | Self::Failed { id, .. } => *id,
        }
    }

    /// 結果を生成したワーカーのid
    pub fn worker_id(&self) -> usize {
        match self {
            Self::Processed { worker_id, .. } | Self::Failed { worker_id, .. } => *worker_id,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// ワーカー終了時の報告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub handled: u64,
}

/// パイプライン全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub total_items: u64,
    pub processed_count: u64,
    pub succeeded_count: u64,
    pub failed_count: u64,
    pub value_sum: f64,
    pub elapsed_ms: u64,
}

impl CompletionSummary {
    /// 成功した結果の平均値（成功がなければ0.0）
    pub fn average_value(&self) -> f64 {
        if self.succeeded_count > 0 {
            self.value_sum / self.succeeded_count as f64
        } else {
            0.0
        }
    }
}
