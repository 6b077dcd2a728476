// 設定管理の具象実装

use crate::core::{PipelineConfig, PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// デフォルト設定実装
///
/// JSONから読み込む場合、省略したフィールドはデフォルト値になる。
/// `producer_delay_ms`はミリ秒単位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPipelineConfig {
    worker_count: usize,
    queue_capacity: usize,
    batch_size: usize,
    progress_interval: usize,
    producer_delay_ms: u64,
    enable_progress: bool,
}

impl DefaultPipelineConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            worker_count: cpu_count.max(1),
            ..Self::default()
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// Producerの待ち時間を設定する
    ///
    /// 保持はミリ秒単位。端数は切り上げ、`u64`に収まらない値は上限に丸める。
    pub fn with_producer_delay(mut self, delay: Duration) -> Self {
        let millis = delay.as_nanos().div_ceil(1_000_000);
        self.producer_delay_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// JSON文字列から設定を読み込む
    pub fn from_json_str(json: &str) -> PipelineResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PipelineError::configuration(format!("設定JSONの解析に失敗: {e}")))
    }

    /// JSONファイルから設定を読み込む
    pub fn from_json_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::configuration(format!(
                "設定ファイルを読み込めません: {} - {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&content)
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            queue_capacity: 10,
            batch_size: 50,
            progress_interval: 5,
            producer_delay_ms: 0,
            enable_progress: true,
        }
    }
}

impl PipelineConfig for DefaultPipelineConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn progress_interval(&self) -> usize {
        self.progress_interval
    }

    fn producer_delay(&self) -> Duration {
        Duration::from_millis(self.producer_delay_ms)
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
