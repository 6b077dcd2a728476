// 進捗監視の具象実装

use crate::core::{CompletionSummary, ProgressReporter};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    fn timestamp() -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_items: u64) {
        if !self.quiet {
            println!("🚀 [{}] Producing {total_items} items...", Self::timestamp());
        }
    }

    async fn report_item_handled(&self, worker_id: usize, item_id: u64) {
        if !self.quiet {
            println!("  👷 Worker {worker_id} handled item #{item_id}");
        }
    }

    async fn report_progress(&self, collected: u64, total: u64) {
        if !self.quiet {
            println!("    📊 Collected {collected}/{total} results...");
        }
    }

    async fn report_failure(&self, item_id: u64, error: &str) {
        if !self.quiet {
            eprintln!("❌ Item #{item_id} failed: {error}");
        }
    }

    async fn report_worker_exited(&self, worker_id: usize, handled: u64) {
        if !self.quiet {
            println!("  🔌 Worker {worker_id} drained the queue after {handled} items");
        }
    }

    async fn report_completed(&self, summary: &CompletionSummary) {
        if !self.quiet {
            println!(
                "🏁 [{}] Completed! Processed: {}, Failed: {}, Elapsed: {}ms",
                Self::timestamp(),
                summary.processed_count,
                summary.failed_count,
                summary.elapsed_ms
            );
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_items: u64) {}

    async fn report_item_handled(&self, _worker_id: usize, _item_id: u64) {}

    async fn report_progress(&self, _collected: u64, _total: u64) {}

    async fn report_failure(&self, _item_id: u64, _error: &str) {}

    async fn report_worker_exited(&self, _worker_id: usize, _handled: u64) {}

    async fn report_completed(&self, _summary: &CompletionSummary) {}
}
