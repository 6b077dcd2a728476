// 報告イベントを記録するレポーター
// mockallでは表しにくい「どのワーカーが何件処理したか」を後から検証する

use async_trait::async_trait;
use conc_pipeline::{CompletionSummary, ProgressReporter};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Started(u64),
    ItemHandled { worker_id: usize, item_id: u64 },
    Progress { collected: u64, total: u64 },
    Failure { item_id: u64, error: String },
    WorkerExited { worker_id: usize, handled: u64 },
    Completed(CompletionSummary),
}

/// クローン間でイベント列を共有するレポーター
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn handled_item_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .events()
            .into_iter()
            .filter_map(|event| match event {
                RecordedEvent::ItemHandled { item_id, .. } => Some(item_id),
                _ => None,
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn worker_exits(&self) -> Vec<(usize, u64)> {
        let mut exits: Vec<(usize, u64)> = self
            .events()
            .into_iter()
            .filter_map(|event| match event {
                RecordedEvent::WorkerExited { worker_id, handled } => Some((worker_id, handled)),
                _ => None,
            })
            .collect();
        exits.sort_unstable();
        exits
    }

    fn record(&self, event: RecordedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ProgressReporter for RecordingReporter {
    async fn report_started(&self, total_items: u64) {
        self.record(RecordedEvent::Started(total_items));
    }

    async fn report_item_handled(&self, worker_id: usize, item_id: u64) {
        self.record(RecordedEvent::ItemHandled { worker_id, item_id });
    }

    async fn report_progress(&self, collected: u64, total: u64) {
        self.record(RecordedEvent::Progress { collected, total });
    }

    async fn report_failure(&self, item_id: u64, error: &str) {
        self.record(RecordedEvent::Failure {
            item_id,
            error: error.to_string(),
        });
    }

    async fn report_worker_exited(&self, worker_id: usize, handled: u64) {
        self.record(RecordedEvent::WorkerExited { worker_id, handled });
    }

    async fn report_completed(&self, summary: &CompletionSummary) {
        self.record(RecordedEvent::Completed(summary.clone()));
    }
}
