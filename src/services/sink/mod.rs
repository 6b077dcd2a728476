// 結果シンク機能
// 結果の収集、バッチ受け渡し、完了通知

pub mod collector;
pub mod implementations;

// 公開API
pub use collector::{spawn_collector, CollectorSettings};
pub use implementations::{DiscardResultSink, MemoryResultSink};
