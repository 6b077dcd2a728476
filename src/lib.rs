// conc_pipeline - 有界キューによる並行パイプラインとワーカープール
// レイヤー構成: core（抽象化） / primitives（並行処理部品） / services（具象実装） / engine（オーケストレーション）

pub mod core;
pub mod engine;
pub mod primitives;
pub mod services;

// 公開API
pub use crate::core::{
    CompletionSummary, ItemTransform, PipelineConfig, PipelineError, PipelineResult,
    ProgressReporter, ResultItem, ResultSink, WorkItem, WorkerReport,
};
pub use engine::{
    create_default_engine, create_quiet_engine, start_pipeline, PipelineEngine, WorkerPool,
};
pub use primitives::{
    multiplex, run_periodic, AtomicCounter, BoundedQueue, EventSource, Multiplexed,
    Multiplexer, PeriodicTicker,
};
pub use services::{
    ConsoleProgressReporter, DefaultPipelineConfig, DelayedTransform, DiscardResultSink,
    FnTransform, MemoryResultSink, NoOpProgressReporter, ScaleTransform,
};
