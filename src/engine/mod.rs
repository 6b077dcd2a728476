// エンジン層 - 並列処理とオーケストレーション
// サービス層とプリミティブを組み合わせて高レベルな処理を提供

pub mod api;
pub mod consumer;
mod pipeline;
pub mod pipeline_engine;
pub mod producer;

// 公開API - 主要エンジンクラス
pub use api::{create_default_engine, create_quiet_engine, start_pipeline};
pub use consumer::WorkerPool;
pub use pipeline_engine::{validate_config, PipelineEngine};
pub use producer::{id_payload, spawn_producer, PayloadFn};
