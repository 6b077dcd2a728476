// アイテム変換機能
// ワーカーが各WorkItemに適用する処理

pub mod implementations;

// 公開API
pub use implementations::{DelayedTransform, FnTransform, ScaleTransform};
