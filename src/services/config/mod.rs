// 設定管理機能
// ワーカー数、キュー容量、バッチサイズ等の設定

pub mod implementations;

// 公開API
pub use implementations::DefaultPipelineConfig;
