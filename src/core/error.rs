// パイプライン用のカスタムエラー型定義
// プロトコル違反（close済みキューへのput、二重close）はエラーではなくpanicで扱う

use thiserror::Error;

/// パイプライン実行時のエラー型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("チャンネルエラー: {message}")]
    ChannelError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("結果シンクエラー: {source}")]
    SinkError {
        #[source]
        source: anyhow::Error,
    },

    #[error("変換エラー: item #{id} - {source}")]
    TransformError {
        id: u64,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// チャンネルエラーの作成
    pub fn channel(message: impl Into<String>) -> Self {
        Self::ChannelError {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// 結果シンクエラーの作成
    pub fn sink(source: anyhow::Error) -> Self {
        Self::SinkError { source }
    }

    /// 変換エラーの作成
    pub fn transform(id: u64, source: anyhow::Error) -> Self {
        Self::TransformError { id, source }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// 変換エラーは単一アイテムに閉じるため回復可能。
    /// 設定エラーとタスク異常終了は実行をやり直す必要がある。
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConfigurationError { .. } => false,
            Self::TaskError { .. } => false,
            Self::ChannelError { .. } => false,
            Self::SinkError { .. } => true,
            Self::TransformError { .. } => true,
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::task(source)
    }
}

/// パイプライン処理の結果型
pub type PipelineResult<T> = Result<T, PipelineError>;
