// Inbox Application Layer - 应用层
// 实现 CQRS 模式的命令和查询处理器

pub mod analysis_client;
pub mod commands;
pub mod queries;
pub mod session_state;

// 导出命令和查询
pub use analysis_client::*;
pub use commands::*;
pub use queries::*;
pub use session_state::*;

use async_trait::async_trait;
use thiserror::Error;

use super::ports::{LLMError, RepositoryError};

/// 面向用户的分析失败提示
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze message. Please try again.";

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("An analysis is already in progress")]
    Busy,

    #[error("{user_message}")]
    AnalysisFailed {
        user_message: String,
        #[source]
        cause: AnalysisError,
    },

    /// 调用结束时会话已被重置或被更新的调用取代
    #[error("Analysis result discarded")]
    Superseded,

    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// 命令处理器 trait
///
/// 遵循 CQRS 模式，命令处理器负责执行有副作用的操作
#[async_trait]
pub trait CommandHandler<C, R>: Send + Sync
where
    C: Send + Sync,
{
    /// 执行命令
    async fn handle(&self, command: C) -> Result<R, ApplicationError>;
}

/// 查询处理器 trait
///
/// 遵循 CQRS 模式，查询处理器负责只读操作
#[async_trait]
pub trait QueryHandler<Q, R>: Send + Sync
where
    Q: Send + Sync,
{
    /// 执行查询
    async fn handle(&self, query: Q) -> Result<R, ApplicationError>;
}
