use async_trait::async_trait;
use thiserror::Error;

use super::super::domain::{AnalyzedMessage, MessageId};

/// 仓储错误类型
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// 消息仓储端口
///
/// 会话内消息序列的唯一所有者，序列始终按从新到旧排列
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 把消息插入到序列最前
    async fn prepend(&self, message: AnalyzedMessage) -> Result<(), RepositoryError>;

    /// 根据 ID 获取消息
    async fn get(&self, id: MessageId) -> Result<Option<AnalyzedMessage>, RepositoryError>;

    /// 完整序列快照（从新到旧）
    async fn list(&self) -> Result<Vec<AnalyzedMessage>, RepositoryError>;

    /// 消息数量
    async fn count(&self) -> Result<usize, RepositoryError>;

    /// 清空序列，返回被移除的数量
    async fn clear(&self) -> Result<usize, RepositoryError>;
}
