use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::modules::inbox::domain::{AnalyzedMessage, MessageId};
use crate::modules::inbox::ports::{MessageRepository, RepositoryError};

/// 内存消息仓储
///
/// 会话只存在于进程内存中，序列下标 0 为最新消息
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<AnalyzedMessage>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
        }
    }

    /// 使用已有序列（从新到旧）初始化
    pub fn with_messages(messages: Vec<AnalyzedMessage>) -> Self {
        Self {
            messages: RwLock::new(messages),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn prepend(&self, message: AnalyzedMessage) -> Result<(), RepositoryError> {
        let mut messages = self.messages.write().await;

        if messages.iter().any(|m| m.id() == message.id()) {
            return Err(RepositoryError::Conflict(message.id().to_string()));
        }

        messages.insert(0, message);
        Ok(())
    }

    async fn get(&self, id: MessageId) -> Result<Option<AnalyzedMessage>, RepositoryError> {
        let messages = self.messages.read().await;
        Ok(messages.iter().find(|m| m.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<AnalyzedMessage>, RepositoryError> {
        let messages = self.messages.read().await;
        Ok(messages.clone())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let messages = self.messages.read().await;
        Ok(messages.len())
    }

    async fn clear(&self) -> Result<usize, RepositoryError> {
        let mut messages = self.messages.write().await;
        let removed = messages.len();
        messages.clear();
        Ok(removed)
    }
}
