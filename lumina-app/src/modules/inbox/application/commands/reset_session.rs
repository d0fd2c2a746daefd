use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::super::{ApplicationError, CommandHandler, SessionStore};
use crate::modules::inbox::ports::MessageRepository;

/// 重置会话命令
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetSessionCommand;

/// 重置会话响应
#[derive(Debug, Clone, Copy)]
pub struct ResetSessionResponse {
    pub removed_messages: usize,
}

/// 重置会话命令处理器
///
/// 清空消息序列和会话状态，在途分析的结果会被丢弃
pub struct ResetSessionHandler {
    message_repository: Arc<dyn MessageRepository>,
    session: Arc<SessionStore>,
}

impl ResetSessionHandler {
    pub fn new(message_repository: Arc<dyn MessageRepository>, session: Arc<SessionStore>) -> Self {
        Self {
            message_repository,
            session,
        }
    }
}

#[async_trait]
impl CommandHandler<ResetSessionCommand, ResetSessionResponse> for ResetSessionHandler {
    async fn handle(
        &self,
        _command: ResetSessionCommand,
    ) -> Result<ResetSessionResponse, ApplicationError> {
        let _commit = self.session.commit_lock().await;
        self.session.reset();
        let removed_messages = self.message_repository.clear().await?;

        info!("Session reset: removed {} messages", removed_messages);

        Ok(ResetSessionResponse { removed_messages })
    }
}
