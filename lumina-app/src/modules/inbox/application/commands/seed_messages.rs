use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::super::{ApplicationError, CommandHandler};
use crate::modules::inbox::domain::AnalyzedMessage;
use crate::modules::inbox::ports::MessageRepository;

/// 预置消息命令，messages 按从新到旧排列
#[derive(Debug, Clone)]
pub struct SeedMessagesCommand {
    pub messages: Vec<AnalyzedMessage>,
}

impl SeedMessagesCommand {
    pub fn new(messages: Vec<AnalyzedMessage>) -> Self {
        Self { messages }
    }
}

/// 预置消息命令处理器
pub struct SeedMessagesHandler {
    message_repository: Arc<dyn MessageRepository>,
}

impl SeedMessagesHandler {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }
}

#[async_trait]
impl CommandHandler<SeedMessagesCommand, usize> for SeedMessagesHandler {
    async fn handle(&self, command: SeedMessagesCommand) -> Result<usize, ApplicationError> {
        let count = command.messages.len();
        // 逆序前插，保持传入的从新到旧顺序
        for message in command.messages.into_iter().rev() {
            self.message_repository.prepend(message).await?;
        }

        info!("Seeded {} messages", count);
        Ok(count)
    }
}
