use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::super::{
    AnalysisClient, ApplicationError, CommandHandler, SessionStore, ANALYSIS_FAILED_MESSAGE,
};
use crate::modules::inbox::domain::AnalyzedMessage;
use crate::modules::inbox::ports::MessageRepository;

/// 提交消息命令
#[derive(Debug, Clone)]
pub struct SubmitMessageCommand {
    /// 用户输入的原文（存储时保持原样，发送前 trim）
    pub text: String,
}

impl SubmitMessageCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 提交消息响应
#[derive(Debug, Clone)]
pub struct SubmitMessageResponse {
    pub message: AnalyzedMessage,
}

/// 提交消息命令处理器
///
/// Idle → Analyzing → Idle（新消息或错误）。同一时刻最多一个在途分析。
pub struct SubmitMessageHandler {
    message_repository: Arc<dyn MessageRepository>,
    session: Arc<SessionStore>,
    client: Arc<AnalysisClient>,
}

impl SubmitMessageHandler {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        session: Arc<SessionStore>,
        client: Arc<AnalysisClient>,
    ) -> Self {
        Self {
            message_repository,
            session,
            client,
        }
    }
}

#[async_trait]
impl CommandHandler<SubmitMessageCommand, SubmitMessageResponse> for SubmitMessageHandler {
    async fn handle(
        &self,
        command: SubmitMessageCommand,
    ) -> Result<SubmitMessageResponse, ApplicationError> {
        let text = command.text.trim();
        if text.is_empty() {
            return Err(ApplicationError::ValidationError(
                "Message text cannot be empty".to_string(),
            ));
        }

        let ticket = self.session.begin_analysis()?;
        info!("Analysis started: ticket={}", ticket.id());

        let result = self.client.analyze(text).await;

        let _commit = self.session.commit_lock().await;
        if !ticket.is_current() {
            warn!(
                "Discarding analysis result for ticket {}, session was reset",
                ticket.id()
            );
            return Err(ApplicationError::Superseded);
        }

        let analysis = match result {
            Ok(analysis) => analysis,
            Err(cause) => {
                error!("Failed to analyze message: {}", cause);
                ticket.fail(ANALYSIS_FAILED_MESSAGE);
                return Err(ApplicationError::AnalysisFailed {
                    user_message: ANALYSIS_FAILED_MESSAGE.to_string(),
                    cause,
                });
            }
        };

        let message = AnalyzedMessage::from_analysis(command.text.clone(), analysis);
        if let Err(e) = self.message_repository.prepend(message.clone()).await {
            error!("Failed to store analyzed message: {}", e);
            ticket.fail(ANALYSIS_FAILED_MESSAGE);
            return Err(e.into());
        }

        let ticket_id = ticket.id();
        ticket.succeed();
        info!(
            "Message analyzed: ticket={}, id={}, category={}",
            ticket_id,
            message.id(),
            message.category()
        );

        Ok(SubmitMessageResponse { message })
    }
}
