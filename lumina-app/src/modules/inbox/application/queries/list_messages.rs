use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler, SessionStore};
use crate::modules::inbox::domain::{AnalyzedMessage, CategoryFilter};
use crate::modules::inbox::ports::MessageRepository;

/// 过滤结果为空时的提示
pub const EMPTY_STATE_MESSAGE: &str = "No messages found in this category.";

/// 列出消息查询
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMessagesQuery {
    /// None 表示使用会话当前的过滤器
    pub filter: Option<CategoryFilter>,
}

impl ListMessagesQuery {
    pub fn current() -> Self {
        Self { filter: None }
    }

    pub fn with_filter(filter: impl Into<CategoryFilter>) -> Self {
        Self {
            filter: Some(filter.into()),
        }
    }
}

/// 列出消息响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    pub filter: CategoryFilter,
    /// 过滤后的消息，保持从新到旧
    pub messages: Vec<AnalyzedMessage>,
    /// 过滤前的消息总数
    pub total: usize,
}

impl ListMessagesResponse {
    /// 列表标题，如 "Travel Messages (2)"
    pub fn header(&self) -> String {
        format!("{} Messages ({})", self.filter.label(), self.messages.len())
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn empty_state(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_STATE_MESSAGE)
    }
}

/// 列出消息查询处理器
pub struct ListMessagesHandler {
    message_repository: Arc<dyn MessageRepository>,
    session: Arc<SessionStore>,
}

impl ListMessagesHandler {
    pub fn new(message_repository: Arc<dyn MessageRepository>, session: Arc<SessionStore>) -> Self {
        Self {
            message_repository,
            session,
        }
    }
}

#[async_trait]
impl QueryHandler<ListMessagesQuery, ListMessagesResponse> for ListMessagesHandler {
    async fn handle(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        let filter = query.filter.unwrap_or_else(|| self.session.filter());
        let all = self.message_repository.list().await?;
        let total = all.len();

        let messages = all
            .into_iter()
            .filter(|m| filter.matches(m.category()))
            .collect();

        Ok(ListMessagesResponse {
            filter,
            messages,
            total,
        })
    }
}
