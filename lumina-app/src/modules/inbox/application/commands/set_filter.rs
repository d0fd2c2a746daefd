use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::super::{ApplicationError, CommandHandler, SessionStore};
use crate::modules::inbox::domain::CategoryFilter;

/// 设置过滤器命令
#[derive(Debug, Clone, Copy)]
pub struct SetFilterCommand {
    pub filter: CategoryFilter,
}

impl SetFilterCommand {
    pub fn new(filter: impl Into<CategoryFilter>) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

/// 设置过滤器响应
#[derive(Debug, Clone, Copy)]
pub struct SetFilterResponse {
    pub filter: CategoryFilter,
    pub previous: CategoryFilter,
}

/// 设置过滤器命令处理器（纯状态更新）
pub struct SetFilterHandler {
    session: Arc<SessionStore>,
}

impl SetFilterHandler {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CommandHandler<SetFilterCommand, SetFilterResponse> for SetFilterHandler {
    async fn handle(
        &self,
        command: SetFilterCommand,
    ) -> Result<SetFilterResponse, ApplicationError> {
        let previous = self.session.filter();
        self.session.set_filter(command.filter);
        debug!("Filter changed: {} -> {}", previous, command.filter);

        Ok(SetFilterResponse {
            filter: command.filter,
            previous,
        })
    }
}
