use async_trait::async_trait;
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler};
use crate::modules::inbox::domain::{SessionStats, StatsAggregator};
use crate::modules::inbox::ports::MessageRepository;

/// 统计查询（始终基于完整序列，不受过滤器影响）
#[derive(Debug, Clone, Copy, Default)]
pub struct GetStatsQuery;

/// 统计查询处理器
pub struct GetStatsHandler {
    message_repository: Arc<dyn MessageRepository>,
    aggregator: StatsAggregator,
}

impl GetStatsHandler {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self {
            message_repository,
            aggregator: StatsAggregator::new(),
        }
    }
}

#[async_trait]
impl QueryHandler<GetStatsQuery, SessionStats> for GetStatsHandler {
    async fn handle(&self, _query: GetStatsQuery) -> Result<SessionStats, ApplicationError> {
        let messages = self.message_repository.list().await?;
        Ok(self.aggregator.aggregate(&messages))
    }
}
