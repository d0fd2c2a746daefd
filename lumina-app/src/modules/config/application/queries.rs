// Config Queries
//
// 配置相关的查询处理器

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 查询处理器 trait
#[async_trait]
pub trait QueryHandler<Q> {
    type Output;
    type Error;

    async fn handle(&self, query: Q) -> Result<Self::Output, Self::Error>;
}

// ============================================================================
// Load Config Query
// ============================================================================

/// 加载配置查询
#[derive(Debug, Clone, Default)]
pub struct LoadConfigQuery;

/// 加载配置响应
#[derive(Debug, Clone)]
pub struct LoadConfigResponse {
    pub config: AppConfig,
    pub source: &'static str,
}

/// 加载配置查询处理器
///
/// 读取配置并校验，校验失败时一次性返回全部问题
pub struct LoadConfigHandler {
    repository: Arc<dyn ConfigRepository>,
}

impl LoadConfigHandler {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<LoadConfigQuery> for LoadConfigHandler {
    type Output = LoadConfigResponse;
    type Error = ConfigError;

    async fn handle(&self, _query: LoadConfigQuery) -> Result<Self::Output, Self::Error> {
        let source = self.repository.source();
        debug!("Loading configuration from {}", source);

        let config = self.repository.load().await?;
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;

        info!(
            "Configuration loaded: source={}, provider={}, model={}, validation={}",
            source,
            config.llm.provider,
            config.llm.effective_model(),
            config.analysis.validation
        );

        Ok(LoadConfigResponse { config, source })
    }
}
