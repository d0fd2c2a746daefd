// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 领域层，包含配置实体与校验规则
// - ports: 端口层，定义配置来源的抽象接口
// - infrastructure: 基础设施层，实现环境变量与内存配置来源
// - application: 应用层，实现配置加载查询

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型

// Domain
pub use domain::{AnalysisSettings, AppConfig, LlmSettings, SessionSettings};

// Ports
pub use ports::{ConfigError, ConfigRepository};

// Infrastructure
pub use infrastructure::{EnvConfigRepository, InMemoryConfigRepository};

// Application
pub use application::{LoadConfigHandler, LoadConfigQuery, LoadConfigResponse, QueryHandler};

use std::sync::Arc;

/// Config 模块容器
///
/// 管理模块内的依赖注入
pub struct ConfigModule {
    load_handler: LoadConfigHandler,
}

impl ConfigModule {
    /// 使用内存仓储创建（用于测试）
    pub fn new_in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryConfigRepository::new()))
    }

    /// 从进程环境创建
    pub fn from_env() -> Self {
        Self::with_repository(Arc::new(EnvConfigRepository::from_process_env()))
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            load_handler: LoadConfigHandler::new(repository),
        }
    }

    /// 加载并校验配置
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        let response = self.load_handler.handle(LoadConfigQuery).await?;
        Ok(response.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::domain::ValidationMode;

    #[tokio::test]
    async fn test_config_module_integration() {
        let module = ConfigModule::new_in_memory();
        let config = module.load().await.unwrap();
        assert_eq!(config.analysis.validation, ValidationMode::Strict);

        let module = ConfigModule::with_repository(Arc::new(EnvConfigRepository::from_vars([
            ("LUMINA_VALIDATION", "lenient"),
            ("LUMINA_TEMPERATURE", "9"),
        ])));
        assert!(matches!(
            module.load().await,
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
