// Config Repository Port
//
// 配置来源端口定义

use async_trait::async_trait;
use thiserror::Error;

use crate::modules::config::domain::AppConfig;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Validation error: {}", .errors.join("; "))]
    ValidationError { errors: Vec<String> },
}

/// 配置仓储端口 - 定义配置来源抽象
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// 加载配置
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// 配置来源名称（用于日志）
    fn source(&self) -> &'static str;
}
