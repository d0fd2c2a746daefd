// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};

use crate::modules::inbox::domain::ValidationMode;
use crate::modules::inbox::ports::{LLMProviderConfig, ProviderType};

/// LLM 连接配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LlmSettings {
    pub provider: ProviderType,
    /// 凭据，可以为空；缺失只会在调用时表现为请求失败
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// None 表示使用提供商默认模型
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// None 表示沿用传输层默认值
    pub timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
}

impl LlmSettings {
    /// 实际使用的模型
    pub fn effective_model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// 转为适配器配置
    pub fn to_provider_config(&self) -> LLMProviderConfig {
        let mut config = LLMProviderConfig::for_provider(self.provider, self.api_key.clone());
        config.default_model = self.effective_model();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config.timeout_secs = self.timeout_secs;
        config
    }
}

/// 分析配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSettings {
    pub validation: ValidationMode,
}

/// 会话配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    /// 启动时预置演示消息
    pub seed_demo: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { seed_demo: true }
    }
}

/// 应用配置聚合根
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub analysis: AnalysisSettings,
    pub session: SessionSettings,
}

impl AppConfig {
    /// 创建新的默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 验证配置是否有效
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if self.llm.timeout_secs == Some(0) {
            errors.push("Timeout must be greater than 0 seconds".to_string());
        }

        if let Some(model) = &self.llm.model {
            if model.trim().is_empty() {
                errors.push("Model name cannot be empty".to_string());
            }
        }

        if let Some(base_url) = &self.llm.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                errors.push(format!("Base URL must be an http(s) URL: {}", base_url));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
