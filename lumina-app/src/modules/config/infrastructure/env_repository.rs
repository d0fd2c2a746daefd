// Environment Config Repository
//
// 从进程环境变量读取配置（.env 由启动流程预先加载）

use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

pub const API_KEY: &str = "API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const PROVIDER: &str = "LUMINA_PROVIDER";
pub const MODEL: &str = "LUMINA_MODEL";
pub const BASE_URL: &str = "LUMINA_BASE_URL";
pub const TIMEOUT_SECS: &str = "LUMINA_TIMEOUT_SECS";
pub const TEMPERATURE: &str = "LUMINA_TEMPERATURE";
pub const VALIDATION: &str = "LUMINA_VALIDATION";
pub const SEED_DEMO: &str = "LUMINA_SEED_DEMO";

/// 环境变量配置仓储
pub struct EnvConfigRepository {
    vars: HashMap<String, String>,
}

impl EnvConfigRepository {
    /// 读取当前进程环境
    pub fn from_process_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// 使用给定的变量集合（测试用）
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 读取变量，空白值视为未设置
    fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }
}

/// 解析布尔开关
struct Flag(bool);

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Flag(true)),
            "0" | "false" | "no" | "off" => Ok(Flag(false)),
            other => Err(format!("expected true or false, got {:?}", other)),
        }
    }
}

#[async_trait]
impl ConfigRepository for EnvConfigRepository {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        config.llm.api_key = self
            .get(API_KEY)
            .or_else(|| self.get(GEMINI_API_KEY))
            .unwrap_or_default()
            .to_string();

        if let Some(provider) = self.parse(PROVIDER)? {
            config.llm.provider = provider;
        }
        config.llm.model = self.get(MODEL).map(str::to_string);
        config.llm.base_url = self.get(BASE_URL).map(str::to_string);
        config.llm.timeout_secs = self.parse(TIMEOUT_SECS)?;
        config.llm.temperature = self.parse(TEMPERATURE)?;

        if let Some(validation) = self.parse(VALIDATION)? {
            config.analysis.validation = validation;
        }
        if let Some(Flag(seed_demo)) = self.parse(SEED_DEMO)? {
            config.session.seed_demo = seed_demo;
        }

        Ok(config)
    }

    fn source(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::domain::ValidationMode;
    use crate::modules::inbox::ports::ProviderType;

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let config = EnvConfigRepository::from_vars(Vec::<(String, String)>::new())
            .load()
            .await
            .unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_reads_all_variables() {
        let repository = EnvConfigRepository::from_vars([
            (API_KEY, "key-1"),
            (PROVIDER, "openai"),
            (MODEL, "gpt-4o"),
            (BASE_URL, "http://localhost:1234/v1"),
            (TIMEOUT_SECS, "20"),
            (TEMPERATURE, "0.3"),
            (VALIDATION, "lenient"),
            (SEED_DEMO, "false"),
        ]);

        let config = repository.load().await.unwrap();

        assert_eq!(config.llm.api_key, "key-1");
        assert_eq!(config.llm.provider, ProviderType::OpenAI);
        assert_eq!(config.llm.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:1234/v1"));
        assert_eq!(config.llm.timeout_secs, Some(20));
        assert_eq!(config.llm.temperature, Some(0.3));
        assert_eq!(config.analysis.validation, ValidationMode::Lenient);
        assert!(!config.session.seed_demo);
    }

    #[tokio::test]
    async fn test_gemini_api_key_fallback() {
        let config = EnvConfigRepository::from_vars([(GEMINI_API_KEY, "g-key"), (API_KEY, " ")])
            .load()
            .await
            .unwrap();

        assert_eq!(config.llm.api_key, "g-key");
    }

    #[tokio::test]
    async fn test_invalid_value_names_the_variable() {
        let result = EnvConfigRepository::from_vars([(TIMEOUT_SECS, "soon")])
            .load()
            .await;

        match result {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, TIMEOUT_SECS),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }
}
