use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// LLM 错误类型
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitError { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// LLM 提供商类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Gemini,
    OpenAI,
    Mock,
}

impl ProviderType {
    /// 默认 API 地址
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderType::OpenAI => "https://api.openai.com/v1",
            ProviderType::Mock => "",
        }
    }

    /// 默认模型
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderType::Gemini => "gemini-3-flash-preview",
            ProviderType::OpenAI => "gpt-4o-mini",
            ProviderType::Mock => "mock-model",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderType::Gemini => "gemini",
            ProviderType::OpenAI => "openai",
            ProviderType::Mock => "mock",
        };
        f.write_str(s)
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderType::Gemini),
            "openai" => Ok(ProviderType::OpenAI),
            "mock" => Ok(ProviderType::Mock),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 提供商信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub provider_type: ProviderType,
    pub model: String,
}

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMChatMessage {
    pub role: String,
    pub content: String,
}

impl LLMChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 响应格式约束
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// 要求返回符合 JSON Schema 的 JSON
    JsonSchema {
        name: String,
        schema: serde_json::Value,
    },
}

/// 补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// 消息列表（system 消息由适配器转换为各自的系统指令字段）
    pub messages: Vec<LLMChatMessage>,
    /// 模型 ID
    pub model: String,
    /// 温度参数 (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// 输出格式约束
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<LLMChatMessage>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            temperature: None,
            response_format: None,
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// 合并所有 system 消息
    pub fn system_text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

/// 补全响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    /// 文本内容（服务未返回候选时为空字符串）
    pub content: String,
    pub finish_reason: FinishReason,
    pub usage: TokenUsage,
}

/// 结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

impl FinishReason {
    /// 解析 OpenAI / Gemini 的结束原因字符串
    pub fn from_provider(reason: &str) -> Self {
        match reason.to_ascii_lowercase().as_str() {
            "length" | "max_tokens" => FinishReason::Length,
            "content_filter" | "safety" | "recitation" | "blocklist"
            | "prohibited_content" | "spii" => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        }
    }
}

/// Token 使用统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// LLM 服务端口 - 核心抽象接口
///
/// 所有 LLM 提供商适配器都必须实现此 trait。
/// 每次 complete 只发起一次请求，不重试。
#[async_trait]
pub trait LLMPort: Send + Sync {
    /// 获取提供商 ID
    fn provider_id(&self) -> &str;

    /// 获取提供商信息
    fn provider_info(&self) -> ProviderInfo;

    /// 单次补全请求
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError>;
}

/// LLM 提供商配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LLMProviderConfig {
    pub id: String,
    pub name: String,
    pub provider_type: ProviderType,
    pub base_url: String,
    pub api_key: String,
    pub default_model: String,
    /// None 表示沿用传输层默认值
    pub timeout_secs: Option<u64>,
}

impl LLMProviderConfig {
    /// 以提供商默认值构建配置
    pub fn for_provider(provider_type: ProviderType, api_key: impl Into<String>) -> Self {
        Self {
            id: provider_type.to_string(),
            name: provider_type.to_string(),
            provider_type,
            base_url: provider_type.default_base_url().to_string(),
            api_key: api_key.into(),
            default_model: provider_type.default_model().to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self::for_provider(ProviderType::Gemini, String::new())
    }
}

/// 根据 HTTP 状态码映射错误
pub fn error_from_status(
    status: u16,
    body: String,
    retry_after_secs: Option<u64>,
    model: &str,
) -> LLMError {
    match status {
        401 | 403 => LLMError::AuthenticationError(body),
        404 => LLMError::ModelNotFound(model.to_string()),
        429 => LLMError::RateLimitError {
            retry_after_secs: retry_after_secs.unwrap_or(0),
        },
        _ => LLMError::ApiError {
            code: status.to_string(),
            message: body,
        },
    }
}
