use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::inbox::ports::{
    error_from_status, CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMPort,
    LLMProviderConfig, ProviderInfo, ProviderType, ResponseFormat, TokenUsage,
};

use super::retry_after_secs;

/// OpenAI 兼容 API 适配器
pub struct OpenAIAdapter {
    client: Client,
    config: LLMProviderConfig,
}

impl OpenAIAdapter {
    /// 创建新的 OpenAI 适配器
    pub fn new(config: LLMProviderConfig) -> Result<Self, LLMError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取 API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// 转换为 OpenAI 请求格式
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let model = if request.model.is_empty() {
            self.config.default_model.clone()
        } else {
            request.model.clone()
        };

        OpenAIRequest {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role.clone(),
                    content: Some(m.content.clone()),
                })
                .collect(),
            temperature: request.temperature,
            response_format: request.response_format.as_ref().map(|format| match format {
                ResponseFormat::JsonSchema { name, schema } => OpenAIResponseFormat {
                    kind: "json_schema".to_string(),
                    json_schema: OpenAIJsonSchema {
                        name: name.clone(),
                        schema: schema.clone(),
                        strict: true,
                    },
                },
            }),
        }
    }
}

#[async_trait]
impl LLMPort for OpenAIAdapter {
    fn provider_id(&self) -> &str {
        &self.config.id
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo {
            id: self.config.id.clone(),
            name: self.config.name.clone(),
            provider_type: ProviderType::OpenAI,
            model: self.config.default_model.clone(),
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError> {
        let openai_request = self.to_openai_request(&request);

        debug!(
            "Sending OpenAI completion request: model={}",
            openai_request.model
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error: {} - {}", status, error_text);
            return Err(error_from_status(
                status.as_u16(),
                error_text,
                retry_after,
                &openai_request.model,
            ));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;

        // 没有 choice 时按空内容处理，交由上层校验
        let choice = openai_response.choices.first();

        Ok(CompletionResponse {
            content: choice
                .and_then(|c| c.message.content.clone())
                .unwrap_or_default(),
            finish_reason: choice
                .and_then(|c| c.finish_reason.as_deref())
                .map(FinishReason::from_provider)
                .unwrap_or(FinishReason::Stop),
            usage: openai_response
                .usage
                .map(|u| TokenUsage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default(),
        })
    }
}

// OpenAI API 类型定义

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    kind: String,
    json_schema: OpenAIJsonSchema,
}

#[derive(Debug, Serialize)]
struct OpenAIJsonSchema {
    name: String,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::ports::LLMChatMessage;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(base_url: String) -> OpenAIAdapter {
        let config = LLMProviderConfig {
            base_url,
            api_key: "sk-test".to_string(),
            ..LLMProviderConfig::for_provider(ProviderType::OpenAI, "")
        };
        OpenAIAdapter::new(config).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            vec![LLMChatMessage::system("classify"), LLMChatMessage::user("hi")],
            "gpt-4o-mini",
        )
        .with_temperature(0.2)
        .with_response_format(ResponseFormat::JsonSchema {
            name: "analysis".to_string(),
            schema: json!({ "type": "object" }),
        })
    }

    #[test]
    fn test_request_carries_json_schema_format() {
        let adapter = adapter("http://localhost".to_string());
        let body = serde_json::to_value(adapter.to_openai_request(&request())).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "analysis");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn test_empty_model_falls_back_to_default() {
        let adapter = adapter("http://localhost".to_string());
        let request = CompletionRequest::new(vec![LLMChatMessage::user("hi")], "");

        assert_eq!(adapter.to_openai_request(&request).model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "message": { "role": "assistant", "content": "{\"summary\":\"ok\"}" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7 }
            })))
            .mount(&mock_server)
            .await;

        let response = adapter(mock_server.uri()).complete(request()).await.unwrap();

        assert_eq!(response.content, "{\"summary\":\"ok\"}");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.total_tokens, 7);
    }

    #[tokio::test]
    async fn test_complete_model_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such model"))
            .mount(&mock_server)
            .await;

        let result = adapter(mock_server.uri()).complete(request()).await;

        assert!(matches!(result, Err(LLMError::ModelNotFound(m)) if m == "gpt-4o-mini"));
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&mock_server)
            .await;

        let result = adapter(mock_server.uri()).complete(request()).await;

        match result {
            Err(LLMError::ApiError { code, message }) => {
                assert_eq!(code, "500");
                assert_eq!(message, "internal");
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }
}
