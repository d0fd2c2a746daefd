use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use crate::modules::inbox::ports::{
    CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMPort, ProviderInfo,
    ProviderType, TokenUsage,
};

/// 预设的单次回复
#[derive(Debug)]
pub enum MockReply {
    Content(String),
    Error(LLMError),
}

/// 模拟 LLM 适配器
///
/// 用于测试或未配置 API Key 时的回退。
/// 按顺序消费预设回复，耗尽后回显一个 General 分类。
#[derive(Default)]
pub struct MockLLMAdapter {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
    gate: Option<Arc<Notify>>,
}

impl MockLLMAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条成功回复
    pub fn with_content(self, content: impl Into<String>) -> Self {
        self.push(MockReply::Content(content.into()));
        self
    }

    /// 追加一条失败回复
    pub fn with_error(self, error: LLMError) -> Self {
        self.push(MockReply::Error(error));
        self
    }

    /// 每次 complete 前等待放行信号
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push(&self, reply: MockReply) {
        lock(&self.replies).push_back(reply);
    }

    /// 已收到的请求
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn echo(request: &CompletionRequest) -> String {
        let user_content = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("");

        json!({
            "category": "General",
            "entities": [],
            "summary": format!("Mock analysis of: {}", user_content)
        })
        .to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LLMPort for MockLLMAdapter {
    fn provider_id(&self) -> &str {
        "mock"
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo {
            id: "mock".to_string(),
            name: "Mock Provider (Simulation)".to_string(),
            provider_type: ProviderType::Mock,
            model: ProviderType::Mock.default_model().to_string(),
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError> {
        lock(&self.requests).push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = lock(&self.replies).pop_front();
        let content = match reply {
            Some(MockReply::Content(content)) => content,
            Some(MockReply::Error(error)) => return Err(error),
            None => Self::echo(&request),
        };

        Ok(CompletionResponse {
            content,
            finish_reason: FinishReason::Stop,
            usage: TokenUsage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::ports::LLMChatMessage;

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest::new(vec![LLMChatMessage::user(text)], "mock-model")
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockLLMAdapter::new()
            .with_content("first")
            .with_error(LLMError::NetworkError("down".to_string()));

        assert_eq!(mock.complete(request("a")).await.unwrap().content, "first");
        assert!(matches!(
            mock.complete(request("b")).await,
            Err(LLMError::NetworkError(_))
        ));
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.requests()[1].messages[0].content, "b");
    }

    #[tokio::test]
    async fn test_echo_when_exhausted() {
        let mock = MockLLMAdapter::new();
        let content = mock.complete(request("hello")).await.unwrap().content;
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["category"], "General");
        assert_eq!(value["summary"], "Mock analysis of: hello");
    }
}
