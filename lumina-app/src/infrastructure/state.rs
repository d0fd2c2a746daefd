use std::sync::Arc;

use crate::infrastructure::EventBus;
use crate::modules::config::AppConfig;
use crate::modules::inbox::{create_adapter, AnalysisClient, InMemoryMessageRepository};
use crate::modules::InboxModule;
use crate::shared::AppResult;

/// 应用全局状态
///
/// 会话与消息由 InboxModule 管理，这里只保存装配结果和生效配置
pub struct AppState {
    pub config: AppConfig,
    pub event_bus: Arc<EventBus>,
    pub inbox: Arc<InboxModule>,
}

impl AppState {
    /// 按配置装配 LLM 适配器、分析客户端与 Inbox 模块
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let llm = create_adapter(&config.llm.to_provider_config())?;

        let client = AnalysisClient::new(llm, config.llm.effective_model())
            .with_temperature(config.llm.temperature)
            .with_validation(config.analysis.validation);

        let event_bus = Arc::new(EventBus::new());
        let inbox = Arc::new(InboxModule::with_repository(
            Arc::new(InMemoryMessageRepository::new()),
            client,
            event_bus.clone(),
        ));

        Ok(Self {
            config,
            event_bus,
            inbox,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::{ProviderType, ValidationMode};

    #[tokio::test]
    async fn test_state_wires_configured_client() {
        let mut config = AppConfig::default();
        config.llm.provider = ProviderType::Mock;
        config.analysis.validation = ValidationMode::Lenient;

        let state = AppState::new(config).unwrap();
        let client = state.inbox.analysis_client();

        assert_eq!(client.model(), "mock-model");
        assert_eq!(client.validation_mode(), ValidationMode::Lenient);

        let mut events = state.event_bus.subscribe();
        state.inbox.submit("hello").await.unwrap();
        assert_eq!(events.recv().await.unwrap().event_type(), "message.analyzed");
    }
}
