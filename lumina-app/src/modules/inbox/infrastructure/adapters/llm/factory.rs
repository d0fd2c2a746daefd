use std::sync::Arc;
use tracing::{info, warn};

use crate::modules::inbox::ports::{LLMError, LLMPort, LLMProviderConfig, ProviderType};

use super::{GeminiAdapter, MockLLMAdapter, OpenAIAdapter};

/// 根据配置创建适配器
pub fn create_adapter(config: &LLMProviderConfig) -> Result<Arc<dyn LLMPort>, LLMError> {
    info!(
        "Creating LLM adapter: provider={}, model={}",
        config.provider_type, config.default_model
    );

    match config.provider_type {
        ProviderType::Gemini => Ok(Arc::new(GeminiAdapter::new(config.clone())?)),
        ProviderType::OpenAI => Ok(Arc::new(OpenAIAdapter::new(config.clone())?)),
        ProviderType::Mock => {
            warn!("Using mock LLM adapter, responses are simulated");
            Ok(Arc::new(MockLLMAdapter::new()))
        }
    }
}
