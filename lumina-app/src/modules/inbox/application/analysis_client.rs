use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::modules::inbox::domain::{
    AnalysisResponse, ClassificationRequestBuilder, ResponseParseError, ResponseParser,
    ValidationMode,
};
use crate::modules::inbox::ports::{
    CompletionRequest, LLMChatMessage, LLMError, LLMPort, ResponseFormat,
};

/// 分析错误：传输失败与解析失败合并为一种
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis request failed: {0}")]
    Transport(#[from] LLMError),

    #[error("Analysis response rejected: {0}")]
    Parse(#[from] ResponseParseError),
}

/// 分析客户端
///
/// 一次请求/响应：构建请求、调用 LLM、解析并校验结果。
/// 只尝试一次，不重试。
pub struct AnalysisClient {
    llm: Arc<dyn LLMPort>,
    builder: ClassificationRequestBuilder,
    parser: ResponseParser,
    model: String,
    temperature: Option<f32>,
}

impl AnalysisClient {
    pub fn new(llm: Arc<dyn LLMPort>, model: impl Into<String>) -> Self {
        Self {
            llm,
            builder: ClassificationRequestBuilder::new(),
            parser: ResponseParser::default(),
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.parser = ResponseParser::new(mode);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.parser.mode()
    }

    /// 分析一条消息，调用方保证 text 已 trim 且非空
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResponse, AnalysisError> {
        let classification = self.builder.build(text);

        let mut request = CompletionRequest::new(
            vec![
                LLMChatMessage::system(classification.system_instruction),
                LLMChatMessage::user(classification.prompt),
            ],
            self.model.clone(),
        )
        .with_response_format(ResponseFormat::JsonSchema {
            name: "message_analysis".to_string(),
            schema: classification.response_schema,
        });
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        debug!(
            "Requesting analysis: provider={}, model={}, chars={}",
            self.llm.provider_id(),
            self.model,
            text.chars().count()
        );

        let response = self.llm.complete(request).await?;
        let parsed = self.parser.parse(&response.content)?;

        if let Some(original) = &parsed.coerced_category {
            warn!(
                "Unrecognized category {:?} from provider, falling back to {}",
                original, parsed.response.category
            );
        }

        Ok(parsed.response)
    }
}
