use serde_json::{json, Value};

/// 分类指令（系统提示词）
pub const SYSTEM_INSTRUCTION: &str = "\
You are an advanced NLP assistant specialized in personal message organization.
Analyze the provided message and extract structured data without any sentiment analysis.
Identify the most relevant category from: Delivery, Banking, Appointment, Travel, Promotion, Reminder, Bill Payment, General.
Extract entities such as order IDs, tracking numbers, transaction amounts, dates, times, service providers (Amazon, DHL, etc.), and locations.
Summarize the key action or information in one short sentence.

Return ONLY a JSON object with the following schema:
{
  \"category\": \"string\",
  \"entities\": [{\"label\": \"string\", \"value\": \"string\"}],
  \"summary\": \"string\"
}
";

/// 构建完成的分类请求描述
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    /// 固定的系统指令
    pub system_instruction: String,
    /// 嵌入用户消息的任务提示
    pub prompt: String,
    /// 严格输出结构（JSON Schema）
    pub response_schema: Value,
}

/// 分类请求构建器
///
/// 领域服务：纯数据构造，无副作用。
/// 调用方保证输入已 trim 且非空。
#[derive(Debug, Clone)]
pub struct ClassificationRequestBuilder {
    system_instruction: String,
}

impl Default for ClassificationRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationRequestBuilder {
    pub fn new() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    /// 构建请求
    pub fn build(&self, text: &str) -> ClassificationRequest {
        ClassificationRequest {
            system_instruction: self.system_instruction.clone(),
            prompt: Self::task_prompt(text),
            response_schema: Self::response_schema(),
        }
    }

    /// 任务提示
    pub fn task_prompt(text: &str) -> String {
        format!(
            "Analyze the following message and return JSON structure as instructed. Message: \"{}\"",
            text
        )
    }

    /// 输出结构：category / entities / summary 三个必填字段
    pub fn response_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": { "type": "string" },
                "entities": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "label": { "type": "string" },
                            "value": { "type": "string" }
                        },
                        "required": ["label", "value"],
                        "additionalProperties": false
                    }
                },
                "summary": { "type": "string" }
            },
            "required": ["category", "entities", "summary"],
            "additionalProperties": false
        })
    }
}
