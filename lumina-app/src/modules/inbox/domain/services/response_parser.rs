use serde_json::{Map, Value};
use thiserror::Error;

use super::super::value_objects::{AnalysisResponse, Category, Entity, ValidationMode};

/// 响应解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseParseError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Response failed validation: {0}")]
    Validation(String),
}

/// 解析结果，附带类别是否被强制改写
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnalysis {
    pub response: AnalysisResponse,
    /// 原始类别值不在枚举内、被改写为 General 时为 Some(原值)
    pub coerced_category: Option<String>,
}

/// 响应解析器
///
/// 领域服务：把外部服务返回的非类型化 JSON 文本映射为 AnalysisResponse。
/// 类别归一化在两种模式下都生效；其余字段按 ValidationMode 处理。
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    mode: ValidationMode,
}

impl ResponseParser {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// 解析原始响应文本
    ///
    /// 空白响应视为空对象；非空但不是合法 JSON 属于硬失败。
    pub fn parse(&self, raw: &str) -> Result<ParsedAnalysis, ResponseParseError> {
        let body = strip_code_fence(raw);
        let value = if body.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str::<Value>(body)
                .map_err(|e| ResponseParseError::InvalidJson(e.to_string()))?
        };

        self.validate(value)
    }

    /// 校验并归一化已解析的 JSON 值
    pub fn validate(&self, value: Value) -> Result<ParsedAnalysis, ResponseParseError> {
        let object = match value {
            Value::Object(map) => map,
            other => match self.mode {
                ValidationMode::Strict => {
                    return Err(ResponseParseError::Validation(format!(
                        "expected a JSON object, got {}",
                        json_kind(&other)
                    )))
                }
                ValidationMode::Lenient => Map::new(),
            },
        };

        let (category, coerced_category) = normalize_category(object.get("category"));
        let entities = match self.mode {
            ValidationMode::Strict => strict_entities(object.get("entities"))?,
            ValidationMode::Lenient => lenient_entities(object.get("entities")),
        };
        let summary = match self.mode {
            ValidationMode::Strict => strict_summary(object.get("summary"))?,
            ValidationMode::Lenient => object.get("summary").map(scalar_text).unwrap_or_default(),
        };

        Ok(ParsedAnalysis {
            response: AnalysisResponse::new(category, entities, summary),
            coerced_category,
        })
    }
}

/// 去掉 markdown 代码块包裹
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // 跳过语言标记行（```json）
    match rest.find('\n') {
        Some(pos) => rest[pos + 1..].trim(),
        None => rest.trim(),
    }
}

fn normalize_category(value: Option<&Value>) -> (Category, Option<String>) {
    let wire = value.and_then(Value::as_str);
    let category = Category::normalize(wire);
    let coerced = match (wire, category) {
        (Some(w), c) if c.as_str() == w => None,
        _ => Some(value.map(scalar_text).unwrap_or_default()),
    };
    (category, coerced)
}

fn strict_entities(value: Option<&Value>) -> Result<Vec<Entity>, ResponseParseError> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ResponseParseError::Validation(format!(
                "`entities` must be an array, got {}",
                json_kind(other)
            )))
        }
        None => {
            return Err(ResponseParseError::Validation(
                "missing `entities` field".to_string(),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let label = item.get("label").and_then(Value::as_str);
            let value = item.get("value").and_then(Value::as_str);
            match (label, value) {
                (Some(label), Some(value)) => Ok(Entity::new(label, value)),
                _ => Err(ResponseParseError::Validation(format!(
                    "entity #{} must be an object with string `label` and `value`",
                    index
                ))),
            }
        })
        .collect()
}

fn lenient_entities(value: Option<&Value>) -> Vec<Entity> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| {
            Entity::new(
                item.get("label").map(scalar_text).unwrap_or_default(),
                item.get("value").map(scalar_text).unwrap_or_default(),
            )
        })
        .collect()
}

fn strict_summary(value: Option<&Value>) -> Result<String, ResponseParseError> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(ResponseParseError::Validation(
            "`summary` must not be empty".to_string(),
        )),
        Some(other) => Err(ResponseParseError::Validation(format!(
            "`summary` must be a string, got {}",
            json_kind(other)
        ))),
        None => Err(ResponseParseError::Validation(
            "missing `summary` field".to_string(),
        )),
    }
}

/// 把标量转为文本；null 视为空字符串
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
