use serde::{Deserialize, Serialize};

/// 提取出的实体（标签/值对）
///
/// 同一消息内标签不要求唯一，顺序按服务返回保留
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub label: String,
    pub value: String,
}

impl Entity {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}
