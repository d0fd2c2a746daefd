use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 响应校验策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// 结构不符即失败（实体必须是带字符串 label/value 的对象，摘要非空）
    #[default]
    Strict,
    /// 尽量接受：缺失字段补默认值，畸形实体跳过或转为文本
    Lenient,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => f.write_str("strict"),
            ValidationMode::Lenient => f.write_str("lenient"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "lenient" => Ok(ValidationMode::Lenient),
            _ => Err(format!("Unknown validation mode: {}", s)),
        }
    }
}
