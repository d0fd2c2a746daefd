// LLM Adapters
// 各种 LLM 提供商的适配器实现

mod factory;
mod gemini;
mod mock;
mod openai;

pub use factory::*;
pub use gemini::*;
pub use mock::*;
pub use openai::*;

use reqwest::header::{HeaderMap, RETRY_AFTER};

/// 读取 Retry-After 头（仅支持秒数形式）
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
