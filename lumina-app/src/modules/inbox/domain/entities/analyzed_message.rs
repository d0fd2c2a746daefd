use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::super::value_objects::{AnalysisResponse, Category, Entity, MessageId};

/// 已分析消息实体
///
/// 只能由一次成功的分析创建，创建后不可变，只在会话重置时被移除
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedMessage {
    /// 消息唯一标识
    id: MessageId,
    /// 用户提交的原始文本
    original_text: String,
    /// 分类
    category: Category,
    /// 提取的实体（保持返回顺序）
    entities: Vec<Entity>,
    /// 一句话摘要
    summary: String,
    /// 创建时间
    created_at: DateTime<Utc>,
}

impl AnalyzedMessage {
    /// 由分析结果创建消息（新 ID + 当前时间）
    pub fn from_analysis(original_text: impl Into<String>, analysis: AnalysisResponse) -> Self {
        Self::with_timestamp(original_text, analysis, Utc::now())
    }

    /// 使用指定时间创建消息
    pub fn with_timestamp(
        original_text: impl Into<String>,
        analysis: AnalysisResponse,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            original_text: original_text.into(),
            category: analysis.category,
            entities: analysis.entities,
            summary: analysis.summary,
            created_at,
        }
    }

    // Getters
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 展示用的全序：按创建时间从新到旧，时间相同时按 ID 从大到小
pub fn newest_first(a: &AnalyzedMessage, b: &AnalyzedMessage) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}
