use serde::{Deserialize, Serialize};

use super::{Category, Entity};

/// 分析结果契约
///
/// 经过校验的分类结果；瞬时值，立即被用来构造 AnalyzedMessage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub category: Category,
    pub entities: Vec<Entity>,
    pub summary: String,
}

impl AnalysisResponse {
    pub fn new(category: Category, entities: Vec<Entity>, summary: impl Into<String>) -> Self {
        Self {
            category,
            entities,
            summary: summary.into(),
        }
    }
}
