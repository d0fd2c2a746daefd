// Inbox Domain Layer
// 领域层包含实体、值对象、领域服务和领域事件

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;

// 重导出常用类型
pub use entities::{newest_first, AnalyzedMessage};
pub use events::*;
pub use services::{
    demo_messages, CategoryStat, ClassificationRequest, ClassificationRequestBuilder,
    ParsedAnalysis, ResponseParseError, ResponseParser, SessionStats, StatsAggregator,
    SYSTEM_INSTRUCTION,
};
pub use value_objects::{
    AnalysisResponse, Category, CategoryFilter, Entity, MessageId, ValidationMode,
};
