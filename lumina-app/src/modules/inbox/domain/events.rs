use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::AnalyzedMessage;
use super::value_objects::{CategoryFilter, MessageId};

/// 领域事件基础 trait
pub trait DomainEvent: Clone + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> DateTime<Utc>;
}

/// 消息分析完成事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAnalyzedEvent {
    pub message: AnalyzedMessage,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for MessageAnalyzedEvent {
    fn event_type(&self) -> &'static str {
        "message.analyzed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 分析失败事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFailedEvent {
    /// 面向用户的错误信息
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for AnalysisFailedEvent {
    fn event_type(&self) -> &'static str {
        "analysis.failed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 过滤器变更事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterChangedEvent {
    pub filter: CategoryFilter,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for FilterChangedEvent {
    fn event_type(&self) -> &'static str {
        "filter.changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 会话重置事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResetEvent {
    pub removed_messages: usize,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for SessionResetEvent {
    fn event_type(&self) -> &'static str {
        "session.reset"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 收件箱领域事件枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboxDomainEvent {
    MessageAnalyzed(MessageAnalyzedEvent),
    AnalysisFailed(AnalysisFailedEvent),
    FilterChanged(FilterChangedEvent),
    SessionReset(SessionResetEvent),
}

impl InboxDomainEvent {
    pub fn message_analyzed(message: AnalyzedMessage) -> Self {
        Self::MessageAnalyzed(MessageAnalyzedEvent {
            message,
            timestamp: Utc::now(),
        })
    }

    pub fn analysis_failed(error: impl Into<String>) -> Self {
        Self::AnalysisFailed(AnalysisFailedEvent {
            error: error.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn filter_changed(filter: CategoryFilter) -> Self {
        Self::FilterChanged(FilterChangedEvent {
            filter,
            timestamp: Utc::now(),
        })
    }

    pub fn session_reset(removed_messages: usize) -> Self {
        Self::SessionReset(SessionResetEvent {
            removed_messages,
            timestamp: Utc::now(),
        })
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            InboxDomainEvent::MessageAnalyzed(e) => e.event_type(),
            InboxDomainEvent::AnalysisFailed(e) => e.event_type(),
            InboxDomainEvent::FilterChanged(e) => e.event_type(),
            InboxDomainEvent::SessionReset(e) => e.event_type(),
        }
    }

    /// 事件关联的消息 ID（若有）
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            InboxDomainEvent::MessageAnalyzed(e) => Some(e.message.id()),
            _ => None,
        }
    }
}
