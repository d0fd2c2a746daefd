use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::ApplicationError;
use crate::modules::inbox::domain::CategoryFilter;

/// 分析状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    /// 携带最近一次在途调用的票号
    Analyzing { ticket: u64 },
}

/// 会话状态快照（只读视图）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub filter: CategoryFilter,
    pub status: AnalysisStatus,
    pub last_error: Option<String>,
    pub draft: String,
}

impl SessionSnapshot {
    pub fn is_analyzing(&self) -> bool {
        matches!(self.status, AnalysisStatus::Analyzing { .. })
    }
}

#[derive(Debug, Default)]
struct SessionState {
    filter: CategoryFilter,
    status: AnalysisStatus,
    last_error: Option<String>,
    draft: String,
    next_ticket: u64,
}

/// 会话状态存储
///
/// 同步锁只在单个操作内持有，从不跨越 `.await`。
/// 消息序列由 MessageRepository 持有，这里只管理过滤器、分析状态、错误与草稿。
#[derive(Debug, Default)]
pub struct SessionStore {
    state: Mutex<SessionState>,
    /// 串行化"结果落库"与"会话重置"
    commit: tokio::sync::Mutex<()>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            filter: state.filter,
            status: state.status,
            last_error: state.last_error.clone(),
            draft: state.draft.clone(),
        }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.lock().filter
    }

    pub fn set_filter(&self, filter: CategoryFilter) {
        self.lock().filter = filter;
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        self.lock().draft = draft.into();
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.lock().status, AnalysisStatus::Analyzing { .. })
    }

    /// 进入 Analyzing 状态并签发票号；已有在途调用时拒绝
    pub fn begin_analysis(self: &Arc<Self>) -> Result<AnalysisTicket, ApplicationError> {
        let mut state = self.lock();
        if let AnalysisStatus::Analyzing { .. } = state.status {
            return Err(ApplicationError::Busy);
        }

        state.next_ticket += 1;
        let ticket = state.next_ticket;
        state.status = AnalysisStatus::Analyzing { ticket };
        state.last_error = None;

        Ok(AnalysisTicket {
            store: Arc::clone(self),
            ticket,
            settled: false,
        })
    }

    /// 重置：过滤器回到 All，清除错误和草稿，作废在途调用
    pub fn reset(&self) {
        let mut state = self.lock();
        state.filter = CategoryFilter::All;
        state.status = AnalysisStatus::Idle;
        state.last_error = None;
        state.draft.clear();
    }

    /// 获取提交锁，持有期间票号状态不会被重置改变
    pub async fn commit_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.commit.lock().await
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.lock().status == AnalysisStatus::Analyzing { ticket }
    }

    fn settle(&self, ticket: u64, outcome: Settlement<'_>) -> bool {
        let mut state = self.lock();
        if state.status != (AnalysisStatus::Analyzing { ticket }) {
            return false;
        }

        state.status = AnalysisStatus::Idle;
        match outcome {
            Settlement::Succeeded => state.draft.clear(),
            Settlement::Failed(message) => state.last_error = Some(message.to_string()),
            Settlement::Abandoned => {}
        }
        true
    }
}

enum Settlement<'a> {
    Succeeded,
    Failed(&'a str),
    Abandoned,
}

/// 在途分析的票据
///
/// 被丢弃时若仍是当前调用，状态回到 Idle（提交方 future 被取消的情形）。
#[derive(Debug)]
pub struct AnalysisTicket {
    store: Arc<SessionStore>,
    ticket: u64,
    settled: bool,
}

impl AnalysisTicket {
    pub fn id(&self) -> u64 {
        self.ticket
    }

    /// 是否仍为最近的在途调用
    pub fn is_current(&self) -> bool {
        self.store.is_current(self.ticket)
    }

    /// 成功：回到 Idle 并清空草稿
    pub fn succeed(mut self) -> bool {
        self.settled = true;
        self.store.settle(self.ticket, Settlement::Succeeded)
    }

    /// 失败：回到 Idle 并记录面向用户的错误
    pub fn fail(mut self, user_message: &str) -> bool {
        self.settled = true;
        self.store.settle(self.ticket, Settlement::Failed(user_message))
    }
}

impl Drop for AnalysisTicket {
    fn drop(&mut self) {
        if !self.settled && self.store.settle(self.ticket, Settlement::Abandoned) {
            debug!("Analysis ticket {} abandoned, session back to idle", self.ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::domain::Category;

    #[test]
    fn test_begin_rejects_when_busy() {
        let store = Arc::new(SessionStore::new());
        let ticket = store.begin_analysis().unwrap();

        assert!(matches!(store.begin_analysis(), Err(ApplicationError::Busy)));
        assert_eq!(
            store.snapshot().status,
            AnalysisStatus::Analyzing { ticket: ticket.id() }
        );
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let store = Arc::new(SessionStore::new());
        store.begin_analysis().unwrap().fail("boom");
        assert_eq!(store.snapshot().last_error.as_deref(), Some("boom"));

        let _ticket = store.begin_analysis().unwrap();
        assert!(store.snapshot().last_error.is_none());
    }

    #[test]
    fn test_succeed_clears_draft_and_returns_to_idle() {
        let store = Arc::new(SessionStore::new());
        store.set_draft("Flight to NYC");

        assert!(store.begin_analysis().unwrap().succeed());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.status, AnalysisStatus::Idle);
        assert_eq!(snapshot.draft, "");
    }

    #[test]
    fn test_fail_keeps_draft() {
        let store = Arc::new(SessionStore::new());
        store.set_draft("Flight to NYC");

        assert!(store.begin_analysis().unwrap().fail("Failed"));

        let snapshot = store.snapshot();
        assert!(!snapshot.is_analyzing());
        assert_eq!(snapshot.draft, "Flight to NYC");
        assert_eq!(snapshot.last_error.as_deref(), Some("Failed"));
    }

    #[test]
    fn test_dropped_ticket_releases_analyzing() {
        let store = Arc::new(SessionStore::new());
        {
            let _ticket = store.begin_analysis().unwrap();
            assert!(store.is_analyzing());
        }

        assert!(!store.is_analyzing());
        assert!(store.snapshot().last_error.is_none());
    }

    #[test]
    fn test_reset_invalidates_in_flight_ticket() {
        let store = Arc::new(SessionStore::new());
        store.set_filter(CategoryFilter::Only(Category::Travel));
        let stale = store.begin_analysis().unwrap();

        store.reset();
        assert!(!stale.is_current());

        // 新调用开始后，旧票据结算不影响状态
        let fresh = store.begin_analysis().unwrap();
        assert!(!stale.fail("late"));
        assert!(store.snapshot().last_error.is_none());
        assert!(fresh.is_current());
        assert_eq!(store.filter(), CategoryFilter::All);
    }

    #[test]
    fn test_tickets_are_monotonic() {
        let store = Arc::new(SessionStore::new());
        let first = store.begin_analysis().unwrap().id();
        let second = store.begin_analysis().unwrap().id();

        assert!(second > first);
    }
}
