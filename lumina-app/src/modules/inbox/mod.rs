// Inbox Module - 消息分析模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含实体、值对象、领域服务和领域事件
// - ports: 端口层，定义与外部世界的抽象接口
// - infrastructure: 基础设施层，实现端口的具体适配器
// - application: 应用层，实现 CQRS 命令和查询处理器

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    AnalysisClient, AnalysisError, AnalysisStatus, ApplicationError, CommandHandler,
    GetStatsHandler, GetStatsQuery, ListMessagesHandler, ListMessagesQuery, ListMessagesResponse,
    QueryHandler, ResetSessionCommand, ResetSessionHandler, ResetSessionResponse,
    SeedMessagesCommand, SeedMessagesHandler, SessionSnapshot, SessionStore, SetFilterCommand,
    SetFilterHandler, SetFilterResponse, SubmitMessageCommand, SubmitMessageHandler,
    SubmitMessageResponse, ANALYSIS_FAILED_MESSAGE, EMPTY_STATE_MESSAGE,
};

pub use domain::{
    demo_messages, AnalysisResponse, AnalyzedMessage, Category, CategoryFilter, CategoryStat,
    Entity, InboxDomainEvent, MessageId, SessionStats, ValidationMode,
};

pub use infrastructure::{create_adapter, InMemoryMessageRepository, MockLLMAdapter};

pub use ports::{
    LLMError, LLMPort, LLMProviderConfig, MessageRepository, ProviderType, RepositoryError,
};

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::infrastructure::EventBus;

/// Inbox 模块容器
///
/// 管理模块内的依赖注入，并在状态变化后发布事件
pub struct InboxModule {
    // Repositories
    message_repository: Arc<dyn MessageRepository>,
    // State
    session: Arc<SessionStore>,
    client: Arc<AnalysisClient>,
    event_bus: Arc<EventBus>,
    // Handlers
    submit_message_handler: SubmitMessageHandler,
    set_filter_handler: SetFilterHandler,
    reset_session_handler: ResetSessionHandler,
    seed_messages_handler: SeedMessagesHandler,
    list_messages_handler: ListMessagesHandler,
    get_stats_handler: GetStatsHandler,
}

impl InboxModule {
    /// 创建新的 InboxModule 实例（内存存储）
    pub fn new(client: AnalysisClient) -> Self {
        Self::with_repository(
            Arc::new(InMemoryMessageRepository::new()),
            client,
            Arc::new(EventBus::new()),
        )
    }

    /// 使用自定义仓储和事件总线创建 InboxModule
    pub fn with_repository(
        message_repository: Arc<dyn MessageRepository>,
        client: AnalysisClient,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let session = Arc::new(SessionStore::new());
        let client = Arc::new(client);

        let submit_message_handler =
            SubmitMessageHandler::new(message_repository.clone(), session.clone(), client.clone());
        let set_filter_handler = SetFilterHandler::new(session.clone());
        let reset_session_handler =
            ResetSessionHandler::new(message_repository.clone(), session.clone());
        let seed_messages_handler = SeedMessagesHandler::new(message_repository.clone());
        let list_messages_handler =
            ListMessagesHandler::new(message_repository.clone(), session.clone());
        let get_stats_handler = GetStatsHandler::new(message_repository.clone());

        Self {
            message_repository,
            session,
            client,
            event_bus,
            submit_message_handler,
            set_filter_handler,
            reset_session_handler,
            seed_messages_handler,
            list_messages_handler,
            get_stats_handler,
        }
    }

    // Command handlers

    /// 提交一条消息进行分析
    pub async fn submit(&self, text: impl Into<String>) -> Result<AnalyzedMessage, ApplicationError> {
        let result = self
            .submit_message_handler
            .handle(SubmitMessageCommand::new(text))
            .await;

        match &result {
            Ok(response) => self
                .event_bus
                .publish(InboxDomainEvent::message_analyzed(response.message.clone())),
            Err(ApplicationError::AnalysisFailed { user_message, .. }) => self
                .event_bus
                .publish(InboxDomainEvent::analysis_failed(user_message.clone())),
            Err(_) => {}
        }

        result.map(|response| response.message)
    }

    /// 设置类别过滤器
    pub async fn set_filter(
        &self,
        filter: impl Into<CategoryFilter>,
    ) -> Result<SetFilterResponse, ApplicationError> {
        let response = self
            .set_filter_handler
            .handle(SetFilterCommand::new(filter))
            .await?;
        self.event_bus
            .publish(InboxDomainEvent::filter_changed(response.filter));
        Ok(response)
    }

    /// 重置会话
    pub async fn reset(&self) -> Result<ResetSessionResponse, ApplicationError> {
        let response = self
            .reset_session_handler
            .handle(ResetSessionCommand)
            .await?;
        self.event_bus
            .publish(InboxDomainEvent::session_reset(response.removed_messages));
        Ok(response)
    }

    /// 预置演示消息
    pub async fn seed_demo(&self) -> Result<usize, ApplicationError> {
        self.seed_messages_handler
            .handle(SeedMessagesCommand::new(demo_messages()))
            .await
    }

    /// 更新草稿
    pub fn set_draft(&self, draft: impl Into<String>) {
        self.session.set_draft(draft);
    }

    // Query handlers

    /// 按当前过滤器列出消息
    pub async fn filtered_messages(&self) -> Result<ListMessagesResponse, ApplicationError> {
        self.list_messages(ListMessagesQuery::current()).await
    }

    pub async fn list_messages(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        self.list_messages_handler.handle(query).await
    }

    /// 会话统计
    pub async fn stats(&self) -> Result<SessionStats, ApplicationError> {
        self.get_stats_handler.handle(GetStatsQuery).await
    }

    /// 会话状态快照
    pub fn session(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<InboxDomainEvent> {
        self.event_bus.subscribe()
    }

    // Accessors

    /// 获取消息仓储
    pub fn message_repository(&self) -> &Arc<dyn MessageRepository> {
        &self.message_repository
    }

    /// 获取分析客户端
    pub fn analysis_client(&self) -> &Arc<AnalysisClient> {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Notify;

    const DELIVERY_REPLY: &str = r##"{"category":"Delivery","entities":[{"label":"Order ID","value":"#34567"}],"summary":"Package arriving Oct 12"}"##;

    fn module(mock: MockLLMAdapter) -> InboxModule {
        InboxModule::new(AnalysisClient::new(
            Arc::new(mock),
            "gemini-3-flash-preview",
        ))
    }

    async fn wait_until_analyzing(module: &InboxModule) {
        while !module.session().is_analyzing() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_scenario_delivery_message() {
        let module = module(MockLLMAdapter::new().with_content(DELIVERY_REPLY));

        module
            .submit("Your Amazon order #34567 will be delivered on 12 Oct at 5 PM.")
            .await
            .unwrap();

        let listed = module.filtered_messages().await.unwrap();
        assert_eq!(listed.messages.len(), 1);
        let message = &listed.messages[0];
        assert_eq!(message.category(), Category::Delivery);
        assert_eq!(message.entities(), &[Entity::new("Order ID", "#34567")]);
        assert_eq!(message.summary(), "Package arriving Oct 12");
        assert!(!module.session().is_analyzing());
    }

    #[tokio::test]
    async fn test_scenario_unknown_category() {
        let module = module(
            MockLLMAdapter::new()
                .with_content(r#"{"category":"Unknown","entities":[],"summary":"x"}"#),
        );

        let message = module.submit("hello").await.unwrap();

        assert_eq!(message.category(), Category::General);
    }

    #[tokio::test]
    async fn test_scenario_network_failure() {
        let module = module(
            MockLLMAdapter::new().with_error(LLMError::NetworkError("offline".to_string())),
        );
        module.seed_demo().await.unwrap();
        let before = module.filtered_messages().await.unwrap().messages;

        let result = module.submit("Flight to NYC at 3PM").await;

        assert!(matches!(result, Err(ApplicationError::AnalysisFailed { .. })));
        assert_eq!(module.filtered_messages().await.unwrap().messages, before);
        let session = module.session();
        assert_eq!(session.last_error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(!session.is_analyzing());
    }

    #[tokio::test]
    async fn test_scenario_stats_split() {
        let module = module(
            MockLLMAdapter::new()
                .with_content(r#"{"category":"Banking","entities":[],"summary":"b"}"#)
                .with_content(r#"{"category":"Delivery","entities":[],"summary":"d"}"#)
                .with_content(r#"{"category":"Delivery","entities":[],"summary":"d"}"#)
                .with_content(r#"{"category":"Delivery","entities":[],"summary":"d"}"#),
        );
        for text in ["one", "two", "three", "four"] {
            module.submit(text).await.unwrap();
        }

        let stats = module.stats().await.unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.categories_shown(), 2);
        assert_eq!(stats.categories[0].category, Category::Delivery);
        assert_eq!(stats.categories[0].percentage, 75);
        assert_eq!(stats.categories[1].category, Category::Banking);
        assert_eq!(stats.categories[1].percentage, 25);
    }

    #[tokio::test]
    async fn test_submit_adds_exactly_one_message_or_sets_error() {
        let module = module(
            MockLLMAdapter::new()
                .with_content(DELIVERY_REPLY)
                .with_content("{broken")
                .with_error(LLMError::RateLimitError {
                    retry_after_secs: 1,
                })
                .with_content(r#"{"category":"Travel","entities":[],"summary":"Trip"}"#),
        );

        for text in ["a", "b", "c", "d"] {
            let before = module.filtered_messages().await.unwrap().messages.len();
            let result = module.submit(text).await;
            let after = module.filtered_messages().await.unwrap().messages.len();

            match result {
                Ok(message) => {
                    assert_eq!(after, before + 1);
                    let newest = &module.filtered_messages().await.unwrap().messages[0];
                    assert_eq!(newest.id(), message.id());
                    assert!(module.session().last_error.is_none());
                }
                Err(_) => {
                    assert_eq!(after, before);
                    assert!(module.session().last_error.is_some());
                }
            }
        }
        assert_eq!(module.stats().await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_newest_message_first() {
        let module = module(MockLLMAdapter::new());

        module.submit("first").await.unwrap();
        module.submit("second").await.unwrap();

        let messages = module.filtered_messages().await.unwrap().messages;
        assert_eq!(messages[0].original_text(), "second");
        assert_eq!(messages[1].original_text(), "first");
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_analyzing() {
        let gate = Arc::new(Notify::new());
        let module = Arc::new(module(
            MockLLMAdapter::new()
                .with_gate(gate.clone())
                .with_content(DELIVERY_REPLY),
        ));

        let pending = {
            let module = module.clone();
            tokio::spawn(async move { module.submit("first").await })
        };
        wait_until_analyzing(&module).await;

        let second = module.submit("second").await;
        assert!(matches!(second, Err(ApplicationError::Busy)));
        assert!(module.session().is_analyzing());

        gate.notify_one();
        pending.await.unwrap().unwrap();

        assert_eq!(module.stats().await.unwrap().total, 1);
        assert!(!module.session().is_analyzing());
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_result() {
        let gate = Arc::new(Notify::new());
        let module = Arc::new(module(
            MockLLMAdapter::new()
                .with_gate(gate.clone())
                .with_content(DELIVERY_REPLY),
        ));
        module.seed_demo().await.unwrap();

        let pending = {
            let module = module.clone();
            tokio::spawn(async move { module.submit("late").await })
        };
        wait_until_analyzing(&module).await;

        let reset = module.reset().await.unwrap();
        assert_eq!(reset.removed_messages, 2);

        gate.notify_one();
        let result = pending.await.unwrap();

        assert!(matches!(result, Err(ApplicationError::Superseded)));
        assert_eq!(module.stats().await.unwrap().total, 0);
        assert!(!module.session().is_analyzing());
    }

    #[tokio::test]
    async fn test_cancelled_submit_clears_analyzing() {
        let gate = Arc::new(Notify::new());
        let module = Arc::new(module(MockLLMAdapter::new().with_gate(gate)));

        let pending = {
            let module = module.clone();
            tokio::spawn(async move { module.submit("never finishes").await })
        };
        wait_until_analyzing(&module).await;

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        assert!(!module.session().is_analyzing());
        assert!(module.session().last_error.is_none());
    }

    #[tokio::test]
    async fn test_filter_and_reset_flow() {
        let module = module(MockLLMAdapter::new());
        module.seed_demo().await.unwrap();

        module.set_filter(Category::BillPayment).await.unwrap();
        let listed = module.filtered_messages().await.unwrap();
        assert_eq!(listed.header(), "Bill Payment Messages (1)");

        module.set_filter(Category::Travel).await.unwrap();
        let listed = module.filtered_messages().await.unwrap();
        assert_eq!(listed.empty_state(), Some(EMPTY_STATE_MESSAGE));

        module.set_draft("unsent");
        module.reset().await.unwrap();

        let session = module.session();
        assert_eq!(session.filter, CategoryFilter::All);
        assert_eq!(session.draft, "");
        assert!(module.filtered_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let module = module(
            MockLLMAdapter::new()
                .with_content(DELIVERY_REPLY)
                .with_error(LLMError::NetworkError("offline".to_string())),
        );
        let mut events = module.subscribe();

        module.submit("a").await.unwrap();
        let _ = module.submit("b").await;
        module.set_filter(CategoryFilter::All).await.unwrap();
        module.reset().await.unwrap();

        let mut types = Vec::new();
        while let Ok(event) = events.try_recv() {
            types.push(event.event_type());
        }
        assert_eq!(
            types,
            vec![
                "message.analyzed",
                "analysis.failed",
                "filter.changed",
                "session.reset"
            ]
        );
    }
}
