use tokio::sync::broadcast;

use crate::modules::inbox::InboxDomainEvent;

/// 事件总线
///
/// 广播会话变更，展示层订阅后重新渲染
pub struct EventBus {
    sender: broadcast::Sender<InboxDomainEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    pub fn publish(&self, event: InboxDomainEvent) {
        tracing::debug!("[EventBus] Publishing event: {}", event.event_type());
        // 没有订阅者时发送失败，忽略即可
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InboxDomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();

        bus.publish(InboxDomainEvent::session_reset(3));

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type(), "session.reset");
    }

    #[test]
    fn test_publish_without_subscribers() {
        EventBus::new().publish(InboxDomainEvent::analysis_failed("x"));
    }
}
