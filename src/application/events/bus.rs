//! Event bus - synchronous fan-out of domain events to subscribers

use async_trait::async_trait;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::{DomainEvent, EventKind};

/// Receives domain events from the bus
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Name used in logs when delivery fails
    fn name(&self) -> &str;

    async fn on_event(&self, event: &DomainEvent) -> Result<(), BotError>;
}

/// Handler lists keyed by event kind.
///
/// Subscriptions are made at startup through `&mut self`; the bus is then
/// shared behind an `Arc` and only published to.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<Arc<dyn EventSubscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kinds: &[EventKind], subscriber: Arc<dyn EventSubscriber>) {
        for kind in kinds {
            self.subscribers
                .entry(*kind)
                .or_default()
                .push(Arc::clone(&subscriber));
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Deliver `event` to every subscriber of its kind, in subscription order.
    ///
    /// A subscriber that fails or panics is logged and skipped. Returns the
    /// number of successful deliveries.
    pub async fn publish(&self, event: DomainEvent) -> usize {
        let kind = event.kind();
        let Some(subscribers) = self.subscribers.get(&kind) else {
            tracing::debug!("No subscribers for {:?}", kind);
            return 0;
        };

        let mut delivered = 0;
        for subscriber in subscribers {
            match AssertUnwindSafe(subscriber.on_event(&event)).catch_unwind().await {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::error!("Subscriber '{}' failed on {:?}: {}", subscriber.name(), kind, e);
                }
                Err(_) => {
                    tracing::error!("Subscriber '{}' panicked on {:?}", subscriber.name(), kind);
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Member, Moderation, User};
    use std::sync::Mutex;

    struct Recorder {
        name: String,
        seen: Mutex<Vec<EventKind>>,
        fail: bool,
    }

    impl Recorder {
        fn new(name: &str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn seen(&self) -> Vec<EventKind> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventSubscriber for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_event(&self, event: &DomainEvent) -> Result<(), BotError> {
            self.seen.lock().unwrap().push(event.kind());
            if self.fail {
                return Err(BotError::Internal("boom".to_string()));
            }
            Ok(())
        }
    }

    fn warn_event() -> DomainEvent {
        let target = Member::new("g1", User::new("1", "alice"));
        let executor = Member::new("g1", User::new("2", "mod"));
        DomainEvent::MemberWarnAdd(Moderation::new(target, executor, Some("spam".into())))
    }

    #[tokio::test]
    async fn test_publish_reaches_only_matching_kinds() {
        let warns = Recorder::new("warns", false);
        let mutes = Recorder::new("mutes", false);

        let mut bus = EventBus::new();
        bus.subscribe(&[EventKind::MemberWarnAdd, EventKind::MemberWarnRemove], warns.clone());
        bus.subscribe(&[EventKind::MemberMute], mutes.clone());

        assert_eq!(bus.publish(warn_event()).await, 1);
        assert_eq!(warns.seen(), vec![EventKind::MemberWarnAdd]);
        assert!(mutes.seen().is_empty());
    }

    #[tokio::test]
    async fn test_failing_subscriber_does_not_stop_delivery() {
        let first = Recorder::new("first", true);
        let second = Recorder::new("second", false);

        let mut bus = EventBus::new();
        bus.subscribe(&EventKind::ALL, first.clone());
        bus.subscribe(&EventKind::ALL, second.clone());

        assert_eq!(bus.publish(warn_event()).await, 1);
        assert_eq!(first.seen().len(), 1);
        assert_eq!(second.seen().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(EventKind::MemberMute), 0);
        assert_eq!(bus.publish(warn_event()).await, 0);
    }

    struct Panicking;

    #[async_trait]
    impl EventSubscriber for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn on_event(&self, _event: &DomainEvent) -> Result<(), BotError> {
            panic!("subscriber bug");
        }
    }

    #[tokio::test]
    async fn test_panicking_subscriber_does_not_stop_delivery() {
        let after = Recorder::new("after", false);

        let mut bus = EventBus::new();
        bus.subscribe(&EventKind::ALL, Arc::new(Panicking));
        bus.subscribe(&EventKind::ALL, after.clone());

        assert_eq!(bus.publish(warn_event()).await, 1);
        assert_eq!(after.seen(), vec![EventKind::MemberWarnAdd]);
    }

    struct Ordered {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl EventSubscriber for Ordered {
        fn name(&self) -> &str {
            self.name
        }

        async fn on_event(&self, _event: &DomainEvent) -> Result<(), BotError> {
            self.log.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delivery_follows_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for name in ["third", "first", "second"] {
            bus.subscribe(
                &[EventKind::MemberWarnAdd],
                Arc::new(Ordered {
                    name,
                    log: Arc::clone(&log),
                }),
            );
        }

        assert_eq!(bus.publish(warn_event()).await, 3);
        assert_eq!(bus.publish(warn_event()).await, 3);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["third", "first", "second", "third", "first", "second"]
        );
    }
}
