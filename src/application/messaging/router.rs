//! Event router - the gateway delivery path

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::dispatcher::{CommandDispatcher, Dispatch};
use crate::application::logging::LogPipeline;
use crate::domain::entities::{GatewayEvent, LogEntry};

/// Result of routing one gateway event
#[derive(Debug)]
pub enum Routed {
    /// A chat message: cached, then handed to the dispatcher
    Message(Dispatch),
    /// A log-worthy event handled on its own task
    Log(JoinHandle<Option<LogEntry>>),
}

/// Fans gateway events out to the log pipeline and the command dispatcher.
///
/// Cache reads and writes and the unknown-command notice happen inline, in
/// arrival order. Command handlers and log emissions run on spawned tasks,
/// so their relative order is not fixed.
pub struct EventRouter {
    dispatcher: CommandDispatcher,
    pipeline: Arc<LogPipeline>,
}

impl EventRouter {
    pub fn new(dispatcher: CommandDispatcher, pipeline: Arc<LogPipeline>) -> Self {
        Self {
            dispatcher,
            pipeline,
        }
    }

    pub async fn route(&self, event: GatewayEvent) -> Routed {
        tracing::debug!("Routing {}", event.name());

        match event {
            GatewayEvent::MessageReceived { message } => {
                // Cached regardless of which deployment handles commands
                self.pipeline.on_message_received(&message);
                Routed::Message(self.dispatcher.dispatch(&message).await)
            }
            other => {
                // Snapshots are taken here so later messages cannot evict them
                let pending = self.pipeline.prepare(other);
                let pipeline = Arc::clone(&self.pipeline);
                Routed::Log(tokio::spawn(async move { pipeline.complete(pending).await }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::EventBus;
    use crate::application::messaging::filters::{AuthorFilter, Deployment, EnvironmentFilter, FilterChain};
    use crate::application::messaging::MessageCache;
    use crate::domain::entities::{CommandRegistry, LogAction, User};
    use crate::testing::{member_message, services, RecordingBot, ScriptedAuditLog, LOG_CHANNEL};
    use std::time::Duration;

    const TEST_CHANNEL: &str = "872881918616686696";

    fn router(deployment: Deployment) -> (EventRouter, Arc<RecordingBot>) {
        router_with(deployment, RecordingBot::new())
    }

    fn router_with(deployment: Deployment, bot: Arc<RecordingBot>) -> (EventRouter, Arc<RecordingBot>) {
        let pipeline = Arc::new(LogPipeline::new(
            Arc::new(MessageCache::new(5)),
            bot.clone(),
            ScriptedAuditLog::new(),
            LOG_CHANNEL,
        ));
        let filters = FilterChain::new()
            .add(EnvironmentFilter::new(deployment, TEST_CHANNEL))
            .add(AuthorFilter);
        let services = services(bot.clone(), CommandRegistry::new(), EventBus::new(), None);

        (EventRouter::new(CommandDispatcher::new(filters, services), pipeline), bot)
    }

    #[tokio::test]
    async fn test_messages_are_cached_for_both_deployments() {
        let (router, bot) = router(Deployment::Test);
        let message = member_message("general", User::new("1", "alice"), "hello").with_id("m1");

        let routed = router
            .route(GatewayEvent::MessageReceived { message })
            .await;
        assert!(matches!(routed, Routed::Message(Dispatch::Filtered(_))));

        let Routed::Log(handle) = router
            .route(GatewayEvent::MessageDeleted {
                guild_id: "g".into(),
                channel_id: "general".into(),
                message_id: "m1".into(),
            })
            .await
        else {
            panic!("expected log task");
        };

        let entry = handle.await.unwrap().unwrap();
        assert_eq!(entry.action, LogAction::MessageDelete);
        assert_eq!(entry.get("Message"), Some("hello"));
        assert_eq!(bot.logs().len(), 1);
    }

    #[tokio::test]
    async fn test_membership_events_are_logged() {
        let (router, bot) = router(Deployment::Production);

        let Routed::Log(handle) = router
            .route(GatewayEvent::MemberJoined {
                guild_id: "g".into(),
                user: User::new("3", "carol"),
            })
            .await
        else {
            panic!("expected log task");
        };

        assert_eq!(handle.await.unwrap().unwrap().action, LogAction::MemberJoin);
        assert_eq!(bot.logs().len(), 1);
    }

    fn received(id: &str, content: &str) -> GatewayEvent {
        GatewayEvent::MessageReceived {
            message: member_message("general", User::new("1", "alice"), content).with_id(id),
        }
    }

    fn log_handle(routed: Routed) -> JoinHandle<Option<LogEntry>> {
        match routed {
            Routed::Log(handle) => handle,
            other => panic!("expected log task, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_survives_eviction_while_sink_resolves() {
        let (router, bot) = router_with(
            Deployment::Production,
            RecordingBot::with_resolve_delay(Duration::from_millis(50)),
        );
        router.route(received("m1", "original")).await;

        let handle = log_handle(
            router
                .route(GatewayEvent::MessageDeleted {
                    guild_id: "g".into(),
                    channel_id: "general".into(),
                    message_id: "m1".into(),
                })
                .await,
        );
        for i in 0..5 {
            router.route(received(&format!("later-{}", i), "filler")).await;
        }

        let entry = handle.await.unwrap().unwrap();
        assert_eq!(entry.get("Message"), Some("original"));
        assert_eq!(bot.logs().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_consecutive_edits_report_in_arrival_order() {
        let (router, bot) = router_with(
            Deployment::Production,
            RecordingBot::with_resolve_delay(Duration::from_millis(10)),
        );
        router.route(received("m1", "v1")).await;

        let mut handles = Vec::new();
        for version in ["v2", "v3", "v4"] {
            let edit = member_message("general", User::new("1", "alice"), version).with_id("m1");
            handles.push(log_handle(router.route(GatewayEvent::MessageUpdated { message: edit }).await));
        }

        let mut old_contents = Vec::new();
        for handle in handles {
            let entry = handle.await.unwrap().unwrap();
            old_contents.push(entry.get("Old message").map(str::to_string));
        }
        assert_eq!(
            old_contents,
            vec![Some("v1".to_string()), Some("v2".to_string()), Some("v3".to_string())]
        );

        let delete = log_handle(
            router
                .route(GatewayEvent::MessageDeleted {
                    guild_id: "g".into(),
                    channel_id: "general".into(),
                    message_id: "m1".into(),
                })
                .await,
        );
        assert_eq!(delete.await.unwrap().unwrap().get("Message"), Some("v4"));
        assert_eq!(bot.logs().len(), 4);
    }
}
