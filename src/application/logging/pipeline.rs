//! Log pipeline - correlates events with the audit trail and emits log entries

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::events::EventSubscriber;
use crate::application::messaging::MessageCache;
use crate::domain::entities::{
    format_duration, AuditAction, AuditAttribution, CachedMessage, ChatMessage, DomainEvent,
    GatewayEvent, LogAction, LogEntry, User,
};
use crate::domain::traits::{AuditLog, Bot, Channel};

/// What to log when a ban or unban has no matching audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BanFallback {
    /// Log the member without executor or reason, like an unattributed leave
    #[default]
    Degraded,
    /// Skip the entry entirely
    Drop,
}

/// Log work whose cache lookups already happened on the delivery path
#[derive(Debug)]
pub enum PendingLog {
    Nothing,
    /// Snapshot of the deleted message, `None` when it was not cached
    Deleted(Option<CachedMessage>),
    Updated {
        message: ChatMessage,
        /// Snapshot the edit replaced, `None` when it was not cached
        previous: Option<CachedMessage>,
    },
    Joined(User),
    Removed {
        guild_id: String,
        user: User,
    },
    BanChanged {
        guild_id: String,
        user: User,
        action: AuditAction,
    },
}

pub struct LogPipeline {
    cache: Arc<MessageCache>,
    bot: Arc<dyn Bot>,
    audit: Arc<dyn AuditLog>,
    log_channel_id: String,
    ban_fallback: BanFallback,
}

impl LogPipeline {
    pub fn new(
        cache: Arc<MessageCache>,
        bot: Arc<dyn Bot>,
        audit: Arc<dyn AuditLog>,
        log_channel_id: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            bot,
            audit,
            log_channel_id: log_channel_id.into(),
            ban_fallback: BanFallback::default(),
        }
    }

    pub fn with_ban_fallback(mut self, fallback: BanFallback) -> Self {
        self.ban_fallback = fallback;
        self
    }

    pub fn cache(&self) -> &MessageCache {
        &self.cache
    }

    /// Route a raw gateway event. Returns the entry that was emitted, if any.
    pub async fn handle(&self, event: GatewayEvent) -> Option<LogEntry> {
        let pending = self.prepare(event);
        self.complete(pending).await
    }

    /// Cache work for `event`, done on the delivery path in arrival order.
    /// Nothing here waits on the platform.
    pub fn prepare(&self, event: GatewayEvent) -> PendingLog {
        match event {
            GatewayEvent::MessageReceived { message } => {
                self.on_message_received(&message);
                PendingLog::Nothing
            }
            GatewayEvent::MessageUpdated { message } => {
                let previous = self.cache.swap(CachedMessage::from(&message));
                PendingLog::Updated { message, previous }
            }
            GatewayEvent::MessageDeleted { message_id, .. } => {
                let cached = self.cache.find_by_id(&message_id);
                if cached.is_none() {
                    tracing::debug!("Deleted message {} is not cached, skipping", message_id);
                }
                PendingLog::Deleted(cached)
            }
            GatewayEvent::MemberJoined { user, .. } => PendingLog::Joined(user),
            GatewayEvent::MemberRemoved { guild_id, user } => PendingLog::Removed { guild_id, user },
            GatewayEvent::Banned { guild_id, user } => PendingLog::BanChanged {
                guild_id,
                user,
                action: AuditAction::Ban,
            },
            GatewayEvent::Unbanned { guild_id, user } => PendingLog::BanChanged {
                guild_id,
                user,
                action: AuditAction::Unban,
            },
        }
    }

    /// Resolve the sink, correlate and emit the entry for prepared work
    pub async fn complete(&self, pending: PendingLog) -> Option<LogEntry> {
        match pending {
            PendingLog::Nothing => None,
            PendingLog::Deleted(cached) => self.log_deleted(cached?).await,
            PendingLog::Updated { message, previous } => self.log_updated(&message, previous?).await,
            PendingLog::Joined(user) => self.on_member_joined(&user).await,
            PendingLog::Removed { guild_id, user } => self.on_member_removed(&guild_id, &user).await,
            PendingLog::BanChanged {
                guild_id,
                user,
                action,
            } => self.on_ban_change(&guild_id, &user, action).await,
        }
    }

    /// Remember a message so later edits and deletes can be reconstructed.
    /// Bot messages and messages without a guild member are not kept.
    pub fn on_message_received(&self, message: &ChatMessage) -> bool {
        if message.author.is_bot || message.member.is_none() {
            return false;
        }
        self.cache.store(CachedMessage::from(message));
        true
    }

    pub async fn on_message_deleted(&self, message_id: &str) -> Option<LogEntry> {
        let cached = self.cache.find_by_id(message_id)?;
        self.log_deleted(cached).await
    }

    pub async fn on_message_updated(&self, message: &ChatMessage) -> Option<LogEntry> {
        let previous = self.cache.swap(CachedMessage::from(message))?;
        self.log_updated(message, previous).await
    }

    async fn log_deleted(&self, cached: CachedMessage) -> Option<LogEntry> {
        let channel = self.resolve_sink().await?;
        let entry = LogEntry::new(LogAction::MessageDelete)
            .field("Member", cached.author.to_string())
            .field("Message", cached.content);
        self.emit(&channel, entry).await
    }

    async fn log_updated(&self, message: &ChatMessage, previous: CachedMessage) -> Option<LogEntry> {
        let channel = self.resolve_sink().await?;
        let entry = LogEntry::new(LogAction::MessageEdit)
            .field("Member", message.author.to_string())
            .field("Old message", previous.content)
            .field("New message", message.content.clone());
        self.emit(&channel, entry).await
    }

    pub async fn on_member_joined(&self, user: &User) -> Option<LogEntry> {
        let channel = self.resolve_sink().await?;
        let entry = LogEntry::new(LogAction::MemberJoin).field("Member", user.to_string());
        self.emit(&channel, entry).await
    }

    /// A removal is a kick when the newest kick entry targets this user,
    /// otherwise a plain leave. The audit log is asked exactly once.
    pub async fn on_member_removed(&self, guild_id: &str, user: &User) -> Option<LogEntry> {
        let channel = self.resolve_sink().await?;

        let entry = match self.attribute(guild_id, user, AuditAction::Kick).await {
            Some(attribution) => LogEntry::new(LogAction::MemberKick)
                .field("Member", user.to_string())
                .field("Executor", attribution.executor.to_string())
                .optional_field("Reason", attribution.reason.as_deref()),
            None => LogEntry::new(LogAction::MemberLeave).field("Member", user.to_string()),
        };
        self.emit(&channel, entry).await
    }

    pub async fn on_ban_change(
        &self,
        guild_id: &str,
        user: &User,
        action: AuditAction,
    ) -> Option<LogEntry> {
        let channel = self.resolve_sink().await?;
        let log_action = match action {
            AuditAction::Unban => LogAction::MemberUnban,
            _ => LogAction::MemberBan,
        };

        let entry = match self.attribute(guild_id, user, action).await {
            Some(attribution) => {
                let entry = LogEntry::new(log_action)
                    .field("Member", user.to_string())
                    .field("Executor", attribution.executor.to_string());
                if action == AuditAction::Ban {
                    entry.optional_field("Reason", attribution.reason.as_deref())
                } else {
                    entry
                }
            }
            None if self.ban_fallback == BanFallback::Drop => {
                tracing::debug!("No {} audit entry for {}, dropping", action, user);
                return None;
            }
            None => LogEntry::new(log_action).field("Member", user.to_string()),
        };
        self.emit(&channel, entry).await
    }

    pub async fn on_domain_event(&self, event: &DomainEvent) -> Option<LogEntry> {
        let channel = self.resolve_sink().await?;

        let base = |action: LogAction| {
            LogEntry::new(action)
                .field("Member", event.target().to_string())
                .field("Executor", event.executor().to_string())
        };

        let entry = match event {
            DomainEvent::MemberMute { .. } => base(LogAction::MemberMute)
                .optional_field("Reason", event.reason())
                .field(
                    "Duration",
                    event
                        .duration()
                        .map(format_duration)
                        .unwrap_or_else(|| "Permanent".to_string()),
                ),
            DomainEvent::MemberUnmute(_) => base(LogAction::MemberUnmute),
            DomainEvent::MemberWarnAdd(_) => {
                base(LogAction::MemberWarnAdd).optional_field("Reason", event.reason())
            }
            DomainEvent::MemberWarnRemove(_) => base(LogAction::MemberWarnRemove),
        };
        self.emit(&channel, entry).await
    }

    /// Single bounded audit query; failures count as a miss
    async fn attribute(
        &self,
        guild_id: &str,
        user: &User,
        action: AuditAction,
    ) -> Option<AuditAttribution> {
        match self.audit.query(guild_id, action, 1).await {
            Ok(entries) => AuditAttribution::correlate(&entries, &user.id),
            Err(e) => {
                tracing::warn!("Audit log query for {} failed: {}", action, e);
                None
            }
        }
    }

    async fn resolve_sink(&self) -> Option<Channel> {
        let channel = self.bot.resolve_channel(&self.log_channel_id).await;
        if channel.is_none() {
            tracing::debug!("Log channel {} is not available, skipping", self.log_channel_id);
        }
        channel
    }

    async fn emit(&self, channel: &Channel, entry: LogEntry) -> Option<LogEntry> {
        if let Err(e) = self.bot.send_log(channel, &entry).await {
            tracing::warn!("Failed to send '{}' log entry: {}", entry.action.title(), e);
        }
        Some(entry)
    }
}

#[async_trait]
impl EventSubscriber for LogPipeline {
    fn name(&self) -> &str {
        "log-pipeline"
    }

    async fn on_event(&self, event: &DomainEvent) -> Result<(), BotError> {
        self.on_domain_event(event).await;
        Ok(())
    }
}
