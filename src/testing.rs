//! Shared fakes for unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::errors::BotError;
use crate::application::events::EventBus;
use crate::application::services::Services;
use crate::domain::entities::{
    AuditAction, AuditEntry, ChatMessage, CommandRegistry, Invocation, LogEntry, Member, User,
};
use crate::domain::traits::{AuditLog, Bot, BotInfo, Channel, UserStore};

pub const GUILD: &str = "guild-1";
pub const LOG_CHANNEL: &str = "log-channel";

/// Bot that records everything it is asked to send
#[derive(Default)]
pub struct RecordingBot {
    messages: Mutex<Vec<(String, String)>>,
    logs: Mutex<Vec<(String, LogEntry)>>,
    missing_channels: Mutex<Vec<String>>,
    resolve_delay: Option<Duration>,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Bot whose channel lookups take `delay`, like a REST round-trip
    pub fn with_resolve_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            resolve_delay: Some(delay),
            ..Self::default()
        })
    }

    /// Make `channel_id` unresolvable
    pub fn remove_channel(&self, channel_id: &str) {
        self.missing_channels.lock().unwrap().push(channel_id.to_string());
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().unwrap().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn log_channels(&self) -> Vec<String> {
        self.logs.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let mut messages = self.messages.lock().unwrap();
        messages.push((channel_id.to_string(), text.to_string()));
        Ok(messages.len().to_string())
    }

    async fn resolve_channel(&self, channel_id: &str) -> Option<Channel> {
        if let Some(delay) = self.resolve_delay {
            tokio::time::sleep(delay).await;
        }
        if self.missing_channels.lock().unwrap().iter().any(|c| c == channel_id) {
            return None;
        }
        Some(Channel {
            id: channel_id.to_string(),
            name: "logs".to_string(),
        })
    }

    async fn send_log(&self, channel: &Channel, entry: &LogEntry) -> Result<String, BotError> {
        let mut logs = self.logs.lock().unwrap();
        logs.push((channel.id.clone(), entry.clone()));
        Ok(logs.len().to_string())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "0".to_string(),
            name: "recording".to_string(),
        }
    }
}

/// Audit log serving a fixed list of entries, newest last
#[derive(Default)]
pub struct ScriptedAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    queries: AtomicUsize,
    fail: bool,
}

impl ScriptedAuditLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn push(&self, action: AuditAction, target_id: &str, executor: User, reason: Option<&str>) {
        self.entries.lock().unwrap().push(AuditEntry {
            action,
            target_id: target_id.to_string(),
            executor,
            reason: reason.map(str::to_string),
        });
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditLog for ScriptedAuditLog {
    async fn query(
        &self,
        _guild_id: &str,
        action: AuditAction,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, BotError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BotError::Network("audit log unavailable".to_string()));
        }

        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.action == action)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// A guild message from a regular member
pub fn member_message(channel_id: &str, author: User, content: &str) -> ChatMessage {
    ChatMessage::new(channel_id, author, content).in_guild(GUILD)
}

pub fn services(
    bot: Arc<dyn Bot>,
    registry: CommandRegistry,
    bus: EventBus,
    users: Option<Arc<dyn UserStore>>,
) -> Arc<Services> {
    Arc::new(Services {
        bot,
        bus: Arc::new(bus),
        registry: Arc::new(registry),
        users,
        prefix: '!',
    })
}

pub fn invocation(services: Arc<Services>, message: ChatMessage, args: &[&str]) -> Invocation {
    let member = message
        .member
        .clone()
        .unwrap_or_else(|| Member::new(GUILD, message.author.clone()));
    Invocation {
        message,
        member,
        args: args.iter().map(|a| a.to_string()).collect(),
        services,
    }
}
