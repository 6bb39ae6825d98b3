use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::LogEntry;

/// Bot trait - abstraction for the chat platform's outbound side
#[async_trait]
pub trait Bot: Send + Sync {
    /// Prepare the adapter before events are routed to it
    async fn start(&self) -> Result<(), BotError>;

    /// Send a text message to a channel, returning the platform message id
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError>;

    /// Resolve a channel by id; `None` when it is gone or not visible to the bot
    async fn resolve_channel(&self, channel_id: &str) -> Option<Channel>;

    /// Send a formatted log entry to a resolved channel
    async fn send_log(&self, channel: &Channel, entry: &LogEntry) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// A resolved text channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
