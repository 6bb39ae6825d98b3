use super::{Member, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message delivered by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub channel_id: String,
    pub author: User,
    /// Present only for messages sent inside a guild by a resolvable member
    #[serde(default)]
    pub member: Option<Member>,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<User>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            author,
            member: None,
            content: content.into(),
            mentions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach guild membership for the author
    pub fn in_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.member = Some(Member::new(guild_id, self.author.clone()));
        self
    }

    pub fn with_mentions(mut self, mentions: Vec<User>) -> Self {
        self.mentions = mentions;
        self
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.member.as_ref().map(|m| m.guild_id.as_str())
    }
}

/// Immutable snapshot of a message taken when it was received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedMessage {
    pub id: String,
    pub author: User,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatMessage> for CachedMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            author: message.author.clone(),
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}
