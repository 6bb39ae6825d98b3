//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{AuditAction, AuditEntry, ChatMessage, GatewayEvent, LogEntry, User};
use crate::domain::traits::{AuditLog, Bot, BotInfo, Channel};

/// Guild the console user belongs to
pub const CONSOLE_GUILD: &str = "console";

/// Console bot adapter for local development.
///
/// Every channel resolves, and the audit log is always empty, so removals
/// are logged as plain leaves.
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "xorbot".to_string(),
            },
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT #{}] {}", channel_id, text);
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn resolve_channel(&self, channel_id: &str) -> Option<Channel> {
        Some(Channel {
            id: channel_id.to_string(),
            name: channel_id.to_string(),
        })
    }

    async fn send_log(&self, channel: &Channel, entry: &LogEntry) -> Result<String, BotError> {
        println!("[LOG #{}] {}", channel.name, entry.render_text());
        Ok(uuid::Uuid::new_v4().to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[async_trait]
impl AuditLog for ConsoleAdapter {
    async fn query(
        &self,
        _guild_id: &str,
        _action: AuditAction,
        _limit: u8,
    ) -> Result<Vec<AuditEntry>, BotError> {
        Ok(Vec::new())
    }
}

/// Turns input lines into gateway events.
///
/// Lines starting with `{` are parsed as JSON events from a gateway bridge.
/// Other lines become messages from a local console member when one is
/// configured, and are ignored otherwise.
pub struct LineFeed {
    console: Option<(User, String)>,
}

impl LineFeed {
    /// JSON events only
    pub fn json() -> Self {
        Self { console: None }
    }

    /// JSON events plus plain text typed by `user` into `channel_id`
    pub fn interactive(user: User, channel_id: impl Into<String>) -> Self {
        Self {
            console: Some((user, channel_id.into())),
        }
    }

    pub fn parse_line(&self, line: &str) -> Option<GatewayEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if line.starts_with('{') {
            return match serde_json::from_str(line) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("Ignoring malformed event: {}", e);
                    None
                }
            };
        }

        let (user, channel_id) = self.console.as_ref()?;
        let message = ChatMessage::new(channel_id.clone(), user.clone(), line).in_guild(CONSOLE_GUILD);
        Some(GatewayEvent::MessageReceived { message })
    }

    /// Forward parsed events until the input ends or the receiver is dropped
    pub async fn run<R>(self, reader: R, tx: mpsc::Sender<GatewayEvent>) -> Result<(), BotError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(format!("Failed to read input: {}", e)))?
        {
            if let Some(event) = self.parse_line(&line) {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
        Ok(())
    }
}
