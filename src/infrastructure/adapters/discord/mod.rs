//! Discord adapter - REST side of the platform (sends, channel lookup, audit log)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::{AuditAction, AuditEntry, LogEntry, User};
use crate::domain::traits::{AuditLog, Bot, BotInfo, Channel};

/// Discord REST API base URL
const API_BASE: &str = "https://discord.com/api/v10";

/// Audit-log listing as returned by `GET /guilds/{id}/audit-logs`
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogResponse {
    pub audit_log_entries: Vec<RawAuditEntry>,
    #[serde(default)]
    pub users: Vec<RawUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAuditEntry {
    pub action_type: u8,
    pub target_id: Option<String>,
    pub user_id: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

impl AuditLogResponse {
    /// Entries of `action`, with executors resolved from the bundled user list
    pub fn into_entries(self, action: AuditAction) -> Vec<AuditEntry> {
        let users = self.users;
        self.audit_log_entries
            .into_iter()
            .filter(|raw| raw.action_type == action.code())
            .filter_map(|raw| {
                let target_id = raw.target_id?;
                let executor_id = raw.user_id?;
                let executor = users
                    .iter()
                    .find(|u| u.id == executor_id)
                    .map(|u| User {
                        id: u.id.clone(),
                        name: u.username.clone(),
                        is_bot: u.bot,
                    })
                    .unwrap_or_else(|| User::new(executor_id.clone(), executor_id));
                Some(AuditEntry {
                    action,
                    target_id,
                    executor,
                    reason: raw.reason,
                })
            })
            .collect()
    }
}

/// Discord bot adapter
pub struct DiscordAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "xorbot".to_string(),
            },
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", API_BASE, path)
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Fetch bot info from the Discord API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct CurrentUser {
            id: String,
            username: String,
        }

        let response = self
            .client
            .get(self.api_url("/users/@me"))
            .header("Authorization", self.auth())
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Discord API error: {}", response.status())));
        }

        let data: CurrentUser = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: data.id,
            name: data.username,
        };
        Ok(())
    }

    async fn create_message<T: Serialize + ?Sized>(
        &self,
        channel_id: &str,
        body: &T,
    ) -> Result<String, BotError> {
        #[derive(Deserialize)]
        struct Created {
            id: String,
        }

        let response = self
            .client
            .post(self.api_url(&format!("/channels/{}/messages", channel_id)))
            .header("Authorization", self.auth())
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("Discord API error {}: {}", status, error)));
        }

        let created: Created = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;
        Ok(created.id)
    }
}

#[async_trait]
impl Bot for DiscordAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Discord bot as {} ({})", self.info.name, self.info.id);
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", channel_id, text);
        self.create_message(channel_id, &serde_json::json!({ "content": text }))
            .await
    }

    async fn resolve_channel(&self, channel_id: &str) -> Option<Channel> {
        #[derive(Deserialize)]
        struct RawChannel {
            id: String,
            #[serde(default)]
            name: Option<String>,
        }

        let response = match self
            .client
            .get(self.api_url(&format!("/channels/{}", channel_id)))
            .header("Authorization", self.auth())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Could not resolve channel {}: {}", channel_id, e);
                return None;
            }
        };

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => return None,
            status => {
                tracing::warn!("Could not resolve channel {}: {}", channel_id, status);
                return None;
            }
        }

        let raw: RawChannel = response.json().await.ok()?;
        Some(Channel {
            name: raw.name.unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
        })
    }

    async fn send_log(&self, channel: &Channel, entry: &LogEntry) -> Result<String, BotError> {
        self.create_message(&channel.id, &serde_json::json!({ "embeds": [entry.to_embed()] }))
            .await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[async_trait]
impl AuditLog for DiscordAdapter {
    async fn query(
        &self,
        guild_id: &str,
        action: AuditAction,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, BotError> {
        let response = self
            .client
            .get(self.api_url(&format!("/guilds/{}/audit-logs", guild_id)))
            .header("Authorization", self.auth())
            .query(&[
                ("action_type", action.code().to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Discord API error: {}", response.status())));
        }

        let data: AuditLogResponse = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.into_entries(action))
    }
}
