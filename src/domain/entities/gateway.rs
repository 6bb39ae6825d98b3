//! Raw platform events as delivered by the gateway feed

use serde::{Deserialize, Serialize};

use super::{ChatMessage, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    MessageReceived {
        message: ChatMessage,
    },
    /// `message` carries the edited content
    MessageUpdated {
        message: ChatMessage,
    },
    MessageDeleted {
        guild_id: String,
        channel_id: String,
        message_id: String,
    },
    MemberJoined {
        guild_id: String,
        user: User,
    },
    MemberRemoved {
        guild_id: String,
        user: User,
    },
    Banned {
        guild_id: String,
        user: User,
    },
    Unbanned {
        guild_id: String,
        user: User,
    },
}

impl GatewayEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GatewayEvent::MessageReceived { .. } => "message_received",
            GatewayEvent::MessageUpdated { .. } => "message_updated",
            GatewayEvent::MessageDeleted { .. } => "message_deleted",
            GatewayEvent::MemberJoined { .. } => "member_joined",
            GatewayEvent::MemberRemoved { .. } => "member_removed",
            GatewayEvent::Banned { .. } => "banned",
            GatewayEvent::Unbanned { .. } => "unbanned",
        }
    }
}
