use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{AuditAction, AuditEntry};

/// Read access to the platform's audit log
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Most recent entries of `action` in a guild, newest first, at most `limit`
    async fn query(
        &self,
        guild_id: &str,
        action: AuditAction,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, BotError>;
}
