//! Platform audit-log entries and their correlation with gateway events

use std::fmt;

use super::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Kick,
    Ban,
    Unban,
}

impl AuditAction {
    /// Discord audit-log action type code
    pub fn code(&self) -> u8 {
        match self {
            AuditAction::Kick => 20,
            AuditAction::Ban => 22,
            AuditAction::Unban => 23,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuditAction::Kick => "kick",
            AuditAction::Ban => "ban",
            AuditAction::Unban => "unban",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub target_id: String,
    pub executor: User,
    pub reason: Option<String>,
}

/// Who performed an action against a user, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditAttribution {
    pub action: AuditAction,
    pub executor: User,
    pub reason: Option<String>,
}

impl AuditAttribution {
    /// First entry of `entries` whose target is `target_id`
    pub fn correlate(entries: &[AuditEntry], target_id: &str) -> Option<Self> {
        entries
            .iter()
            .find(|entry| entry.target_id == target_id)
            .map(|entry| Self {
                action: entry.action,
                executor: entry.executor.clone(),
                reason: entry.reason.clone(),
            })
    }
}
