//! Moderation commands - raise domain events for the audit log

use async_trait::async_trait;

use super::args::{join_reason, parse_duration, resolve_target};
use crate::application::errors::CommandError;
use crate::domain::entities::{
    format_duration, CommandHandler, DomainEvent, EventKind, Invocation, Moderation,
};

/// Handler behind `mute`, `unmute`, `warn` and `unwarn`
pub struct ModerationCommand {
    kind: EventKind,
    usage: String,
}

impl ModerationCommand {
    pub fn new(kind: EventKind, usage: impl Into<String>) -> Self {
        Self {
            kind,
            usage: usage.into(),
        }
    }

    fn build_event(&self, invocation: &Invocation) -> Result<DomainEvent, CommandError> {
        let token = invocation
            .args
            .first()
            .ok_or_else(|| CommandError::InvalidArgs("missing member".to_string()))?;
        let target = resolve_target(invocation, token)
            .ok_or_else(|| CommandError::InvalidArgs(format!("'{}' is not a member", token)))?;
        let executor = invocation.member.clone();
        let rest = &invocation.args[1..];

        let event = match self.kind {
            EventKind::MemberMute => {
                let duration = rest.first().and_then(|t| parse_duration(t));
                let reason_tokens = if duration.is_some() { &rest[1..] } else { rest };
                DomainEvent::MemberMute {
                    moderation: Moderation::new(target, executor, join_reason(reason_tokens)),
                    duration,
                }
            }
            EventKind::MemberUnmute => {
                DomainEvent::MemberUnmute(Moderation::new(target, executor, join_reason(rest)))
            }
            EventKind::MemberWarnAdd => {
                DomainEvent::MemberWarnAdd(Moderation::new(target, executor, join_reason(rest)))
            }
            EventKind::MemberWarnRemove => {
                DomainEvent::MemberWarnRemove(Moderation::new(target, executor, join_reason(rest)))
            }
        };
        Ok(event)
    }
}

fn confirmation(event: &DomainEvent) -> String {
    let target = event.target();
    match event {
        DomainEvent::MemberMute { duration, .. } => match duration {
            Some(d) => format!("Muted {} for {}.", target, format_duration(*d)),
            None => format!("Muted {}.", target),
        },
        DomainEvent::MemberUnmute(_) => format!("Unmuted {}.", target),
        DomainEvent::MemberWarnAdd(_) => format!("Warned {}.", target),
        DomainEvent::MemberWarnRemove(_) => format!("Removed a warning from {}.", target),
    }
}

#[async_trait]
impl CommandHandler for ModerationCommand {
    async fn execute(&self, invocation: Invocation) -> Result<(), CommandError> {
        let event = match self.build_event(&invocation) {
            Ok(event) => event,
            Err(e) => {
                invocation.reply(&format!("Usage: {}", self.usage)).await?;
                return Err(e);
            }
        };

        let reply = confirmation(&event);
        let delivered = invocation.services.bus.publish(event).await;
        tracing::debug!("{:?} delivered to {} subscribers", self.kind, delivered);

        invocation.reply(&reply).await
    }
}
