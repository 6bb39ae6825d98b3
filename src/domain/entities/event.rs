//! Domain events raised by moderation commands

use std::time::Duration;

use super::Member;

/// Variant tag used to key subscriptions on the event bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MemberMute,
    MemberUnmute,
    MemberWarnAdd,
    MemberWarnRemove,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::MemberMute,
        EventKind::MemberUnmute,
        EventKind::MemberWarnAdd,
        EventKind::MemberWarnRemove,
    ];
}

/// Fields shared by every moderation action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moderation {
    pub target: Member,
    pub executor: Member,
    pub reason: Option<String>,
}

impl Moderation {
    pub fn new(target: Member, executor: Member, reason: Option<String>) -> Self {
        Self {
            target,
            executor,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    MemberMute {
        moderation: Moderation,
        /// `None` means the mute has no expiry
        duration: Option<Duration>,
    },
    MemberUnmute(Moderation),
    MemberWarnAdd(Moderation),
    MemberWarnRemove(Moderation),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::MemberMute { .. } => EventKind::MemberMute,
            DomainEvent::MemberUnmute(_) => EventKind::MemberUnmute,
            DomainEvent::MemberWarnAdd(_) => EventKind::MemberWarnAdd,
            DomainEvent::MemberWarnRemove(_) => EventKind::MemberWarnRemove,
        }
    }

    pub fn moderation(&self) -> &Moderation {
        match self {
            DomainEvent::MemberMute { moderation, .. }
            | DomainEvent::MemberUnmute(moderation)
            | DomainEvent::MemberWarnAdd(moderation)
            | DomainEvent::MemberWarnRemove(moderation) => moderation,
        }
    }

    pub fn target(&self) -> &Member {
        &self.moderation().target
    }

    pub fn executor(&self) -> &Member {
        &self.moderation().executor
    }

    pub fn reason(&self) -> Option<&str> {
        self.moderation().reason.as_deref()
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            DomainEvent::MemberMute { duration, .. } => *duration,
            _ => None,
        }
    }
}

/// Render a duration as `1d 2h 5m`, dropping zero units
pub fn format_duration(duration: Duration) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

    let mut remaining = duration.as_secs();
    if remaining == 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::new();
    for (size, suffix) in UNITS {
        if remaining >= size {
            parts.push(format!("{}{}", remaining / size, suffix));
            remaining %= size;
        }
    }
    parts.join(" ")
}
