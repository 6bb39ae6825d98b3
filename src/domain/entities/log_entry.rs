//! Formatted audit-log entries

use chrono::{DateTime, Utc};
use serde_json::json;

/// Placeholder for optional values that are absent
pub const NONE_VALUE: &str = "<None>";

/// Embed field values are capped by the platform
const MAX_FIELD_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    MemberJoin,
    MemberLeave,
    MemberKick,
    MemberBan,
    MemberUnban,
    MemberMute,
    MemberUnmute,
    MemberWarnAdd,
    MemberWarnRemove,
    MessageEdit,
    MessageDelete,
}

impl LogAction {
    pub fn title(&self) -> &'static str {
        match self {
            LogAction::MemberJoin => "Member joined",
            LogAction::MemberLeave => "Member left",
            LogAction::MemberKick => "Member kicked",
            LogAction::MemberBan => "Member banned",
            LogAction::MemberUnban => "Member unbanned",
            LogAction::MemberMute => "Member muted",
            LogAction::MemberUnmute => "Member unmuted",
            LogAction::MemberWarnAdd => "Warning added",
            LogAction::MemberWarnRemove => "Warning removed",
            LogAction::MessageEdit => "Message edited",
            LogAction::MessageDelete => "Message deleted",
        }
    }

    /// Embed sidebar colour
    pub fn color(&self) -> u32 {
        match self {
            LogAction::MemberJoin | LogAction::MemberUnban | LogAction::MemberUnmute => 0x2ECC71,
            LogAction::MemberLeave | LogAction::MessageEdit => 0xF1C40F,
            LogAction::MemberWarnAdd | LogAction::MemberWarnRemove => 0xE67E22,
            LogAction::MemberKick
            | LogAction::MemberBan
            | LogAction::MemberMute
            | LogAction::MessageDelete => 0xE74C3C,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub action: LogAction,
    pub fields: Vec<LogField>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(action: LogAction) -> Self {
        Self {
            action,
            fields: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        self.fields.push(LogField {
            name: name.into(),
            value: if value.is_empty() { NONE_VALUE.to_string() } else { value },
        });
        self
    }

    pub fn optional_field(self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.field(name, value.unwrap_or(NONE_VALUE))
    }

    /// Value of the first field called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Plain-text rendering used by the console sink
    pub fn render_text(&self) -> String {
        let mut out = format!("[{}] {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"), self.action.title());
        for field in &self.fields {
            out.push_str(&format!("\n  {}: {}", field.name, field.value));
        }
        out
    }

    /// Discord embed object
    pub fn to_embed(&self) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = self
            .fields
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "value": truncate(&f.value, MAX_FIELD_LEN),
                    "inline": false,
                })
            })
            .collect();

        json!({
            "title": self.action.title(),
            "color": self.action.color(),
            "fields": fields,
            "timestamp": self.timestamp.to_rfc3339(),
        })
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max - 1).collect();
    out.push('…');
    out
}
