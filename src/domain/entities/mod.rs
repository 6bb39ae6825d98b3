//! Domain entities - Core business objects

pub mod account;
pub mod audit;
pub mod command;
pub mod event;
pub mod gateway;
pub mod log_entry;
pub mod message;
pub mod user;

pub use account::Account;
pub use audit::{AuditAction, AuditAttribution, AuditEntry};
pub use command::{Command, CommandHandler, CommandRegistry, Invocation};
pub use event::{format_duration, DomainEvent, EventKind, Moderation};
pub use gateway::GatewayEvent;
pub use log_entry::{LogAction, LogEntry, NONE_VALUE};
pub use message::{CachedMessage, ChatMessage};
pub use user::{Member, User};
