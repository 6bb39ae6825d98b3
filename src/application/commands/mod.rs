//! Built-in commands

pub mod account;
pub mod args;
pub mod help;
pub mod moderation;

pub use account::{BalanceCommand, RegisterCommand, UnregisterCommand};
pub use help::HelpCommand;
pub use moderation::ModerationCommand;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandRegistry, EventKind};

/// Registry with every built-in command, usage lines rendered with `prefix`
pub fn builtin_registry(prefix: char) -> Result<CommandRegistry, CommandError> {
    let mut registry = CommandRegistry::new();

    registry.register(Command::new("help", HelpCommand).with_description("List all available commands."))?;

    let moderation = [
        ("mute", EventKind::MemberMute, "Mute a member.", "<member> [duration] [reason]"),
        ("unmute", EventKind::MemberUnmute, "Unmute a member.", "<member> [reason]"),
        ("warn", EventKind::MemberWarnAdd, "Warn a member.", "<member> [reason]"),
        ("unwarn", EventKind::MemberWarnRemove, "Remove a warning from a member.", "<member>"),
    ];
    for (name, kind, description, args) in moderation {
        let usage = format!("{}{} {}", prefix, name, args);
        registry.register(
            Command::new(name, ModerationCommand::new(kind, usage.clone()))
                .with_description(description)
                .with_usage(usage),
        )?;
    }

    registry.register(Command::new("register", RegisterCommand).with_description("Create your account."))?;
    registry.register(
        Command::new("balance", BalanceCommand)
            .with_description("Show an account balance.")
            .with_usage(format!("{}balance [member]", prefix)),
    )?;
    registry.register(Command::new("unregister", UnregisterCommand).with_description("Delete your account."))?;

    Ok(registry)
}
