//! Command dispatcher - Routes chat messages to command handlers

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::filters::{FilterChain, FilterError};
use super::parser::CommandParser;
use crate::application::services::Services;
use crate::domain::entities::{ChatMessage, CommandHandler, Invocation};

/// Reply sent when a prefixed message names no registered command
pub const UNKNOWN_COMMAND_REPLY: &str =
    "Provided command does not exist in the command registry. Check !help for the command list.";

/// What the dispatcher did with a message
#[derive(Debug)]
pub enum Dispatch {
    /// Dropped by a filter
    Filtered(FilterError),
    /// Not a command
    NotCommand,
    /// Unknown command name; the fixed notice was sent
    Unknown(String),
    /// Handler started on its own task. The handle completes once the
    /// handler's outcome has been logged.
    Spawned(JoinHandle<()>),
}

pub struct CommandDispatcher {
    parser: CommandParser,
    filters: FilterChain,
    services: Arc<Services>,
}

impl CommandDispatcher {
    pub fn new(filters: FilterChain, services: Arc<Services>) -> Self {
        Self {
            parser: CommandParser::new(services.prefix),
            filters,
            services,
        }
    }

    /// Handle one inbound message without waiting for the command to finish
    pub async fn dispatch(&self, message: &ChatMessage) -> Dispatch {
        if let Err(reason) = self.filters.check(message) {
            tracing::debug!("Dropping message {}: {}", message.id, reason);
            return Dispatch::Filtered(reason);
        }

        let Some(member) = message.member.clone() else {
            return Dispatch::Filtered(FilterError::NoMembership);
        };

        let Some(parsed) = self.parser.parse(&message.content) else {
            return Dispatch::NotCommand;
        };

        let Some(command) = self.services.registry.lookup(&parsed.name) else {
            tracing::debug!("Unknown command '{}' from {}", parsed.name, message.author);
            if let Err(e) = self
                .services
                .bot
                .send_message(&message.channel_id, UNKNOWN_COMMAND_REPLY)
                .await
            {
                tracing::warn!("Failed to send unknown command notice: {}", e);
            }
            return Dispatch::Unknown(parsed.name);
        };

        tracing::info!("Executing {}{} for {}", self.parser.prefix(), command.name, message.author);

        let invocation = Invocation {
            message: message.clone(),
            member,
            args: parsed.args,
            services: Arc::clone(&self.services),
        };
        Dispatch::Spawned(spawn_supervised(command.name.clone(), command.handler(), invocation))
    }
}

/// Run a handler on its own task and log how it ended, including panics
fn spawn_supervised(
    name: String,
    handler: Arc<dyn CommandHandler>,
    invocation: Invocation,
) -> JoinHandle<()> {
    let task = tokio::spawn(async move { handler.execute(invocation).await });

    tokio::spawn(async move {
        match task.await {
            Ok(Ok(())) => tracing::debug!("Command '{}' completed", name),
            Ok(Err(e)) => tracing::error!("Command '{}' failed: {}", name, e),
            Err(e) if e.is_panic() => tracing::error!("Command '{}' panicked", name),
            Err(e) => tracing::warn!("Command '{}' was cancelled: {}", name, e),
        }
    })
}
