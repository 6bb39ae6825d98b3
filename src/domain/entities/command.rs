use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::Services;
use crate::domain::entities::{ChatMessage, Member};

/// A single command invocation handed to a handler
#[derive(Clone)]
pub struct Invocation {
    pub message: ChatMessage,
    /// Membership of the invoking user, resolved by the dispatcher
    pub member: Member,
    pub args: Vec<String>,
    pub services: Arc<Services>,
}

impl Invocation {
    /// Reply in the channel the command was issued from
    pub async fn reply(&self, text: &str) -> Result<(), CommandError> {
        self.services
            .bot
            .send_message(&self.message.channel_id, text)
            .await
            .map(|_| ())
            .map_err(|e| CommandError::Reply(e.to_string()))
    }
}

/// Executable part of a command
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, invocation: Invocation) -> Result<(), CommandError>;
}

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub usage: Option<String>,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new<H: CommandHandler + 'static>(name: impl Into<String>, handler: H) -> Self {
        Self {
            name: name.into(),
            description: None,
            usage: None,
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn handler(&self) -> Arc<dyn CommandHandler> {
        Arc::clone(&self.handler)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Command registry, built once at startup and read-only afterwards.
///
/// Names match case-insensitively; `list` keeps the registered spelling and
/// registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        let key = command.name.to_lowercase();
        if self.index.contains_key(&key) {
            return Err(CommandError::DuplicateCommand(command.name));
        }

        self.index.insert(key, self.commands.len());
        self.commands.push(Arc::new(command));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Command>> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| Arc::clone(&self.commands[i]))
    }

    pub fn list(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
