use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::{CommandHandler, Invocation, NONE_VALUE};

/// Lists every registered command
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(&self, invocation: Invocation) -> Result<(), CommandError> {
        let prefix = invocation.services.prefix;

        let mut help = "Available commands:".to_string();
        for cmd in invocation.services.registry.list() {
            help.push_str(&format!(
                "\n{}{} - {}",
                prefix,
                cmd.name,
                cmd.description.as_deref().unwrap_or(NONE_VALUE)
            ));
            if let Some(usage) = &cmd.usage {
                help.push_str(&format!(" (usage: {})", usage));
            }
        }

        invocation.reply(&help).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::EventBus;
    use crate::domain::entities::{Command, CommandRegistry, User};
    use crate::testing::{invocation, member_message, services, RecordingBot};

    #[tokio::test]
    async fn test_lists_commands_in_registration_order() {
        let bot = RecordingBot::new();
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("help", HelpCommand).with_description("List all available commands."))
            .unwrap();
        registry
            .register(Command::new("Warn", HelpCommand).with_usage("!warn <member>"))
            .unwrap();
        let services = services(bot.clone(), registry, EventBus::new(), None);

        let message = member_message("general", User::new("1", "alice"), "!help");
        HelpCommand
            .execute(invocation(services, message, &[]))
            .await
            .unwrap();

        let messages = bot.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "general");
        assert_eq!(
            messages[0].1,
            "Available commands:\n!help - List all available commands.\n!Warn - <None> (usage: !warn <member>)"
        );
    }
}
