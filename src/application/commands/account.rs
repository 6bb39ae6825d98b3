//! Account commands backed by the user store

use async_trait::async_trait;

use super::args::parse_user_id;
use crate::application::errors::{CommandError, UserCreationError};
use crate::domain::entities::{CommandHandler, Invocation};
use crate::domain::traits::UserStore;
use std::sync::Arc;

const STORAGE_UNAVAILABLE: &str = "Account storage is unavailable.";

fn store(invocation: &Invocation) -> Option<Arc<dyn UserStore>> {
    invocation.services.users.clone()
}

fn discord_id(id: &str) -> Result<i64, CommandError> {
    id.parse()
        .map_err(|_| CommandError::InvalidArgs(format!("'{}' is not a valid user id", id)))
}

/// Creates an account with a zero balance for the invoking user
pub struct RegisterCommand;

#[async_trait]
impl CommandHandler for RegisterCommand {
    async fn execute(&self, invocation: Invocation) -> Result<(), CommandError> {
        let Some(users) = store(&invocation) else {
            return invocation.reply(STORAGE_UNAVAILABLE).await;
        };
        let author = &invocation.message.author;
        let id = discord_id(&author.id)?;

        match users.save(id, &author.name, 0) {
            Ok(true) => {
                invocation
                    .reply(&format!("Registered {} with a balance of 0.", author.name))
                    .await
            }
            Ok(false) => Err(CommandError::ExecutionFailed(format!("no row inserted for {}", id))),
            Err(UserCreationError::AlreadyExists { .. }) => {
                invocation.reply("You are already registered.").await
            }
            Err(e) => {
                invocation.reply("Could not register you right now.").await?;
                Err(CommandError::ExecutionFailed(e.to_string()))
            }
        }
    }
}

/// Shows the balance of the invoking user or of a mentioned user
pub struct BalanceCommand;

#[async_trait]
impl CommandHandler for BalanceCommand {
    async fn execute(&self, invocation: Invocation) -> Result<(), CommandError> {
        let Some(users) = store(&invocation) else {
            return invocation.reply(STORAGE_UNAVAILABLE).await;
        };

        let id = match invocation.args.first() {
            Some(token) => parse_user_id(token)
                .ok_or_else(|| CommandError::InvalidArgs(format!("'{}' is not a member", token)))?,
            None => invocation.message.author.id.clone(),
        };

        let reply = match users.find_by_discord_id(discord_id(&id)?) {
            Some(account) => format!("{} has a balance of {}.", account.username, account.balance),
            None => format!("<@{}> is not registered.", id),
        };
        invocation.reply(&reply).await
    }
}

/// Deletes the invoking user's account
pub struct UnregisterCommand;

#[async_trait]
impl CommandHandler for UnregisterCommand {
    async fn execute(&self, invocation: Invocation) -> Result<(), CommandError> {
        let Some(users) = store(&invocation) else {
            return invocation.reply(STORAGE_UNAVAILABLE).await;
        };
        let id = discord_id(&invocation.message.author.id)?;

        if users.delete_by_discord_id(id) {
            invocation.reply("Your account has been removed.").await
        } else {
            invocation.reply("You are not registered.").await
        }
    }
}
