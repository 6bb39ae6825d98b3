use crate::application::errors::UserCreationError;
use crate::domain::entities::Account;

/// Persistence for per-user accounts.
///
/// Only `save` reports failures; the other operations log storage errors and
/// degrade to an empty or negative result.
pub trait UserStore: Send + Sync {
    fn save(&self, discord_id: i64, username: &str, balance: i64) -> Result<bool, UserCreationError>;
    fn list(&self) -> Vec<Account>;
    fn delete_by_discord_id(&self, discord_id: i64) -> bool;
    fn find_by_discord_id(&self, discord_id: i64) -> Option<Account>;
    fn exists_by_discord_id(&self, discord_id: i64) -> bool;
}
