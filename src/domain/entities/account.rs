use serde::{Deserialize, Serialize};

/// Persisted per-user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub discord_id: i64,
    pub username: String,
    pub balance: i64,
}
