//! SQLite-backed account storage

use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::{StorageError, UserCreationError};
use crate::domain::entities::Account;
use crate::domain::traits::UserStore;

pub struct UserRepository {
    conn: Mutex<Connection>,
}

impl UserRepository {
    /// Open (or create) the database at `path`; `:memory:` gives a private in-memory database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.init_tables()?;
        Ok(repo)
    }

    fn init_tables(&self) -> Result<(), StorageError> {
        self.conn()?.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                discord_id INTEGER UNIQUE NOT NULL,
                username TEXT NOT NULL,
                balance INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn try_exists(&self, discord_id: i64) -> Result<bool, StorageError> {
        let found = self
            .conn()?
            .query_row(
                "SELECT id FROM users WHERE discord_id = ?1",
                [discord_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn try_insert(&self, discord_id: i64, username: &str, balance: i64) -> Result<bool, StorageError> {
        let rows = self.conn()?.execute(
            "INSERT INTO users (discord_id, username, balance) VALUES (?1, ?2, ?3)",
            rusqlite::params![discord_id, username, balance],
        )?;
        Ok(rows == 1)
    }

    fn try_list(&self) -> Result<Vec<Account>, StorageError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, discord_id, username, balance FROM users ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Account {
                id: row.get(0)?,
                discord_id: row.get(1)?,
                username: row.get(2)?,
                balance: row.get(3)?,
            })
        })?;

        let mut accounts = Vec::new();
        for account in rows {
            accounts.push(account?);
        }
        Ok(accounts)
    }

    fn try_find(&self, discord_id: i64) -> Result<Option<Account>, StorageError> {
        let account = self
            .conn()?
            .query_row(
                "SELECT id, discord_id, username, balance FROM users WHERE discord_id = ?1",
                [discord_id],
                |row| {
                    Ok(Account {
                        id: row.get(0)?,
                        discord_id: row.get(1)?,
                        username: row.get(2)?,
                        balance: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(account)
    }

    fn try_delete(&self, discord_id: i64) -> Result<bool, StorageError> {
        let rows = self
            .conn()?
            .execute("DELETE FROM users WHERE discord_id = ?1", [discord_id])?;
        Ok(rows == 1)
    }
}

impl UserStore for UserRepository {
    fn save(&self, discord_id: i64, username: &str, balance: i64) -> Result<bool, UserCreationError> {
        let storage_error = |source: StorageError| {
            tracing::error!("Could not insert user {} into database: {}", discord_id, source);
            UserCreationError::Storage {
                discord_id,
                username: username.to_string(),
                source,
            }
        };

        if self.try_exists(discord_id).map_err(storage_error)? {
            return Err(UserCreationError::AlreadyExists {
                discord_id,
                username: username.to_string(),
            });
        }

        self.try_insert(discord_id, username, balance).map_err(storage_error)
    }

    fn list(&self) -> Vec<Account> {
        self.try_list().unwrap_or_else(|e| {
            tracing::error!("Could not select users from database: {}", e);
            Vec::new()
        })
    }

    fn delete_by_discord_id(&self, discord_id: i64) -> bool {
        self.try_delete(discord_id).unwrap_or_else(|e| {
            tracing::error!("Could not delete user {} from database: {}", discord_id, e);
            false
        })
    }

    fn find_by_discord_id(&self, discord_id: i64) -> Option<Account> {
        self.try_find(discord_id).unwrap_or_else(|e| {
            tracing::error!("Could not select user {} from database: {}", discord_id, e);
            None
        })
    }

    fn exists_by_discord_id(&self, discord_id: i64) -> bool {
        self.try_exists(discord_id).unwrap_or_else(|e| {
            tracing::error!("Could not select user {} from database: {}", discord_id, e);
            false
        })
    }
}
