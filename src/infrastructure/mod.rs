//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Database: Account persistence
//! - Adapters: Platform integrations (Console, Discord)

pub mod adapters;
pub mod config;
pub mod database;
