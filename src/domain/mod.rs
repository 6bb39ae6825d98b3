//! Domain layer - Core business objects and platform abstractions
//!
//! This layer contains:
//! - Entities: messages, members, commands, domain and gateway events, log entries
//! - Traits: Abstractions for infrastructure (Bot, AuditLog, UserStore)

pub mod entities;
pub mod traits;
