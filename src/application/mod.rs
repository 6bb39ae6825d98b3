//! Application layer - Use cases and orchestration
//!
//! This layer contains:
//! - Commands: built-in command handlers
//! - Errors: Domain-specific errors
//! - Events: In-process domain event bus
//! - Logging: Audit log pipeline
//! - Messaging: Event routing, filtering, parsing, dispatching, message cache
//! - Services: Shared handles for command handlers

pub mod commands;
pub mod errors;
pub mod events;
pub mod logging;
pub mod messaging;
pub mod services;
