//! Domain traits - Abstractions for infrastructure implementations

pub mod audit;
pub mod bot;
pub mod store;

pub use audit::AuditLog;
pub use bot::{Bot, BotInfo, Channel};
pub use store::UserStore;
