//! Audit logging - turns platform and domain events into log entries

pub mod pipeline;

pub use pipeline::{BanFallback, LogPipeline, PendingLog};
