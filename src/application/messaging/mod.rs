//! Message handling - inbound event routing, filtering, parsing and dispatch

pub mod cache;
pub mod dispatcher;
pub mod filters;
pub mod parser;
pub mod router;

pub use cache::MessageCache;
pub use dispatcher::{CommandDispatcher, Dispatch, UNKNOWN_COMMAND_REPLY};
pub use filters::{AuthorFilter, Deployment, EnvironmentFilter, FilterChain, MessageFilter};
pub use parser::CommandParser;
pub use router::{EventRouter, Routed};
