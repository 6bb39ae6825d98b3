//! Shared handles passed to every command invocation

use std::sync::Arc;

use crate::application::events::EventBus;
use crate::domain::entities::CommandRegistry;
use crate::domain::traits::{Bot, UserStore};

pub struct Services {
    pub bot: Arc<dyn Bot>,
    pub bus: Arc<EventBus>,
    pub registry: Arc<CommandRegistry>,
    /// `None` when the account database could not be opened
    pub users: Option<Arc<dyn UserStore>>,
    pub prefix: char,
}
