//! Message filters applied before command parsing

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::ChatMessage;

/// Which logical deployment this process runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Deployment {
    #[default]
    Production,
    Test,
}

/// Why a message was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Message belongs to the other deployment
    WrongEnvironment,
    /// Author is an automated account
    BotAuthor,
    /// Message was not sent by a guild member
    NoMembership,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::WrongEnvironment => write!(f, "channel belongs to the other deployment"),
            FilterError::BotAuthor => write!(f, "author is a bot"),
            FilterError::NoMembership => write!(f, "author has no guild membership"),
        }
    }
}

impl std::error::Error for FilterError {}

/// Filter trait - checks that can drop a message before it is dispatched
pub trait MessageFilter: Send + Sync {
    fn check(&self, message: &ChatMessage) -> Result<(), FilterError>;
}

/// Routes traffic so the test and production deployments never see the
/// same messages: the test deployment only handles the test channel and
/// production handles everything else.
pub struct EnvironmentFilter {
    deployment: Deployment,
    test_channel_id: String,
}

impl EnvironmentFilter {
    pub fn new(deployment: Deployment, test_channel_id: impl Into<String>) -> Self {
        Self {
            deployment,
            test_channel_id: test_channel_id.into(),
        }
    }
}

impl MessageFilter for EnvironmentFilter {
    fn check(&self, message: &ChatMessage) -> Result<(), FilterError> {
        let in_test_channel = message.channel_id.eq_ignore_ascii_case(&self.test_channel_id);
        let accepted = match self.deployment {
            Deployment::Test => in_test_channel,
            Deployment::Production => !in_test_channel,
        };

        if accepted {
            Ok(())
        } else {
            Err(FilterError::WrongEnvironment)
        }
    }
}

/// Drops bot authors and messages without a guild membership
pub struct AuthorFilter;

impl MessageFilter for AuthorFilter {
    fn check(&self, message: &ChatMessage) -> Result<(), FilterError> {
        if message.author.is_bot {
            return Err(FilterError::BotAuthor);
        }
        if message.member.is_none() {
            return Err(FilterError::NoMembership);
        }
        Ok(())
    }
}

/// Ordered filter chain; the first rejection wins
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn MessageFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: MessageFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn check(&self, message: &ChatMessage) -> Result<(), FilterError> {
        self.filters.iter().try_for_each(|f| f.check(message))
    }
}
