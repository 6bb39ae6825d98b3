//! Command parser - Turns raw message content into a command name and arguments

/// A parsed `<prefix><name> <args...>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

pub struct CommandParser {
    prefix: char,
}

impl CommandParser {
    pub fn new(prefix: char) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Parse message content.
    ///
    /// Returns `None` when the content does not start with the prefix or the
    /// command name is empty. Tokens are separated by single spaces; empty
    /// tokens produced by repeated spaces are skipped.
    pub fn parse(&self, content: &str) -> Option<ParsedCommand> {
        let rest = content.strip_prefix(self.prefix)?;

        let mut tokens = rest.split(' ');
        let name = tokens.next().unwrap_or("");
        if name.trim().is_empty() {
            return None;
        }

        let args = tokens
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect();

        Some(ParsedCommand {
            name: name.to_string(),
            args,
        })
    }
}
