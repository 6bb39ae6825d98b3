//! Argument helpers shared by built-in commands

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::time::Duration;

use crate::domain::entities::{Invocation, Member, User};

static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<@!?(\d+)>$").expect("mention pattern is valid"));

static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([smhdw])$").expect("duration pattern is valid"));

/// User id from a `<@id>`/`<@!id>` mention or a bare numeric id
pub fn parse_user_id(token: &str) -> Option<String> {
    if let Some(caps) = MENTION.captures(token) {
        return Some(caps[1].to_string());
    }
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return Some(token.to_string());
    }
    None
}

/// `10m`, `2h`, `1d`, ...
pub fn parse_duration(token: &str) -> Option<Duration> {
    let caps = DURATION.captures(token)?;
    let amount: u64 = caps[1].parse().ok()?;
    let unit = match &caps[2] {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => 604_800,
    };
    amount.checked_mul(unit).map(Duration::from_secs)
}

/// Resolve a target member in the invoking guild.
///
/// Display data comes from the message's mentions when available; a bare id
/// that was not mentioned is used as its own name.
pub fn resolve_target(invocation: &Invocation, token: &str) -> Option<Member> {
    let id = parse_user_id(token)?;
    let user = invocation
        .message
        .mentions
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .unwrap_or_else(|| User::new(id.clone(), id));
    Some(Member::new(invocation.member.guild_id.clone(), user))
}

/// Remaining tokens joined back into a free-text reason
pub fn join_reason(tokens: &[String]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("<@123>").as_deref(), Some("123"));
        assert_eq!(parse_user_id("<@!123>").as_deref(), Some("123"));
        assert_eq!(parse_user_id("123").as_deref(), Some("123"));
        assert!(parse_user_id("@bob").is_none());
        assert!(parse_user_id("<@abc>").is_none());
        assert!(parse_user_id("").is_none());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("10m"), Some(Duration::from_secs(600)));
        assert_eq!(parse_duration("2h"), Some(Duration::from_secs(7_200)));
        assert_eq!(parse_duration("1d"), Some(Duration::from_secs(86_400)));
        assert_eq!(parse_duration("1w"), Some(Duration::from_secs(604_800)));
        assert!(parse_duration("spam").is_none());
        assert!(parse_duration("10").is_none());
        assert!(parse_duration("99999999999999999999d").is_none());
    }

    #[test]
    fn test_join_reason() {
        assert_eq!(join_reason(&[]), None);
        assert_eq!(
            join_reason(&["being".to_string(), "rude".to_string()]).as_deref(),
            Some("being rude")
        );
    }
}
