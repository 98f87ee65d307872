//! REPL command parsing for the demo binary.

use crate::chat::model::Rating;
use crate::pipeline::types::UserRole;

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Plain text sent to the assistant.
    Submit { text: String },
    Open,
    Close,
    Minimize,
    Toggle,
    Voice,
    Attach { file_name: String, size_bytes: u64 },
    Action { key: String },
    Menu,
    Role { role: UserRole },
    Rate { index: usize, rating: Rating },
    /// Inject an assistant-originated message (simulates a shell event).
    Push { text: String },
    State,
    Help,
    Quit,
    /// A recognised command with bad arguments.
    Invalid { reason: String },
}

/// Parses REPL input into commands.
pub struct CliParser;

impl CliParser {
    pub fn parse(line: &str) -> CliCommand {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "/open" => CliCommand::Open,
            "/close" => CliCommand::Close,
            "/min" | "/minimize" => CliCommand::Minimize,
            "/toggle" => CliCommand::Toggle,
            "/voice" | "/mic" => CliCommand::Voice,
            "/menu" | "/actions" => CliCommand::Menu,
            "/state" => CliCommand::State,
            "/help" | "/?" => CliCommand::Help,
            "/quit" | "/exit" => CliCommand::Quit,
            _ => parse_with_args(trimmed, &lower),
        }
    }
}

fn parse_with_args(trimmed: &str, lower: &str) -> CliCommand {
    parse_attach(trimmed, lower)
        .or_else(|| parse_action(trimmed, lower))
        .or_else(|| parse_role(lower))
        .or_else(|| parse_rate(lower))
        .or_else(|| parse_push(trimmed, lower))
        .unwrap_or_else(|| CliCommand::Submit {
            text: trimmed.to_string(),
        })
}

/// Splits `/cmd rest` into `rest` if `lower` starts with `/cmd`.
fn args<'a>(trimmed: &'a str, lower: &str, command: &str) -> Option<&'a str> {
    if lower == command {
        return Some("");
    }
    let prefix = format!("{command} ");
    if lower.starts_with(&prefix) {
        Some(trimmed.get(prefix.len()..).unwrap_or("").trim())
    } else {
        None
    }
}

/// `/attach <file> [bytes]`
fn parse_attach(trimmed: &str, lower: &str) -> Option<CliCommand> {
    let rest = args(trimmed, lower, "/attach")?;
    let mut parts = rest.split_whitespace();
    let Some(file_name) = parts.next() else {
        return Some(CliCommand::Invalid {
            reason: "usage: /attach <file> [bytes]".into(),
        });
    };
    let size_bytes = match parts.next() {
        None => 0,
        Some(raw) => match raw.parse() {
            Ok(size) => size,
            Err(_) => {
                return Some(CliCommand::Invalid {
                    reason: format!("invalid size: {raw}"),
                });
            }
        },
    };
    Some(CliCommand::Attach {
        file_name: file_name.to_string(),
        size_bytes,
    })
}

/// `/action <key>`
fn parse_action(trimmed: &str, lower: &str) -> Option<CliCommand> {
    let rest = args(trimmed, lower, "/action")?;
    if rest.is_empty() {
        return Some(CliCommand::Invalid {
            reason: "usage: /action <key>".into(),
        });
    }
    Some(CliCommand::Action {
        key: rest.to_string(),
    })
}

/// `/role <jobseeker|recruiter>`
fn parse_role(lower: &str) -> Option<CliCommand> {
    let rest = args(lower, lower, "/role")?;
    Some(match rest.parse::<UserRole>() {
        Ok(role) => CliCommand::Role { role },
        Err(reason) => CliCommand::Invalid { reason },
    })
}

/// `/rate <index> <up|down>`
fn parse_rate(lower: &str) -> Option<CliCommand> {
    let rest = args(lower, lower, "/rate")?;
    let mut parts = rest.split_whitespace();
    let index = parts.next().and_then(|raw| raw.parse::<usize>().ok());
    let rating = parts.next().and_then(|raw| raw.parse::<Rating>().ok());
    Some(match (index, rating) {
        (Some(index), Some(rating)) => CliCommand::Rate { index, rating },
        _ => CliCommand::Invalid {
            reason: "usage: /rate <index> <up|down>".into(),
        },
    })
}

/// `/push <text>`
fn parse_push(trimmed: &str, lower: &str) -> Option<CliCommand> {
    let rest = args(trimmed, lower, "/push")?;
    if rest.is_empty() {
        return Some(CliCommand::Invalid {
            reason: "usage: /push <text>".into(),
        });
    }
    Some(CliCommand::Push {
        text: rest.to_string(),
    })
}
