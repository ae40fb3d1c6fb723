//! # Host Control Commands
//!
//! Minimal command surface for controlling the host during a run.
//!
//! ## Command Set
//!
//! - `root <dir>` - Point the carousel at a new content root and reboot the engine
//! - `reload` - Reboot the engine against the current root
//! - `state` - Log the engine's diagnostic state
//! - `debug` - Toggle per-frame diagnostics
//! - `quit` - Exit the host
//!
//! ## Philosophy
//!
//! - No scripting, no shell features
//! - Commands act on the host; only a reboot reaches the engine

use std::path::PathBuf;
use thiserror::Error;

/// Host command error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostCommandError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Host commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Change the content root, then reboot
    Root { path: PathBuf },

    /// Reboot with the same root
    Reload,

    /// Print the engine's diagnostic state
    State,

    /// Toggle frame diagnostics
    Debug,

    /// Quit the host
    Quit,
}

/// Host command parser
pub struct HostCommandParser;

impl HostCommandParser {
    /// Parses a command string
    pub fn parse(input: &str) -> Result<HostCommand, HostCommandError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(HostCommandError::InvalidCommand(
                "Empty command".to_string(),
            ));
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };
        let cmd = cmd.to_lowercase();

        match cmd.as_str() {
            "root" => Self::parse_root(rest),
            "reload" | "reboot" => Ok(HostCommand::Reload),
            "state" => Ok(HostCommand::State),
            "debug" => Ok(HostCommand::Debug),
            "quit" | "exit" => Ok(HostCommand::Quit),
            _ => Err(HostCommandError::UnknownCommand(cmd)),
        }
    }

    /// Parses the "root" command; the rest of the line is the path
    fn parse_root(rest: &str) -> Result<HostCommand, HostCommandError> {
        if rest.is_empty() {
            return Err(HostCommandError::MissingArgument(
                "content root directory".to_string(),
            ));
        }
        Ok(HostCommand::Root {
            path: PathBuf::from(rest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        let cmd = HostCommandParser::parse("root /srv/carousel").unwrap();
        assert_eq!(
            cmd,
            HostCommand::Root {
                path: PathBuf::from("/srv/carousel")
            }
        );
    }

    #[test]
    fn test_parse_root_with_spaces() {
        let cmd = HostCommandParser::parse("root  /media/My Carousel ").unwrap();
        assert_eq!(
            cmd,
            HostCommand::Root {
                path: PathBuf::from("/media/My Carousel")
            }
        );
    }

    #[test]
    fn test_parse_root_missing_path() {
        let result = HostCommandParser::parse("root");
        assert!(matches!(result, Err(HostCommandError::MissingArgument(_))));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(HostCommandParser::parse("reload").unwrap(), HostCommand::Reload);
        assert_eq!(HostCommandParser::parse("reboot").unwrap(), HostCommand::Reload);
        assert_eq!(HostCommandParser::parse("state").unwrap(), HostCommand::State);
        assert_eq!(HostCommandParser::parse("debug").unwrap(), HostCommand::Debug);
        assert_eq!(HostCommandParser::parse("quit").unwrap(), HostCommand::Quit);
        assert_eq!(HostCommandParser::parse("exit").unwrap(), HostCommand::Quit);
    }

    #[test]
    fn test_parse_empty_command() {
        let result = HostCommandParser::parse("   ");
        assert!(matches!(result, Err(HostCommandError::InvalidCommand(_))));
    }

    #[test]
    fn test_parse_unknown_command() {
        let result = HostCommandParser::parse("tune 3");
        assert_eq!(
            result,
            Err(HostCommandError::UnknownCommand("tune".to_string()))
        );
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(HostCommandParser::parse("RELOAD").unwrap(), HostCommand::Reload);
        assert_eq!(HostCommandParser::parse("\tQuit\t").unwrap(), HostCommand::Quit);
    }
}
