//! # Input Script Parser
//!
//! Line-based scripted input for deterministic headless runs. Live mode
//! reads the same syntax from stdin.
//!
//! ## Format
//!
//! - Remote buttons: `press red`, `press 7`, `press select`
//! - Pointer on the remote panel: `click 80 107`
//! - Delays: `wait 100ms`, `wait 2s` (virtual time in sim mode)
//! - Host commands: `root <dir>`, `reload`, `state`, `debug`, `quit`
//! - Comments: `# This is a comment`
//!
//! ## Example
//!
//! ```text
//! # Let the startup scene load, then pick item 2
//! wait 500ms
//! press down
//! press 2
//! press select
//! state
//! ```

use crate::commands::{HostCommand, HostCommandError, HostCommandParser};
use input_types::ActionCode;
use std::collections::VecDeque;
use thiserror::Error;

/// Input script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputScriptError {
    #[error("Invalid action name: {0}")]
    InvalidAction(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,

    #[error("Invalid delay format: {0}")]
    InvalidDelay(String),

    #[error(transparent)]
    Command(#[from] HostCommandError),
}

/// A single scripted input action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedInput {
    /// A remote-control button, by action
    Press(ActionCode),
    /// A pointer press on the remote panel
    Click { x: i32, y: i32 },
    /// Let time pass (in milliseconds)
    Wait(u64),
    /// A host command
    Command(HostCommand),
}

/// Input script
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    inputs: VecDeque<ScriptedInput>,
}

impl InputScript {
    /// Creates a new empty input script
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, InputScriptError> {
        let mut inputs = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            if let Some(input) = Self::parse_line(line).map_err(|e| InputScriptError::ParseError {
                line: line_num + 1,
                message: e.to_string(),
            })? {
                inputs.push_back(input);
            }
        }

        if inputs.is_empty() {
            return Err(InputScriptError::EmptyScript);
        }

        Ok(Self { inputs })
    }

    /// Parses one line; blank lines and comments yield `None`
    pub fn parse_line(line: &str) -> Result<Option<ScriptedInput>, InputScriptError> {
        let line = match line.find('#') {
            Some(start) => &line[..start],
            None => line,
        }
        .trim();

        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let input = match word.to_lowercase().as_str() {
            "press" => ScriptedInput::Press(
                ActionCode::from_name(rest)
                    .ok_or_else(|| InputScriptError::InvalidAction(rest.to_string()))?,
            ),
            "click" => Self::parse_click(rest)?,
            "wait" => ScriptedInput::Wait(Self::parse_duration(rest)?),
            _ => ScriptedInput::Command(HostCommandParser::parse(line)?),
        };

        Ok(Some(input))
    }

    fn parse_click(args: &str) -> Result<ScriptedInput, InputScriptError> {
        let invalid = || InputScriptError::InvalidCoordinates(args.to_string());
        let mut parts = args.split_whitespace();
        let x = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
        let y = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(ScriptedInput::Click { x, y })
    }

    /// Parses a duration string (e.g., "100ms", "1s")
    fn parse_duration(s: &str) -> Result<u64, InputScriptError> {
        let s = s.trim().to_lowercase();

        if let Some(ms_str) = s.strip_suffix("ms") {
            ms_str
                .trim()
                .parse::<u64>()
                .map_err(|_| InputScriptError::InvalidDelay(s.to_string()))
        } else if let Some(s_str) = s.strip_suffix('s') {
            s_str
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|secs| secs.checked_mul(1000))
                .ok_or_else(|| InputScriptError::InvalidDelay(s.to_string()))
        } else {
            Err(InputScriptError::InvalidDelay(s.to_string()))
        }
    }

    /// Returns the next input, if any
    pub fn next_input(&mut self) -> Option<ScriptedInput> {
        self.inputs.pop_front()
    }

    /// Returns true if the script has more inputs
    pub fn has_more(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// Returns the number of remaining inputs
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}
