//! # Input Admission Service
//!
//! This crate implements the admission queue between the remote control and
//! the presentation engine.
//!
//! ## Philosophy
//!
//! - **Gated by the engine**: Only actions the current input register allows are queued
//! - **FIFO**: Accepted actions reach the engine in submission order
//! - **Never blocks**: Submission is a constant-time decision, not a wait
//! - **Host actions bypass**: Debug and reload buttons never enter the queue
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A key mapping layer
//! - The pump (delivery of one action per tick lives in `services_scheduler`)
//! - Owner of the input register (the engine sets it through the host)

use input_types::{
    admits, button_for, hit_test, ActionCode, ButtonAction, GatePolicy, HostAction, InputRegister,
    RemoteButton,
};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

/// Input service error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputServiceError {
    #[error("No remote button at ({x}, {y})")]
    NoButtonAt { x: i32, y: i32 },

    #[error("Action has no remote button: {0}")]
    UnmappedAction(ActionCode),
}

/// Outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Appended to the queue for the engine
    Queued(ActionCode),
    /// Dropped because the input register does not allow it
    Rejected(ActionCode),
    /// Not queued; the host must act on it now
    Host(HostAction),
}

impl Admission {
    /// Returns true if the action was queued for the engine
    pub fn is_queued(&self) -> bool {
        matches!(self, Admission::Queued(_))
    }
}

/// FIFO of engine actions, gated by the input register
#[derive(Debug, Clone, Default)]
pub struct InputAdmissionQueue {
    policy: GatePolicy,
    queue: VecDeque<ActionCode>,
    rejected: u64,
}

impl InputAdmissionQueue {
    /// Creates an empty queue with the given register-5 policy
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            policy,
            queue: VecDeque::new(),
            rejected: 0,
        }
    }

    /// Submits a resolved remote-control button
    pub fn submit(&mut self, button: &RemoteButton, current: InputRegister) -> Admission {
        self.submit_action(button.action, button.required, current)
    }

    /// Submits an action with its required-register tag
    pub fn submit_action(
        &mut self,
        action: ButtonAction,
        required: InputRegister,
        current: InputRegister,
    ) -> Admission {
        match action {
            ButtonAction::Host(host) => Admission::Host(host),
            ButtonAction::Engine(code) => {
                if admits(self.policy, current, required) {
                    self.queue.push_back(code);
                    Admission::Queued(code)
                } else {
                    self.rejected += 1;
                    debug!(action = %code, %current, %required, "input rejected by register");
                    Admission::Rejected(code)
                }
            }
        }
    }

    /// Hit-tests a pointer position on the remote panel and submits the result
    pub fn submit_hit(
        &mut self,
        x: i32,
        y: i32,
        current: InputRegister,
    ) -> Result<Admission, InputServiceError> {
        let button = hit_test(x, y).ok_or(InputServiceError::NoButtonAt { x, y })?;
        Ok(self.submit(button, current))
    }

    /// Submits an engine action using its tag from the remote table
    pub fn submit_code(
        &mut self,
        code: ActionCode,
        current: InputRegister,
    ) -> Result<Admission, InputServiceError> {
        let button = button_for(code).ok_or(InputServiceError::UnmappedAction(code))?;
        Ok(self.submit(button, current))
    }

    /// Removes and returns the oldest queued action
    pub fn dequeue(&mut self) -> Option<ActionCode> {
        self.queue.pop_front()
    }

    /// Drops every queued action
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Returns the number of queued actions
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns how many engine actions were rejected so far
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    /// Returns the register-5 policy in force
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Replaces the register-5 policy
    pub fn set_policy(&mut self, policy: GatePolicy) {
        self.policy = policy;
    }
}
