//! # Scheduler Pump
//!
//! A deterministic, cooperative pump that drives the presentation engine.
//!
//! ## Philosophy
//!
//! - **One flow**: Tick, input delivery, and the engine step run back to back, never re-entered
//! - **Temporal suspension**: Between ticks nothing runs; the pump just re-arms a timer
//! - **Engine decides the pace**: Each step returns how long to wait before the next
//! - **Explicit ticks**: The driver calls [`Pump::tick`] when the timer fires
//!
//! ## Tick Order
//!
//! 1. A pending reboot is consumed (exactly once) and the engine re-enters booting
//! 2. At most one queued action is delivered, oldest first
//! 3. The engine runs one step and returns a signed wait in milliseconds
//! 4. The timer is reprogrammed from that wait (see [`WaitDirective`])
//!
//! Submitting an accepted input or requesting a reboot re-arms the timer at
//! [`MIN_WAIT_MS`], overriding a stopped or long wait.
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A thread pool or async executor
//! - A clock (time comes from the [`WakeTimer`])
//! - Owner of the input register (the engine sets it through the host)

use hal::WakeTimer;
use input_types::{ActionCode, ButtonAction, GatePolicy, InputRegister, RemoteButton};
use services_input::{Admission, InputAdmissionQueue};
use tracing::{debug, info, trace};

/// Delay used when ticking resumes after the engine stopped the pump
pub const DEFAULT_WAIT_MS: u32 = 100;

/// Shortest delay the pump ever arms; "as soon as possible"
pub const MIN_WAIT_MS: u32 = 1;

/// How the pump reprograms itself after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitDirective {
    /// Stop ticking until an external event re-arms the pump
    Stop,
    /// Tick again as soon as possible
    Immediate,
    /// Tick again after exactly this many milliseconds
    After(u32),
}

impl WaitDirective {
    /// Classifies a step's return value; total over `i32`
    pub fn from_step(wait_ms: i32) -> Self {
        match wait_ms {
            w if w < 0 => WaitDirective::Stop,
            0 => WaitDirective::Immediate,
            w => WaitDirective::After(w.unsigned_abs()),
        }
    }

    /// Delay to arm, or `None` for a stopped pump
    pub fn delay_ms(self) -> Option<u32> {
        match self {
            WaitDirective::Stop => None,
            WaitDirective::Immediate => Some(MIN_WAIT_MS),
            WaitDirective::After(ms) => Some(ms),
        }
    }
}

/// What the pump drives
///
/// The host implements this by forwarding to the engine with its context
/// attached, so the pump never sees the host's services.
pub trait PumpTarget {
    /// Puts the engine back into its booting state
    fn reboot(&mut self);

    /// Delivers one user action
    fn deliver(&mut self, action: ActionCode);

    /// Runs one engine step; returns the signed wait in milliseconds
    fn run_step(&mut self) -> i32;
}

/// Process-wide pump state; reset, never destroyed, on reboot
#[derive(Debug, Clone)]
pub struct PumpState {
    interval_ms: u32,
    default_wait_ms: u32,
    stopped: bool,
    reboot_requested: bool,
    input: InputAdmissionQueue,
    ticks: u64,
}

impl PumpState {
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            interval_ms: DEFAULT_WAIT_MS,
            default_wait_ms: DEFAULT_WAIT_MS,
            stopped: true,
            reboot_requested: false,
            input: InputAdmissionQueue::new(policy),
            ticks: 0,
        }
    }

    /// Interval the pump is running at, or resumes at when stopped
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn reboot_requested(&self) -> bool {
        self.reboot_requested
    }

    pub fn input(&self) -> &InputAdmissionQueue {
        &self.input
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// The scheduler pump
#[derive(Debug)]
pub struct Pump<T: WakeTimer> {
    state: PumpState,
    timer: T,
}

impl<T: WakeTimer> Pump<T> {
    /// Creates a stopped pump; call [`Pump::start`] to arm the first tick
    pub fn new(timer: T, policy: GatePolicy) -> Self {
        Self {
            state: PumpState::new(policy),
            timer,
        }
    }

    /// Overrides the interval a stopped pump resumes at
    pub fn with_default_wait(mut self, wait_ms: u32) -> Self {
        let wait_ms = wait_ms.max(MIN_WAIT_MS);
        self.state.default_wait_ms = wait_ms;
        self.state.interval_ms = wait_ms;
        self
    }

    /// Arms the first tick as soon as possible
    pub fn start(&mut self) {
        self.wake_soon();
    }

    /// Re-arms a stopped pump at the remembered interval
    pub fn resume(&mut self) {
        if self.state.stopped {
            self.arm(self.state.interval_ms);
        }
    }

    /// Runs one tick against `target` and reprograms the timer
    pub fn tick(&mut self, target: &mut dyn PumpTarget) -> WaitDirective {
        self.state.ticks += 1;

        if self.state.reboot_requested {
            self.state.reboot_requested = false;
            self.state.input.clear();
            info!(tick = self.state.ticks, "engine reboot");
            target.reboot();
        }

        if let Some(action) = self.state.input.dequeue() {
            debug!(%action, "delivering input");
            target.deliver(action);
        }

        let wait = target.run_step();
        let directive = WaitDirective::from_step(wait);
        trace!(tick = self.state.ticks, wait, ?directive, "step complete");

        match directive.delay_ms() {
            None => {
                self.timer.cancel_pending();
                self.state.stopped = true;
                self.state.interval_ms = self.state.default_wait_ms;
            }
            Some(delay) => self.arm(delay),
        }

        // A backlog drains at one action per tick without waiting on the engine
        if !self.state.input.is_empty() || self.state.reboot_requested {
            self.wake_soon();
        }

        directive
    }

    /// Submits a remote-control button through the admission gate
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
        let admission = self.state.input.submit_action(action, required, current);
        if admission.is_queued() {
            self.wake_soon();
        }
        admission
    }

    /// Requests that the engine re-enter booting on the next tick
    pub fn request_reboot(&mut self) {
        self.state.reboot_requested = true;
        self.wake_soon();
    }

    pub fn state(&self) -> &PumpState {
        &self.state
    }

    /// Replaces the register-5 policy
    pub fn set_policy(&mut self, policy: GatePolicy) {
        self.state.input.set_policy(policy);
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    fn wake_soon(&mut self) {
        self.arm(MIN_WAIT_MS);
    }

    fn arm(&mut self, delay_ms: u32) {
        self.state.interval_ms = delay_ms;
        self.state.stopped = false;
        self.timer.schedule_after(delay_ms);
    }
}
