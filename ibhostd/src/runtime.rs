//! # Host Runtime
//!
//! The main event loop that ties everything together.
//!
//! ## Modes
//!
//! - **Sim**: virtual time from a [`ManualTimer`]; the input script drives
//!   presses, clicks and host commands, and `wait` lines move the clock.
//!   Fully deterministic, so frame checksums are reproducible.
//! - **Live**: wall-clock time; input lines arrive on stdin from a reader
//!   thread and the loop sleeps on the channel until the next wake.
//!
//! ## Tick
//!
//! Each wake runs one pump tick (reboot, one action, one engine step), then
//! services any redraw the step requested before the next wake is awaited.

use crate::commands::{HostCommand, HostCommandError, HostCommandParser};
use crate::config::{ConfigError, HostConfig};
use crate::context::{EngineHost, HostContext};
use crate::engine::PresentationEngine;
use crate::input_script::{InputScript, InputScriptError, ScriptedInput};
use hal::{ManualTimer, WakeTimer};
use input_types::{button_for, hit_test, ActionCode, HostAction, RemoteButton};
use services_input::Admission;
use services_scheduler::{Pump, PumpTarget, WaitDirective};
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Script error: {0}")]
    Script(#[from] InputScriptError),

    #[error("Command error: {0}")]
    Command(#[from] HostCommandError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Host mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Virtual time, scripted input
    Sim,
    /// Wall-clock time, input lines from stdin
    Live,
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    pub mode: HostMode,
    /// Optional input script (sim mode)
    pub script: Option<String>,
    /// Maximum pump ticks to run (0 = unlimited)
    pub max_steps: usize,
    /// Virtual time allowed to pass once the script is exhausted
    pub settle_ms: u64,
    pub host: HostConfig,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            mode: HostMode::Sim,
            script: None,
            max_steps: 0,
            settle_ms: 10_000,
            host: HostConfig::default(),
        }
    }
}

/// The engine and the host context for the duration of one tick
struct Session<'a, E: PresentationEngine> {
    engine: &'a mut E,
    host: &'a mut HostContext,
}

impl<E: PresentationEngine> PumpTarget for Session<'_, E> {
    fn reboot(&mut self) {
        self.host.reset();
        self.engine.boot();
    }

    fn deliver(&mut self, action: ActionCode) {
        self.engine.deliver_action(action);
    }

    fn run_step(&mut self) -> i32 {
        self.engine.run_step(&mut *self.host)
    }
}

/// Host runtime
pub struct HostRuntime<E: PresentationEngine> {
    mode: HostMode,
    max_steps: usize,
    settle_ms: u64,
    engine: E,
    context: HostContext,
    pump: Pump<ManualTimer>,
    script: Option<InputScript>,
    booted: bool,
    shutdown: bool,
    steps: usize,
    last_checksum: Option<u32>,
    frames_presented: u64,
}

impl<E: PresentationEngine> HostRuntime<E> {
    /// Creates a new host runtime around `engine`
    pub fn new(config: HostRuntimeConfig, engine: E) -> Result<Self, HostRuntimeError> {
        config.host.validate()?;

        let script = match &config.script {
            Some(text) => Some(InputScript::from_text(text)?),
            None => None,
        };

        let pump = Pump::new(ManualTimer::new(), config.host.gate_policy())
            .with_default_wait(config.host.default_wait_ms);

        Ok(Self {
            mode: config.mode,
            max_steps: config.max_steps,
            settle_ms: config.settle_ms,
            engine,
            context: HostContext::new(config.host),
            pump,
            script,
            booted: false,
            shutdown: false,
            steps: 0,
            last_checksum: None,
            frames_presented: 0,
        })
    }

    /// Puts the engine into booting and arms the first tick
    pub fn boot(&mut self) {
        self.engine.boot();
        self.pump.start();
        self.booted = true;
        info!(
            receiver = self.context.receiver_id(),
            root = %self.context.config().content_root.display(),
            "engine booting"
        );
    }

    /// Runs the host event loop
    ///
    /// Returns when:
    /// - Quit command received
    /// - Max steps reached (if configured)
    /// - Sim: the script is exhausted and the settle window has passed
    /// - Live: stdin is closed and the engine has stopped the pump
    pub fn run(&mut self) -> Result<(), HostRuntimeError> {
        if !self.booted {
            self.boot();
        }

        match self.mode {
            HostMode::Sim => self.run_sim(),
            HostMode::Live => self.run_live(),
        }

        info!(
            steps = self.steps,
            frames = self.context.compositor().frames(),
            "host stopped"
        );
        Ok(())
    }

    fn run_sim(&mut self) {
        while !self.should_exit() {
            match self.script.as_mut().and_then(InputScript::next_input) {
                Some(input) => self.apply(input),
                None => {
                    self.advance(self.settle_ms);
                    break;
                }
            }
        }
    }

    fn run_live(&mut self) {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || read_input_lines(std::io::stdin().lock(), tx));

        let mut input: Option<Receiver<ScriptedInput>> = Some(rx);
        let mut last_wake = Instant::now();

        while !self.should_exit() {
            let pending = self.pump.timer().pending();
            let event = match (&input, pending) {
                (Some(rx), Some(delay)) => rx.recv_timeout(Duration::from_millis(delay.into())),
                (Some(rx), None) => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                (None, Some(delay)) => {
                    thread::sleep(Duration::from_millis(delay.into()));
                    Err(RecvTimeoutError::Timeout)
                }
                (None, None) => break,
            };

            let now = Instant::now();
            let elapsed =
                u32::try_from(now.duration_since(last_wake).as_millis()).unwrap_or(u32::MAX);
            last_wake = now;
            if self.pump.timer_mut().advance(elapsed).is_some() {
                self.tick();
            }

            match event {
                Ok(scripted) => self.apply(scripted),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("input closed");
                    input = None;
                }
            }
        }
    }

    /// Lets `ms` of virtual time pass, ticking at every wake inside the window
    pub fn advance(&mut self, ms: u64) {
        let mut remaining = ms;
        while !self.should_exit() {
            let Some(pending) = self.pump.timer().pending() else {
                break;
            };
            if u64::from(pending) > remaining {
                break;
            }
            self.pump.timer_mut().advance(pending);
            remaining -= u64::from(pending);
            self.tick();
        }
        let rest = u32::try_from(remaining).unwrap_or(u32::MAX);
        self.pump.timer_mut().advance(rest);
    }

    /// Runs one pump tick, then services a requested redraw
    pub fn tick(&mut self) -> WaitDirective {
        let mut session = Session {
            engine: &mut self.engine,
            host: &mut self.context,
        };
        let directive = self.pump.tick(&mut session);
        self.steps += 1;
        self.service_redraw();
        directive
    }

    fn service_redraw(&mut self) {
        let engine = &self.engine;
        let Some(checksum) = self
            .context
            .compositor_mut()
            .service(|canvas| engine.redraw(canvas))
        else {
            return;
        };

        let frame = self.context.compositor().frames();
        if self.context.debug() {
            info!(frame, checksum = %format!("{checksum:08x}"), "frame");
        } else {
            debug!(frame, checksum = %format!("{checksum:08x}"), "frame");
        }

        if self.context.compositor_mut().present().is_some() {
            self.frames_presented += 1;
        }
        self.last_checksum = Some(checksum);
    }

    fn apply(&mut self, input: ScriptedInput) {
        match input {
            ScriptedInput::Press(action) => match button_for(action) {
                Some(button) => {
                    self.submit(button);
                }
                None => warn!(%action, "no remote button for action"),
            },
            ScriptedInput::Click { x, y } => match hit_test(x, y) {
                Some(button) => {
                    self.submit(button);
                }
                None => debug!(x, y, "click outside the remote"),
            },
            ScriptedInput::Wait(ms) => match self.mode {
                HostMode::Sim => self.advance(ms),
                HostMode::Live => {}
            },
            ScriptedInput::Command(command) => self.execute(command),
        }
    }

    /// Submits a remote-control button against the current register
    pub fn submit(&mut self, button: &RemoteButton) -> Admission {
        let admission = self.pump.submit(button, self.context.input_register());
        match admission {
            Admission::Queued(action) => debug!(%action, "input queued"),
            Admission::Rejected(action) => {
                debug!(%action, register = %self.context.input_register(), "input rejected")
            }
            Admission::Host(action) => self.host_action(action),
        }
        admission
    }

    fn host_action(&mut self, action: HostAction) {
        match action {
            HostAction::DebugToggle => {
                self.context.toggle_debug();
            }
            HostAction::PrintState => self.print_state(),
            HostAction::Reload => self.pump.request_reboot(),
        }
    }

    fn print_state(&self) {
        info!(
            state = %self.engine.print_state(),
            register = %self.context.input_register(),
            queued = self.pump.state().input().len(),
            "engine state"
        );
    }

    /// Parses and executes a host command
    pub fn execute_command(&mut self, command_text: &str) -> Result<(), HostRuntimeError> {
        let command = HostCommandParser::parse(command_text)?;
        self.execute(command);
        Ok(())
    }

    fn execute(&mut self, command: HostCommand) {
        match command {
            HostCommand::Root { path } => {
                info!(root = %path.display(), "content root changed");
                self.context.config_mut().content_root = path;
                self.pump.request_reboot();
            }
            HostCommand::Reload => self.pump.request_reboot(),
            HostCommand::State => self.print_state(),
            HostCommand::Debug => {
                self.context.toggle_debug();
            }
            HostCommand::Quit => self.shutdown = true,
        }
    }

    fn should_exit(&self) -> bool {
        self.shutdown || (self.max_steps > 0 && self.steps >= self.max_steps)
    }

    /// Returns the number of pump ticks run
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// CRC-32 of the most recent frame
    pub fn last_checksum(&self) -> Option<u32> {
        self.last_checksum
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn pump(&self) -> &Pump<ManualTimer> {
        &self.pump
    }
}

/// Reads input lines until EOF; waits are slept here so the main loop only
/// sees presses, clicks and commands
fn read_input_lines(reader: impl BufRead, tx: Sender<ScriptedInput>) {
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        match InputScript::parse_line(&line) {
            Ok(Some(ScriptedInput::Wait(ms))) => thread::sleep(Duration::from_millis(ms)),
            Ok(Some(input)) => {
                if tx.send(input).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, line = %line, "ignored input line"),
        }
    }
}
