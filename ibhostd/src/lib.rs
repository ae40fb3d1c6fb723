//! # Interactive Broadcast Host
//!
//! The host side of an interactive-broadcast presentation engine: it wakes
//! the engine on a timer, gates remote-control input, serves carousel
//! content and composites the engine's surfaces into a frame.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The engine never touches files, clocks or pixels directly
//! - **Explicit context**: Every host service reaches the engine through [`EngineHost`]
//! - **One step at a time**: Single-threaded pump; nothing runs concurrently with a step
//! - **Deterministic mode is first-class**: Scripted virtual time for tests
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Boots and reboots the engine, re-applying configuration each time
//! - Runs the scheduler pump (wake → reboot? → one action → step → redraw)
//! - Admits remote-control input against the engine's input register
//! - Exposes the carousel content store and the surface factory
//! - Hands out finished frames and logs their checksums
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Interpret content; that is the engine's job
//! - Decode or display broadcast video, or play audio
//! - Tune between services
//! - Pool, reuse or destroy engine surfaces

pub mod commands;
pub mod config;
pub mod context;
pub mod demo_engine;
pub mod engine;
pub mod input_script;
pub mod runtime;

pub use commands::{HostCommand, HostCommandError, HostCommandParser};
pub use config::{ConfigError, HostConfig};
pub use context::{EngineHost, HostContext, HostError, VideoRequest};
pub use demo_engine::DemoEngine;
pub use engine::PresentationEngine;
pub use input_script::{InputScript, InputScriptError, ScriptedInput};
pub use runtime::{HostMode, HostRuntime, HostRuntimeConfig, HostRuntimeError};
