//! # Host Abstraction Layer (HAL)
//!
//! This crate defines the abstraction traits the broadcast host runs on.
//!
//! ## Philosophy
//!
//! **The presentation toolkit must be fully abstracted and swappable.**
//!
//! Nothing above this layer knows whether frames end up in a window, a
//! test buffer, or nowhere at all, or whether the pump is woken by a real
//! clock or a virtual one.
//!
//! ## Design Principles
//!
//! 1. **No toolkit assumptions**: Core logic must run headless
//! 2. **Trait-based**: Pixels and wake-ups go through traits
//! 3. **Testable**: Every trait has a trivial in-memory implementation

pub mod framebuffer;
pub mod timer;

pub use framebuffer::{Framebuffer, FramebufferInfo, PixelFormat};
pub use timer::{ManualTimer, WakeTimer};
