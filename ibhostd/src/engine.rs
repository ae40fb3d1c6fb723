//! # Engine Boundary
//!
//! What the host needs from a presentation engine. The engine's object
//! model and interpreter live behind this trait.

use crate::context::EngineHost;
use graphics_rasterizer::Canvas;
use input_types::ActionCode;

/// A presentation engine driven by the pump
pub trait PresentationEngine {
    /// Re-enters the booting state; the next step loads startup content
    fn boot(&mut self);

    /// Delivers one admitted remote-control action
    fn deliver_action(&mut self, action: ActionCode);

    /// Runs one step with the host's services available
    ///
    /// Returns the signed wait in milliseconds before the next step:
    /// negative stops the pump, zero asks for the next step as soon as possible.
    fn run_step(&mut self, host: &mut dyn EngineHost) -> i32;

    /// Draws the entire display tree onto a freshly cleared frame
    fn redraw(&self, canvas: &mut Canvas<'_>);

    /// Opaque diagnostic dump
    fn print_state(&self) -> String;
}
