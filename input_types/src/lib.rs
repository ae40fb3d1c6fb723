//! # Input Types
//!
//! This crate defines the remote-control input vocabulary shared by the host
//! and the presentation engine.
//!
//! ## Philosophy
//!
//! - **Actions, not keys**: Input is a logical remote-control action, not a scan code
//! - **Gated, not ambient**: The engine's input register decides what may be delivered
//! - **Static**: The remote layout is a fixed table, hit-tested by pointer position
//! - **Testable**: The admission rule is a pure function over two small integers
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A keyboard mapping layer (debug shortcuts live outside the host)
//! - A queue (see `services_input`)
//! - A widget toolkit (regions are plain rectangles)

use core::fmt;
use serde::{Deserialize, Serialize};

/// Remote-control action delivered to the engine
///
/// The discriminants are the broadcast profile's user-input event codes,
/// which is what the engine receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ActionCode {
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
    Digit0 = 5,
    Digit1 = 6,
    Digit2 = 7,
    Digit3 = 8,
    Digit4 = 9,
    Digit5 = 10,
    Digit6 = 11,
    Digit7 = 12,
    Digit8 = 13,
    Digit9 = 14,
    Select = 15,
    Cancel = 16,
    Red = 100,
    Green = 101,
    Yellow = 102,
    Blue = 103,
    Text = 104,
}

impl ActionCode {
    /// Every action, in code order
    pub const ALL: [ActionCode; 21] = [
        ActionCode::Up,
        ActionCode::Down,
        ActionCode::Left,
        ActionCode::Right,
        ActionCode::Digit0,
        ActionCode::Digit1,
        ActionCode::Digit2,
        ActionCode::Digit3,
        ActionCode::Digit4,
        ActionCode::Digit5,
        ActionCode::Digit6,
        ActionCode::Digit7,
        ActionCode::Digit8,
        ActionCode::Digit9,
        ActionCode::Select,
        ActionCode::Cancel,
        ActionCode::Red,
        ActionCode::Green,
        ActionCode::Yellow,
        ActionCode::Blue,
        ActionCode::Text,
    ];

    /// Returns the integer event code handed to the engine
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Looks up an action by its integer event code
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|action| action.code() == code)
    }

    /// Returns the digit action for `0..=9`
    pub fn digit(n: u8) -> Option<Self> {
        match n {
            0..=9 => Self::from_code(ActionCode::Digit0.code() + u16::from(n)),
            _ => None,
        }
    }

    /// Returns the digit value if this is a digit action
    pub fn as_digit(self) -> Option<u8> {
        let code = self.code();
        if (ActionCode::Digit0.code()..=ActionCode::Digit9.code()).contains(&code) {
            Some((code - ActionCode::Digit0.code()) as u8)
        } else {
            None
        }
    }

    /// Parses a case-insensitive action name (`red`, `select`, `7`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if lower.len() == 1 {
            if let Some(d) = lower.chars().next().and_then(|c| c.to_digit(10)) {
                return Self::digit(d as u8);
            }
        }
        match lower.as_str() {
            "up" => Some(ActionCode::Up),
            "down" => Some(ActionCode::Down),
            "left" => Some(ActionCode::Left),
            "right" => Some(ActionCode::Right),
            "select" | "ok" | "enter" => Some(ActionCode::Select),
            "cancel" | "back" => Some(ActionCode::Cancel),
            "red" => Some(ActionCode::Red),
            "green" => Some(ActionCode::Green),
            "yellow" => Some(ActionCode::Yellow),
            "blue" => Some(ActionCode::Blue),
            "text" => Some(ActionCode::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_digit() {
            Some(d) => write!(f, "{}", d),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Host-level action
///
/// These never reach the engine and are never gated by the input register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostAction {
    /// Toggle per-frame diagnostics
    DebugToggle,
    /// Ask the engine for its diagnostic state dump
    PrintState,
    /// Reboot the engine against the current content root
    Reload,
}

/// What a remote-control button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Queued for the engine, subject to the input register
    Engine(ActionCode),
    /// Handled by the host immediately
    Host(HostAction),
}

impl ButtonAction {
    /// Returns true if this action bypasses register gating
    pub fn is_host(&self) -> bool {
        matches!(self, ButtonAction::Host(_))
    }
}

/// Engine-owned input register
///
/// Selects which remote-control actions the host is allowed to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InputRegister(pub u8);

impl InputRegister {
    /// Nothing armed
    pub const NONE: Self = Self(0);
    /// Navigation context: arrows, select, cancel, colour keys
    pub const NAVIGATION: Self = Self(3);
    /// Every action is accepted
    pub const ALL: Self = Self(4);
    /// Numeric entry context
    pub const NUMERIC: Self = Self(5);

    /// Returns the raw register value
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for InputRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// How register 5 is gated
///
/// The historical gate for register 5 required the action's tag to be 3 and 5
/// at once, which no action can satisfy. `Corrected` reads it as "3 or 5";
/// `Legacy` keeps the unreachable form so old content behaves as it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GatePolicy {
    #[default]
    Corrected,
    Legacy,
}

/// Returns true if an action tagged `required` may be queued under `current`
pub fn admits(policy: GatePolicy, current: InputRegister, required: InputRegister) -> bool {
    if current == InputRegister::ALL {
        return true;
    }
    if current == required && required == InputRegister::NAVIGATION {
        return true;
    }
    if current == InputRegister::NUMERIC {
        return match policy {
            GatePolicy::Corrected => {
                required == InputRegister::NAVIGATION || required == InputRegister::NUMERIC
            }
            #[allow(clippy::nonminimal_bool)]
            GatePolicy::Legacy => {
                required == InputRegister::NAVIGATION && required == InputRegister::NUMERIC
            }
        };
    }
    false
}

/// Axis-aligned hit region on the remote-control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the point lies inside (right/bottom edges exclusive)
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (left, top) = (i32::from(self.x), i32::from(self.y));
        x >= left
            && y >= top
            && x < left + i32::from(self.width)
            && y < top + i32::from(self.height)
    }
}

/// One entry of the remote-control table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteButton {
    pub action: ButtonAction,
    pub region: Region,
    /// Register the action is tagged with (ignored for host actions)
    pub required: InputRegister,
}

const fn engine(action: ActionCode, region: Region, required: InputRegister) -> RemoteButton {
    RemoteButton {
        action: ButtonAction::Engine(action),
        region,
        required,
    }
}

const fn host(action: HostAction, region: Region) -> RemoteButton {
    RemoteButton {
        action: ButtonAction::Host(action),
        region,
        required: InputRegister::NONE,
    }
}

const NAV: InputRegister = InputRegister::NAVIGATION;
const NUM: InputRegister = InputRegister::NUMERIC;

/// Width of the remote-control panel in pixels
pub const REMOTE_WIDTH: u16 = 160;
/// Height of the remote-control panel in pixels
pub const REMOTE_HEIGHT: u16 = 330;

/// Static remote-control layout
pub static REMOTE_BUTTONS: [RemoteButton; 24] = [
    // Colour keys
    engine(ActionCode::Red, Region::new(10, 10, 30, 20), NAV),
    engine(ActionCode::Green, Region::new(45, 10, 30, 20), NAV),
    engine(ActionCode::Yellow, Region::new(80, 10, 30, 20), NAV),
    engine(ActionCode::Blue, Region::new(115, 10, 30, 20), NAV),
    engine(ActionCode::Text, Region::new(10, 40, 60, 20), InputRegister::ALL),
    engine(ActionCode::Cancel, Region::new(90, 40, 60, 20), NAV),
    // Navigation cluster
    engine(ActionCode::Up, Region::new(65, 70, 30, 25), NAV),
    engine(ActionCode::Left, Region::new(30, 95, 30, 25), NAV),
    engine(ActionCode::Select, Region::new(65, 95, 30, 25), NAV),
    engine(ActionCode::Right, Region::new(100, 95, 30, 25), NAV),
    engine(ActionCode::Down, Region::new(65, 120, 30, 25), NAV),
    // Keypad
    engine(ActionCode::Digit1, Region::new(30, 160, 30, 25), NUM),
    engine(ActionCode::Digit2, Region::new(65, 160, 30, 25), NUM),
    engine(ActionCode::Digit3, Region::new(100, 160, 30, 25), NUM),
    engine(ActionCode::Digit4, Region::new(30, 190, 30, 25), NUM),
    engine(ActionCode::Digit5, Region::new(65, 190, 30, 25), NUM),
    engine(ActionCode::Digit6, Region::new(100, 190, 30, 25), NUM),
    engine(ActionCode::Digit7, Region::new(30, 220, 30, 25), NUM),
    engine(ActionCode::Digit8, Region::new(65, 220, 30, 25), NUM),
    engine(ActionCode::Digit9, Region::new(100, 220, 30, 25), NUM),
    engine(ActionCode::Digit0, Region::new(65, 250, 30, 25), NUM),
    // Host strip
    host(HostAction::DebugToggle, Region::new(10, 300, 45, 20)),
    host(HostAction::PrintState, Region::new(60, 300, 45, 20)),
    host(HostAction::Reload, Region::new(110, 300, 45, 20)),
];

/// Resolves a pointer position on the remote panel to a button
pub fn hit_test(x: i32, y: i32) -> Option<&'static RemoteButton> {
    REMOTE_BUTTONS.iter().find(|button| button.region.contains(x, y))
}

/// Returns the table entry for an engine action
pub fn button_for(action: ActionCode) -> Option<&'static RemoteButton> {
    REMOTE_BUTTONS
        .iter()
        .find(|button| button.action == ButtonAction::Engine(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REGISTERS: [u8; 4] = [0, 3, 4, 5];

    /// (current, required) → admitted, Corrected policy
    const CORRECTED_TABLE: [(u8, u8, bool); 16] = [
        (0, 3, false),
        (0, 4, false),
        (0, 5, false),
        (0, 0, false),
        (3, 3, true),
        (3, 4, false),
        (3, 5, false),
        (3, 0, false),
        (4, 3, true),
        (4, 4, true),
        (4, 5, true),
        (4, 0, true),
        (5, 3, true),
        (5, 4, false),
        (5, 5, true),
        (5, 0, false),
    ];

    #[test]
    fn test_admission_table_corrected() {
        for (current, required, expected) in CORRECTED_TABLE {
            assert_eq!(
                admits(
                    GatePolicy::Corrected,
                    InputRegister(current),
                    InputRegister(required)
                ),
                expected,
                "current={} required={}",
                current,
                required
            );
        }
    }

    #[test]
    fn test_admission_table_legacy_register5_admits_nothing() {
        for (current, required, corrected) in CORRECTED_TABLE {
            let expected = if current == 5 { false } else { corrected };
            assert_eq!(
                admits(
                    GatePolicy::Legacy,
                    InputRegister(current),
                    InputRegister(required)
                ),
                expected,
                "current={} required={}",
                current,
                required
            );
        }
    }

    #[test]
    fn test_policies_differ_only_on_register5() {
        for current in REGISTERS {
            for required in REGISTERS {
                let a = admits(
                    GatePolicy::Corrected,
                    InputRegister(current),
                    InputRegister(required),
                );
                let b = admits(
                    GatePolicy::Legacy,
                    InputRegister(current),
                    InputRegister(required),
                );
                if current != 5 {
                    assert_eq!(a, b);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_register4_admits_everything(required in any::<u8>()) {
            for policy in [GatePolicy::Corrected, GatePolicy::Legacy] {
                prop_assert!(admits(policy, InputRegister::ALL, InputRegister(required)));
            }
        }

        #[test]
        fn prop_unknown_registers_admit_nothing(current in 6u8..=255u8, required in any::<u8>()) {
            prop_assert!(!admits(GatePolicy::Corrected, InputRegister(current), InputRegister(required)));
        }
    }

    #[test]
    fn test_action_code_round_trip() {
        for action in ActionCode::ALL {
            assert_eq!(ActionCode::from_code(action.code()), Some(action));
        }
        assert_eq!(ActionCode::from_code(0), None);
        assert_eq!(ActionCode::from_code(17), None);
    }

    #[test]
    fn test_digits() {
        assert_eq!(ActionCode::digit(0), Some(ActionCode::Digit0));
        assert_eq!(ActionCode::digit(9), Some(ActionCode::Digit9));
        assert_eq!(ActionCode::digit(10), None);
        assert_eq!(ActionCode::Digit7.as_digit(), Some(7));
        assert_eq!(ActionCode::Red.as_digit(), None);
        assert_eq!(ActionCode::Digit7.to_string(), "7");
        assert_eq!(ActionCode::Select.to_string(), "Select");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ActionCode::from_name("RED"), Some(ActionCode::Red));
        assert_eq!(ActionCode::from_name("ok"), Some(ActionCode::Select));
        assert_eq!(ActionCode::from_name(" 4 "), Some(ActionCode::Digit4));
        assert_eq!(ActionCode::from_name("purple"), None);
    }

    #[test]
    fn test_every_action_has_exactly_one_button() {
        for action in ActionCode::ALL {
            let count = REMOTE_BUTTONS
                .iter()
                .filter(|b| b.action == ButtonAction::Engine(action))
                .count();
            assert_eq!(count, 1, "{:?}", action);
        }
    }

    #[test]
    fn test_buttons_do_not_overlap_and_fit_panel() {
        for (i, a) in REMOTE_BUTTONS.iter().enumerate() {
            assert!(a.region.x + a.region.width <= REMOTE_WIDTH);
            assert!(a.region.y + a.region.height <= REMOTE_HEIGHT);
            for b in REMOTE_BUTTONS.iter().skip(i + 1) {
                let ra = a.region;
                let rb = b.region;
                let disjoint = ra.x + ra.width <= rb.x
                    || rb.x + rb.width <= ra.x
                    || ra.y + ra.height <= rb.y
                    || rb.y + rb.height <= ra.y;
                assert!(disjoint, "{:?} overlaps {:?}", a.action, b.action);
            }
        }
    }

    #[test]
    fn test_hit_test() {
        let hit = hit_test(66, 96).unwrap();
        assert_eq!(hit.action, ButtonAction::Engine(ActionCode::Select));
        assert_eq!(hit.required, InputRegister::NAVIGATION);

        let hit = hit_test(70, 255).unwrap();
        assert_eq!(hit.action, ButtonAction::Engine(ActionCode::Digit0));
        assert_eq!(hit.required, InputRegister::NUMERIC);

        let hit = hit_test(20, 310).unwrap();
        assert!(hit.action.is_host());

        assert!(hit_test(0, 0).is_none());
        assert!(hit_test(-5, 96).is_none());
    }

    #[test]
    fn test_region_edges_are_exclusive() {
        let region = Region::new(10, 10, 5, 5);
        assert!(region.contains(10, 10));
        assert!(region.contains(14, 14));
        assert!(!region.contains(15, 10));
        assert!(!region.contains(10, 15));
    }

    #[test]
    fn test_serialization_round_trip() {
        let action = ButtonAction::Engine(ActionCode::Green);
        let json = serde_json::to_string(&action).unwrap();
        let back: ButtonAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
