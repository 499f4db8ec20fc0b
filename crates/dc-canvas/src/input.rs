//! Input abstraction layer.
//!
//! Normalizes pointer, wheel and keyboard events from the host toolkit
//! into a unified `InputEvent` enum consumed by the scene. Pointer
//! positions are in view pixels; the scene maps them to scene coordinates.

use kurbo::Point;

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Alt alone: moves nodes instead of drawing edges.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Ctrl alone: toggles selection, turns the wheel into zoom.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },

    /// Pointer moved, with or without a button held.
    PointerMove { pos: Point, modifiers: Modifiers },

    PointerUp {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },

    /// Second press of a double click; replaces that press's `PointerDown`.
    DoubleClick {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },

    /// Wheel notch. Positive `dy` scrolls up / zooms in.
    Wheel {
        pos: Point,
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
    },

    /// Key press. `key` is the `KeyboardEvent.key`-style name (`"Delete"`, `"a"`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    /// Unmodified primary-button press.
    pub fn press(x: f64, y: f64) -> Self {
        Self::PointerDown {
            pos: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::PointerMove {
            pos: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn release(x: f64, y: f64) -> Self {
        Self::PointerUp {
            pos: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self::DoubleClick {
            pos: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Same event with `modifiers` held.
    #[must_use]
    pub fn with_modifiers(mut self, held: Modifiers) -> Self {
        match &mut self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. }
            | Self::DoubleClick { modifiers, .. }
            | Self::Wheel { modifiers, .. }
            | Self::Key { modifiers, .. } => *modifiers = held,
        }
        self
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { pos, .. }
            | Self::PointerMove { pos, .. }
            | Self::PointerUp { pos, .. }
            | Self::DoubleClick { pos, .. }
            | Self::Wheel { pos, .. } => Some(*pos),
            Self::Key { .. } => None,
        }
    }
}
