//! Input event types for pointer and keyboard

use serde::{Deserialize, Serialize};

/// Input events
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer event
    Pointer(PointerEvent),
    /// Keyboard event
    Keyboard(KeyboardEvent),
    /// Text typed into the focused element
    Text {
        /// The element's full text after the edit
        value: String,
    },
}

// ============================================================================
// Pointer Events
// ============================================================================

/// Pointer events in page coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEvent {
    /// Pointer button pressed
    Down {
        /// Identifies one pointer for the length of a gesture
        pointer_id: u32,
        /// X position in page coordinates
        x: f32,
        /// Y position in page coordinates
        y: f32,
    },
    /// Pointer moved
    Moved {
        pointer_id: u32,
        x: f32,
        y: f32,
    },
    /// Pointer button released
    Up {
        pointer_id: u32,
        x: f32,
        y: f32,
    },
    /// A completed press and release
    Click {
        x: f32,
        y: f32,
    },
}

impl PointerEvent {
    /// Get the pointer ID (clicks are not tied to a pointer)
    pub fn pointer_id(&self) -> Option<u32> {
        match self {
            PointerEvent::Down { pointer_id, .. }
            | PointerEvent::Moved { pointer_id, .. }
            | PointerEvent::Up { pointer_id, .. } => Some(*pointer_id),
            PointerEvent::Click { .. } => None,
        }
    }

    /// Get the position
    pub fn position(&self) -> (f32, f32) {
        match self {
            PointerEvent::Down { x, y, .. }
            | PointerEvent::Moved { x, y, .. }
            | PointerEvent::Up { x, y, .. }
            | PointerEvent::Click { x, y } => (*x, *y),
        }
    }
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keyboard event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    /// The key that was pressed or released
    pub key: Key,
    /// Whether the key was pressed or released
    pub state: KeyState,
}

impl KeyboardEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }
}

/// Key press/release state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    /// Key was pressed
    Pressed,
    /// Key was released
    Released,
}

/// Key codes the widgets care about
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Escape,
    Tab,
    Backspace,

    // Character input (for text input)
    Char(char),

    // Unknown key
    Unknown,
}
