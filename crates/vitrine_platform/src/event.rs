//! Unified event types and the event loop trait

use crate::error::Result;
use crate::input::InputEvent;
use serde::{Deserialize, Serialize};

/// Unified event type for all platforms
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Window/viewport events
    Window(WindowEvent),

    /// Input events (pointer, keyboard, text)
    Input(InputEvent),

    /// A paint frame elapsed
    Frame {
        /// Milliseconds since the previous frame
        dt_ms: f32,
    },
}

/// Window-specific events
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEvent {
    /// Viewport was resized
    Resized { width: f32, height: f32 },

    /// Page was scrolled to a new vertical offset
    Scrolled { scroll_y: f32 },
}

/// Control flow for the event loop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControlFlow {
    /// Keep delivering events
    #[default]
    Continue,
    /// Stop the loop
    Exit,
}

/// Delivers events to a handler until the source runs dry or the handler
/// asks to exit
pub trait EventLoop {
    fn run<F>(self, handler: F) -> Result<()>
    where
        F: FnMut(Event) -> ControlFlow;
}

/// An event loop that replays a fixed sequence of events
#[derive(Clone, Debug, Default)]
pub struct ScriptedEventLoop {
    events: Vec<Event>,
}

impl ScriptedEventLoop {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Decode a recorded sequence from a JSON array of events
    pub fn from_json(json: &str) -> Result<Self> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        tracing::debug!(count = events.len(), "loaded scripted events");
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventLoop for ScriptedEventLoop {
    fn run<F>(self, mut handler: F) -> Result<()>
    where
        F: FnMut(Event) -> ControlFlow,
    {
        for event in self.events {
            if handler(event) == ControlFlow::Exit {
                tracing::debug!("scripted event loop exited early");
                break;
            }
        }
        Ok(())
    }
}
