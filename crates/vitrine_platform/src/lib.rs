//! Vitrine Platform Abstraction Layer
//!
//! Platform-agnostic event types fed into a page by its host, and the
//! [`EventLoop`] trait hosts implement to drive a page.
//!
//! # Architecture
//!
//! - [`Event`] - Everything a page reacts to: window changes, input, frames
//! - [`EventLoop`] - Delivers events to a handler until told to exit
//! - [`ScriptedEventLoop`] - Replays a recorded event sequence (tests, demos)
//!
//! # Example
//!
//! ```rust
//! use vitrine_platform::*;
//!
//! let events = vec![
//!     Event::Window(WindowEvent::Resized { width: 1024.0, height: 768.0 }),
//!     Event::Frame { dt_ms: 16.0 },
//! ];
//!
//! let mut frames = 0;
//! ScriptedEventLoop::new(events)
//!     .run(|event| {
//!         if let Event::Frame { .. } = event {
//!             frames += 1;
//!         }
//!         ControlFlow::Continue
//!     })
//!     .unwrap();
//! assert_eq!(frames, 1);
//! ```

mod error;
mod event;
mod input;

pub use error::{PlatformError, Result};
pub use event::{ControlFlow, Event, EventLoop, ScriptedEventLoop, WindowEvent};
pub use input::{InputEvent, Key, KeyState, KeyboardEvent, PointerEvent};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{ControlFlow, Event, EventLoop, ScriptedEventLoop, WindowEvent};
    pub use crate::input::{InputEvent, Key, KeyState, KeyboardEvent, PointerEvent};
}
