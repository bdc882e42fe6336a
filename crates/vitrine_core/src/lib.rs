//! Vitrine Core
//!
//! Foundational primitives shared by the Vitrine widget crates:
//!
//! - **Event Channels**: Typed publish/subscribe with scoped subscriptions
//! - **State Machines**: Pure `(state, event) -> (state, effects)` transitions
//! - **Call Limiters**: Throttle and cooldown driven by an explicit clock
//! - **Geometry**: Points, sizes and rectangles in layout pixels
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::events::EventChannel;
//!
//! let channel = EventChannel::<u32>::new();
//! let mailbox = channel.mailbox();
//!
//! channel.emit(&7);
//! assert_eq!(mailbox.drain(), vec![7]);
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;
pub mod throttle;

pub use events::{EventChannel, Mailbox, Subscription};
pub use fsm::{StateMachine, Transition};
pub use geometry::{Point, Rect, Size};
pub use throttle::Throttle;
