//! Finite state machines with explicit effects
//!
//! Widget states are plain enums with a pure transition function. Given the
//! current state and an event, the function returns either no transition
//! (the event is ignored in that state) or the next state together with the
//! effects the widget must carry out. The widget then performs the effects
//! against the document.
//!
//! Keeping the table pure makes idempotence and cancellation rules easy to
//! audit and test without a document.
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::fsm::{StateMachine, Transition};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Lamp {
//!     Off,
//!     On,
//! }
//!
//! #[derive(Clone, Copy, Debug)]
//! enum Switch {
//!     Flip,
//! }
//!
//! impl StateMachine for Lamp {
//!     type Event = Switch;
//!     type Effect = &'static str;
//!
//!     fn transition(self, event: Switch) -> Option<Transition<Self, Self::Effect>> {
//!         match (self, event) {
//!             (Lamp::Off, Switch::Flip) => Some(Transition::to(Lamp::On).with("light")),
//!             (Lamp::On, Switch::Flip) => Some(Transition::to(Lamp::Off).with("dark")),
//!         }
//!     }
//! }
//!
//! let step = Lamp::Off.transition(Switch::Flip).unwrap();
//! assert_eq!(step.state, Lamp::On);
//! assert_eq!(step.effects.as_slice(), &["light"]);
//! ```

use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// A state type with a pure transition table
pub trait StateMachine: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Inputs the machine reacts to
    type Event: Copy + Debug;
    /// Side effects the owner performs after a transition
    type Effect: Debug;

    /// Handle an event and return the transition, or `None` if the event is
    /// ignored in this state
    fn transition(self, event: Self::Event) -> Option<Transition<Self, Self::Effect>>;
}

/// The result of a transition: the next state plus ordered effects
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S, E> {
    pub state: S,
    pub effects: SmallVec<[E; 4]>,
}

impl<S, E> Transition<S, E> {
    /// A transition with no effects
    pub fn to(state: S) -> Self {
        Self {
            state,
            effects: SmallVec::new(),
        }
    }

    /// Append an effect
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }
}
