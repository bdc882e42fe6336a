//! Vitrine Animation System
//!
//! Timed, interruptible property animations for widgets.
//!
//! # Features
//!
//! - **Easing**: CSS timing functions, including `cubic-bezier(...)`
//! - **Tweens**: One value interpolated over a fixed duration, cancellable
//! - **Scheduler**: Registry of running tweens plus the frame counter and
//!   clock that the host advances once per frame
//! - **AnimatedTween**: Owning wrapper that removes its tween on drop

pub mod easing;
pub mod scheduler;
pub mod tween;

pub use easing::{Easing, EasingParseError};
pub use scheduler::{AnimatedTween, AnimationScheduler, SchedulerHandle, TweenId};
pub use tween::{PlayState, Tween};
