//! Single-value timed animation
//!
//! A tween interpolates one value from `from` to `to` over a fixed duration
//! with an easing curve. It can be cancelled at any point, which freezes it
//! at its current value and marks it [`PlayState::Cancelled`] so owners can
//! tell an interrupted animation apart from a completed one.

use crate::easing::Easing;

/// Lifecycle of a tween
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// Created but not started
    #[default]
    Idle,
    /// Advancing on every tick
    Playing,
    /// Reached its end value
    Finished,
    /// Stopped before reaching its end value
    Cancelled,
}

/// A timed interpolation between two values
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    state: PlayState,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
            state: PlayState::Idle,
        }
    }

    /// Start (or restart) from the beginning
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.state = PlayState::Playing;
    }

    /// Advance by `dt_ms`
    ///
    /// Completion is only ever observed on a tick, even for a zero duration,
    /// so owners always see the finish after the frame that started it.
    pub fn tick(&mut self, dt_ms: f32) {
        if self.state != PlayState::Playing {
            return;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.state = PlayState::Finished;
        }
    }

    /// Stop where it is
    ///
    /// Returns true if the tween was playing.
    pub fn cancel(&mut self) -> bool {
        if self.state == PlayState::Playing {
            self.state = PlayState::Cancelled;
            true
        } else {
            false
        }
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return if self.state == PlayState::Finished {
                1.0
            } else {
                0.0
            };
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Current eased value
    pub fn value(&self) -> f32 {
        if self.state == PlayState::Finished {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_runs_to_completion() {
        let mut tween = Tween::new(40.0, 240.0, 300.0, Easing::Linear);
        tween.start();

        tween.tick(150.0);
        assert!(tween.is_playing());
        assert!((tween.value() - 140.0).abs() < 1e-3);

        tween.tick(200.0);
        assert_eq!(tween.state(), PlayState::Finished);
        assert_eq!(tween.value(), 240.0);
    }

    #[test]
    fn test_cancel_freezes_value() {
        let mut tween = Tween::new(0.0, 100.0, 100.0, Easing::Linear);
        tween.start();
        tween.tick(25.0);

        assert!(tween.cancel());
        assert_eq!(tween.state(), PlayState::Cancelled);

        tween.tick(100.0);
        assert!((tween.value() - 25.0).abs() < 1e-3);
        assert!(!tween.cancel());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut tween = Tween::new(0.0, 10.0, 0.0, Easing::EaseOut);
        tween.start();
        assert!(tween.is_playing());
        assert_eq!(tween.value(), 0.0);

        tween.tick(0.0);
        assert_eq!(tween.state(), PlayState::Finished);
        assert_eq!(tween.value(), 10.0);
    }

    #[test]
    fn test_idle_tween_ignores_ticks() {
        let mut tween = Tween::new(0.0, 10.0, 100.0, Easing::Linear);
        tween.tick(50.0);
        assert_eq!(tween.state(), PlayState::Idle);
        assert_eq!(tween.progress(), 0.0);
    }
}
