//! Animation scheduler
//!
//! Owns every running tween plus the frame counter and the millisecond
//! clock. The host calls [`AnimationScheduler::tick`] once per paint frame
//! with the elapsed time; widgets read values back through a
//! [`SchedulerHandle`] during their own per-frame update.
//!
//! Tweens are registered implicitly through [`AnimatedTween`], which removes
//! its tween from the scheduler when dropped.

use crate::tween::{PlayState, Tween};
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

new_key_type! {
    /// Handle to a registered tween
    pub struct TweenId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    tweens: SlotMap<TweenId, Tween>,
    /// Number of completed ticks
    frame: u64,
    /// Milliseconds elapsed across all ticks
    clock_ms: f64,
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The frame clock and tween registry
///
/// Typically held by the page and shared with widgets via
/// [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                tweens: SlotMap::with_key(),
                frame: 0,
                clock_ms: 0.0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to widgets
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance one paint frame
    ///
    /// Returns true if any tween is still playing (needs another frame).
    pub fn tick(&self, dt_ms: f32) -> bool {
        let mut inner = lock(&self.inner);
        inner.frame += 1;
        inner.clock_ms += f64::from(dt_ms.max(0.0));

        for (_, tween) in inner.tweens.iter_mut() {
            tween.tick(dt_ms);
        }

        // Finished tweens stay registered until their owner drops them, so
        // the owner can still observe the final state.
        let active = inner.tweens.values().any(Tween::is_playing);
        tracing::trace!(frame = inner.frame, active, "animation tick");
        active
    }

    /// Check if any tween is still playing
    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).tweens.values().any(Tween::is_playing)
    }

    /// Number of registered tweens (playing or not)
    pub fn tween_count(&self) -> usize {
        lock(&self.inner).tweens.len()
    }

    /// Number of completed ticks
    pub fn frame(&self) -> u64 {
        lock(&self.inner).frame
    }

    /// Milliseconds elapsed across all ticks
    pub fn now_ms(&self) -> f64 {
        lock(&self.inner).clock_ms
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("AnimationScheduler")
            .field("tweens", &inner.tweens.len())
            .field("frame", &inner.frame)
            .field("clock_ms", &inner.clock_ms)
            .finish()
    }
}

/// A weak handle to the animation scheduler
///
/// This is passed to widgets that need to run animations or read the
/// clock. It won't keep the scheduler alive; once the scheduler is dropped
/// every operation is a no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register and start a tween
    pub fn register_tween(&self, mut tween: Tween) -> Option<TweenId> {
        self.inner.upgrade().map(|inner| {
            tween.start();
            lock(&inner).tweens.insert(tween)
        })
    }

    /// Current value of a tween
    pub fn tween_value(&self, id: TweenId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).tweens.get(id).map(Tween::value))
    }

    /// Current lifecycle state of a tween
    pub fn tween_state(&self, id: TweenId) -> Option<PlayState> {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).tweens.get(id).map(Tween::state))
    }

    /// Cancel a playing tween, returning true if it was playing
    pub fn cancel_tween(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).tweens.get_mut(id).map(Tween::cancel))
            .unwrap_or(false)
    }

    /// Remove a tween from the registry
    pub fn remove_tween(&self, id: TweenId) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).tweens.remove(id);
        }
    }

    /// Number of completed ticks (0 if the scheduler is gone)
    pub fn frame(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).frame)
            .unwrap_or(0)
    }

    /// Milliseconds elapsed across all ticks (0 if the scheduler is gone)
    pub fn now_ms(&self) -> f64 {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).clock_ms)
            .unwrap_or(0.0)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A tween registered with the scheduler, owned by one widget
///
/// Dropping it removes the tween.
pub struct AnimatedTween {
    handle: SchedulerHandle,
    id: Option<TweenId>,
    to: f32,
}

impl AnimatedTween {
    /// Register `tween` with the scheduler and start it
    pub fn start(handle: SchedulerHandle, tween: Tween) -> Self {
        let to = tween.to();
        let id = handle.register_tween(tween);
        if id.is_none() {
            tracing::debug!("scheduler gone; tween will report finished");
        }
        Self { handle, id, to }
    }

    /// Current animated value
    pub fn value(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.tween_value(id))
            .unwrap_or(self.to)
    }

    /// Current lifecycle state
    ///
    /// A tween whose scheduler is gone reports `Finished`, since nothing
    /// would ever advance it.
    pub fn state(&self) -> PlayState {
        self.id
            .and_then(|id| self.handle.tween_state(id))
            .unwrap_or(PlayState::Finished)
    }

    pub fn is_finished(&self) -> bool {
        self.state() == PlayState::Finished
    }

    /// Cancel the tween, returning true if it was playing
    pub fn cancel(&mut self) -> bool {
        self.id.is_some_and(|id| self.handle.cancel_tween(id))
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

impl Drop for AnimatedTween {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_tween(id);
        }
    }
}

impl fmt::Debug for AnimatedTween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedTween")
            .field("id", &self.id)
            .field("to", &self.to)
            .field("state", &self.state())
            .finish()
    }
}
