//! Call limiters driven by an explicit clock
//!
//! There are no timers here. The owner passes the current time (in
//! milliseconds, usually the animation scheduler's clock) and polls for
//! trailing calls once per frame.

/// Rate-limits calls to at most one per interval, keeping the latest
/// suppressed call as a trailing call
///
/// The first call in a quiet period runs immediately. Calls that arrive
/// while the window is open are collapsed into one saved payload (the
/// newest wins), which [`Throttle::poll`] releases when the window closes.
/// Releasing a trailing call opens a new window.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval_ms: f64,
    window_end: Option<f64>,
    saved: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            window_end: None,
            saved: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Offer a call at `now_ms`
    ///
    /// Returns the payload if it should run now, or `None` if it was saved
    /// as the trailing call.
    pub fn call(&mut self, now_ms: f64, payload: T) -> Option<T> {
        match self.window_end {
            Some(end) if now_ms < end => {
                self.saved = Some(payload);
                None
            }
            _ => {
                // A newer call supersedes a trailing call nobody polled for
                self.saved = None;
                self.window_end = Some(now_ms + self.interval_ms);
                Some(payload)
            }
        }
    }

    /// Release the trailing call if the window has closed
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        let end = self.window_end?;
        if now_ms < end {
            return None;
        }
        match self.saved.take() {
            Some(payload) => {
                tracing::trace!(now_ms, "throttle released trailing call");
                self.window_end = Some(now_ms + self.interval_ms);
                Some(payload)
            }
            None => {
                self.window_end = None;
                None
            }
        }
    }

    /// Whether a window is currently open
    pub fn is_throttled(&self, now_ms: f64) -> bool {
        self.window_end.is_some_and(|end| now_ms < end)
    }

    pub fn has_pending(&self) -> bool {
        self.saved.is_some()
    }

    pub fn reset(&mut self) {
        self.window_end = None;
        self.saved = None;
    }
}
