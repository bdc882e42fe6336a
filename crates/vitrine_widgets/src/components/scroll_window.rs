//! Window scroll direction tracking
//!
//! [`ScrollWindow`] turns raw scroll offsets into [`ScrollWindowEvent`]s on a
//! shared channel. Listeners such as [`HeaderScroll`](super::HeaderScroll)
//! react to the direction without tracking the previous offset themselves.

use serde::{Deserialize, Serialize};
use vitrine_core::EventChannel;

/// Direction of the latest scroll relative to the previous sample
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// First sample, nothing to compare with
    #[default]
    None,
    Up,
    Down,
}

/// Published on every scroll sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollWindowEvent {
    pub direct_scroll: ScrollDirection,
    pub scroll_y: f32,
}

#[derive(Debug, Default)]
pub struct ScrollWindow {
    prev_scroll_y: Option<f32>,
    channel: EventChannel<ScrollWindowEvent>,
}

impl ScrollWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel carrying this window's scroll events
    pub fn channel(&self) -> EventChannel<ScrollWindowEvent> {
        self.channel.clone()
    }

    pub fn prev_scroll_y(&self) -> Option<f32> {
        self.prev_scroll_y
    }

    /// Record a scroll sample and publish it
    pub fn on_scroll(&mut self, scroll_y: f32) -> ScrollWindowEvent {
        let direct_scroll = match self.prev_scroll_y {
            None => ScrollDirection::None,
            Some(prev) if scroll_y > prev => ScrollDirection::Down,
            Some(_) => ScrollDirection::Up,
        };
        self.prev_scroll_y = Some(scroll_y);

        let event = ScrollWindowEvent {
            direct_scroll,
            scroll_y,
        };
        tracing::trace!(?direct_scroll, scroll_y, "scroll");
        self.channel.emit(&event);
        event
    }
}
