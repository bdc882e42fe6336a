//! Scroll-dependent header classes
//!
//! Listens to [`ScrollWindowEvent`]s and toggles classes on the page header:
//!
//! - `header_scroll` once the page is scrolled past the start offset
//! - `header_scroll_down` / `header_scroll_up` for the last direction
//! - `header_scroll_stop` after scrolling has paused for a while
//!
//! Events are throttled; the header reacts to the first event of a burst
//! and then to the latest one when the throttle window closes.

use vitrine_core::{EventChannel, Mailbox, Throttle};
use vitrine_layout::{Document, NodeId, Selector};

use super::scroll_window::{ScrollDirection, ScrollWindowEvent};

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderScrollOptions {
    pub selector: String,
    pub class_scroll: String,
    pub class_scroll_down: String,
    pub class_scroll_up: String,
    pub class_scroll_stop: String,
    /// Quiet time before the stop class is added
    pub delay_stop_ms: f64,
    pub throttle_ms: f64,
    /// Scroll offset past which the header counts as scrolled; defaults to
    /// the header's own height
    pub start_scroll: Option<f32>,
}

impl Default for HeaderScrollOptions {
    fn default() -> Self {
        Self {
            selector: "header".into(),
            class_scroll: "header_scroll".into(),
            class_scroll_down: "header_scroll_down".into(),
            class_scroll_up: "header_scroll_up".into(),
            class_scroll_stop: "header_scroll_stop".into(),
            delay_stop_ms: 500.0,
            throttle_ms: 500.0,
            start_scroll: None,
        }
    }
}

#[derive(Debug)]
pub struct HeaderScroll {
    node: NodeId,
    options: HeaderScrollOptions,
    start_scroll: f32,
    events: Mailbox<ScrollWindowEvent>,
    throttle: Throttle<ScrollWindowEvent>,
    stop_at: Option<f64>,
}

impl HeaderScroll {
    /// Attach to the first element matching `options.selector`
    pub fn bind(
        doc: &Document,
        options: HeaderScrollOptions,
        scroll: &EventChannel<ScrollWindowEvent>,
    ) -> Option<Self> {
        let selector = match options.selector.parse::<Selector>() {
            Ok(selector) => selector,
            Err(err) => {
                tracing::warn!(selector = %options.selector, %err, "header scroll: bad selector");
                return None;
            }
        };
        let Some(node) = doc.query_selector(doc.root(), &selector) else {
            tracing::debug!(selector = %options.selector, "header scroll: no header");
            return None;
        };
        let start_scroll = options
            .start_scroll
            .unwrap_or_else(|| doc.offset_height(node));
        tracing::debug!(?node, start_scroll, "header scroll bound");

        Some(Self {
            node,
            start_scroll,
            events: scroll.mailbox(),
            throttle: Throttle::new(options.throttle_ms),
            stop_at: None,
            options,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn start_scroll(&self) -> f32 {
        self.start_scroll
    }

    /// Apply queued scroll events and timers
    ///
    /// Returns true while a trailing event or the stop timer is pending.
    pub fn update(&mut self, doc: &mut Document, now_ms: f64) -> bool {
        for event in self.events.drain() {
            if let Some(event) = self.throttle.call(now_ms, event) {
                self.apply(doc, event, now_ms);
            }
        }
        if let Some(event) = self.throttle.poll(now_ms) {
            self.apply(doc, event, now_ms);
        }
        if self.stop_at.is_some_and(|at| now_ms >= at) {
            self.stop_at = None;
            doc.add_class(self.node, &self.options.class_scroll_stop);
        }
        self.stop_at.is_some() || self.throttle.has_pending()
    }

    fn apply(&mut self, doc: &mut Document, event: ScrollWindowEvent, now_ms: f64) {
        let o = &self.options;
        self.stop_at = None;
        doc.remove_class(self.node, &o.class_scroll_stop);

        if event.scroll_y > self.start_scroll {
            doc.add_class(self.node, &o.class_scroll);
            match event.direct_scroll {
                ScrollDirection::Down => {
                    doc.add_class(self.node, &o.class_scroll_down);
                    doc.remove_class(self.node, &o.class_scroll_up);
                }
                ScrollDirection::Up => {
                    doc.remove_class(self.node, &o.class_scroll_down);
                    doc.add_class(self.node, &o.class_scroll_up);
                }
                ScrollDirection::None => {}
            }
            self.stop_at = Some(now_ms + o.delay_stop_ms);
        } else {
            for class in [
                &o.class_scroll,
                &o.class_scroll_up,
                &o.class_scroll_down,
                &o.class_scroll_stop,
            ] {
                doc.remove_class(self.node, class);
            }
        }
    }
}
