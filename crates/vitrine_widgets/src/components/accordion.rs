//! Accordion: animated expand/collapse of a `details` element
//!
//! The element's height is animated between the summary-only height and the
//! full summary + content height. During an animation the element carries a
//! fixed height and hidden overflow; both are cleared when it completes.
//!
//! The lifecycle is an explicit [`DisclosureState`] with a pure transition
//! table. Starting a transition while another one runs cancels the old
//! animation first, so an accordion is never expanding and closing at once.
//!
//! # Example
//!
//! ```rust
//! use vitrine_animation::AnimationScheduler;
//! use vitrine_core::EventChannel;
//! use vitrine_layout::prelude::*;
//! use vitrine_widgets::prelude::*;
//!
//! let mut doc = Document::new(800.0, 600.0);
//! let root = doc.root();
//! let details = doc.append_element(
//!     root,
//!     Element::new("details")
//!         .child(Element::new("summary").size(400.0, 40.0))
//!         .child(Element::new("div").size(400.0, 160.0)),
//! );
//!
//! let scheduler = AnimationScheduler::new();
//! let changes = EventChannel::new();
//! let mut accordion = Accordion::bind(
//!     &mut doc,
//!     details,
//!     scheduler.handle(),
//!     AccordionOptions::default(),
//!     changes,
//! )
//! .unwrap();
//!
//! accordion.open(&mut doc);
//! loop {
//!     scheduler.tick(16.0);
//!     if !accordion.update(&mut doc) {
//!         break;
//!     }
//! }
//! assert!(accordion.is_open());
//! assert_eq!(doc.offset_height(details), 200.0);
//! ```

use vitrine_animation::{AnimatedTween, Easing, SchedulerHandle, Tween};
use vitrine_core::fsm::{StateMachine, Transition};
use vitrine_core::EventChannel;
use vitrine_layout::{Document, NodeId};

/// Attribute marking an element already bound to an accordion
pub const INIT_ATTR: &str = "data-detail-init";
/// Attribute that disables user toggling
pub const DISABLED_ATTR: &str = "data-disabled";

// ============================================================================
// State machine
// ============================================================================

/// Disclosure lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DisclosureState {
    #[default]
    Closed,
    Expanding,
    Open,
    Closing,
}

/// Inputs to the disclosure state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisclosureEvent {
    OpenRequested,
    ShrinkRequested,
    AnimationFinished,
}

/// Work the accordion performs after a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisclosureEffect {
    /// Stop the running height animation
    CancelAnimation,
    /// Lock the current height, force `open`, animate on the next frame
    BeginExpand,
    /// Animate down to the summary height
    BeginShrink,
    /// Settle the element and publish the change
    Commit { open: bool },
}

impl StateMachine for DisclosureState {
    type Event = DisclosureEvent;
    type Effect = DisclosureEffect;

    fn transition(self, event: DisclosureEvent) -> Option<Transition<Self, DisclosureEffect>> {
        use DisclosureEffect::*;
        use DisclosureEvent::*;
        use DisclosureState::*;

        match (self, event) {
            (Closed, OpenRequested) => Some(Transition::to(Expanding).with(BeginExpand)),
            (Closing, OpenRequested) => Some(
                Transition::to(Expanding)
                    .with(CancelAnimation)
                    .with(BeginExpand),
            ),
            (Open, ShrinkRequested) => Some(Transition::to(Closing).with(BeginShrink)),
            (Expanding, ShrinkRequested) => Some(
                Transition::to(Closing)
                    .with(CancelAnimation)
                    .with(BeginShrink),
            ),
            (Expanding, AnimationFinished) => {
                Some(Transition::to(Open).with(Commit { open: true }))
            }
            (Closing, AnimationFinished) => {
                Some(Transition::to(Closed).with(Commit { open: false }))
            }
            // Open/Expanding ignore open; Closed/Closing ignore shrink
            _ => None,
        }
    }
}

impl DisclosureState {
    pub fn is_transient(self) -> bool {
        matches!(self, DisclosureState::Expanding | DisclosureState::Closing)
    }
}

// ============================================================================
// Accordion
// ============================================================================

/// Published whenever an accordion completes a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisclosureChange {
    /// The `details` element
    pub node: NodeId,
    pub open: bool,
}

/// Accordion animation settings
#[derive(Clone, Debug, PartialEq)]
pub struct AccordionOptions {
    pub duration_ms: f32,
    pub easing: Easing,
}

impl Default for AccordionOptions {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            easing: Easing::EaseOut,
        }
    }
}

/// The animation slot of a transient accordion
#[derive(Debug)]
enum ActiveAnimation {
    /// Expansion requested; the target height is measured once the frame
    /// counter moves past `requested_at`
    AwaitingFrame { requested_at: u64 },
    Running(AnimatedTween),
}

/// Animated disclosure bound to one `details` element
#[derive(Debug)]
pub struct Accordion {
    node: NodeId,
    summary: NodeId,
    state: DisclosureState,
    /// `Some` exactly while the state is transient
    active: Option<ActiveAnimation>,
    disabled: bool,
    options: AccordionOptions,
    scheduler: SchedulerHandle,
    changes: EventChannel<DisclosureChange>,
}

impl Accordion {
    /// Bind to a `details` element with a `summary` child
    ///
    /// Completed transitions are published on `changes`. Returns `None` for
    /// any other element.
    pub fn bind(
        doc: &mut Document,
        node: NodeId,
        scheduler: SchedulerHandle,
        options: AccordionOptions,
        changes: EventChannel<DisclosureChange>,
    ) -> Option<Self> {
        if doc.tag(node) != Some("details") {
            tracing::debug!(?node, "accordion: not a details element");
            return None;
        }
        let Some(summary) = doc
            .children(node)
            .iter()
            .copied()
            .find(|&c| doc.tag(c) == Some("summary"))
        else {
            tracing::debug!(?node, "accordion: details without summary");
            return None;
        };

        let state = if doc.has_attr(node, "open") {
            DisclosureState::Open
        } else {
            DisclosureState::Closed
        };
        doc.set_attr(node, INIT_ATTR, "");
        tracing::debug!(?node, ?state, "accordion bound");

        Some(Self {
            node,
            summary,
            state,
            active: None,
            disabled: false,
            options,
            scheduler,
            changes,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn summary(&self) -> NodeId {
        self.summary
    }

    pub fn state(&self) -> DisclosureState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DisclosureState::Open
    }

    pub fn is_expanding(&self) -> bool {
        self.state == DisclosureState::Expanding
    }

    pub fn is_closing(&self) -> bool {
        self.state == DisclosureState::Closing
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Check if user toggles are ignored (flag or `data-disabled`)
    pub fn is_disabled(&self, doc: &Document) -> bool {
        self.disabled || doc.has_attr(self.node, DISABLED_ATTR)
    }

    /// Expand; no-op when open or already expanding
    pub fn open(&mut self, doc: &mut Document) {
        self.dispatch(doc, DisclosureEvent::OpenRequested);
    }

    /// Collapse; no-op when closed or already closing
    pub fn shrink(&mut self, doc: &mut Document) {
        self.dispatch(doc, DisclosureEvent::ShrinkRequested);
    }

    /// Open when closed or closing, shrink when open or expanding
    pub fn toggle(&mut self, doc: &mut Document) {
        match self.state {
            DisclosureState::Closed | DisclosureState::Closing => self.open(doc),
            DisclosureState::Open | DisclosureState::Expanding => self.shrink(doc),
        }
    }

    /// User click on the summary
    pub fn on_summary_click(&mut self, doc: &mut Document) {
        if self.is_disabled(doc) {
            tracing::debug!(node = ?self.node, "accordion disabled; click ignored");
            return;
        }
        self.toggle(doc);
    }

    /// Per-frame step: start a pending expansion, apply the animated height
    /// and detect completion
    ///
    /// Returns true while an animation is still in progress.
    pub fn update(&mut self, doc: &mut Document) -> bool {
        match self.active.as_ref() {
            None => false,
            Some(ActiveAnimation::AwaitingFrame { requested_at }) => {
                if self.scheduler.is_alive() && self.scheduler.frame() <= *requested_at {
                    return true;
                }
                // `open` is already forced, so the natural height is the
                // summary plus the content
                let from = doc.offset_height(self.node);
                let to = doc.natural_height(self.node);
                self.active = Some(ActiveAnimation::Running(self.start_tween(from, to)));
                true
            }
            Some(ActiveAnimation::Running(tween)) => {
                let height = tween.value();
                let finished = tween.is_finished();
                if let Some(style) = doc.style_mut(self.node) {
                    style.height = Some(height);
                }
                if finished {
                    self.dispatch(doc, DisclosureEvent::AnimationFinished);
                }
                !finished
            }
        }
    }

    fn dispatch(&mut self, doc: &mut Document, event: DisclosureEvent) {
        let Some(step) = self.state.transition(event) else {
            tracing::trace!(node = ?self.node, state = ?self.state, ?event, "accordion: ignored");
            return;
        };
        tracing::debug!(node = ?self.node, from = ?self.state, to = ?step.state, "accordion transition");
        self.state = step.state;
        for effect in step.effects {
            self.apply(doc, effect);
        }
    }

    fn apply(&mut self, doc: &mut Document, effect: DisclosureEffect) {
        match effect {
            DisclosureEffect::CancelAnimation => {
                if let Some(ActiveAnimation::Running(mut tween)) = self.active.take() {
                    tween.cancel();
                }
            }
            DisclosureEffect::BeginExpand => {
                let locked = doc.offset_height(self.node);
                if let Some(style) = doc.style_mut(self.node) {
                    style.overflow_hidden = true;
                    style.height = Some(locked);
                }
                doc.set_attr(self.node, "open", "");
                self.active = Some(ActiveAnimation::AwaitingFrame {
                    requested_at: self.scheduler.frame(),
                });
            }
            DisclosureEffect::BeginShrink => {
                let from = doc.offset_height(self.node);
                let to = doc.offset_height(self.summary);
                if let Some(style) = doc.style_mut(self.node) {
                    style.overflow_hidden = true;
                    style.height = Some(from);
                }
                self.active = Some(ActiveAnimation::Running(self.start_tween(from, to)));
            }
            DisclosureEffect::Commit { open } => {
                self.active = None;
                if open {
                    doc.set_attr(self.node, "open", "");
                } else {
                    doc.remove_attr(self.node, "open");
                }
                if let Some(style) = doc.style_mut(self.node) {
                    style.height = None;
                    style.overflow_hidden = false;
                }
                self.changes.emit(&DisclosureChange {
                    node: self.node,
                    open,
                });
            }
        }
    }

    fn start_tween(&self, from: f32, to: f32) -> AnimatedTween {
        let tween = Tween::new(
            from,
            to,
            self.options.duration_ms,
            self.options.easing,
        );
        AnimatedTween::start(self.scheduler.clone(), tween)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_animation::AnimationScheduler;
    use vitrine_core::Mailbox;
    use vitrine_layout::Element;

    use DisclosureEvent::*;
    use DisclosureState::*;

    struct Fixture {
        doc: Document,
        scheduler: AnimationScheduler,
        accordion: Accordion,
        changes: Mailbox<DisclosureChange>,
    }

    fn fixture(open: bool) -> Fixture {
        let mut doc = Document::new(800.0, 600.0);
        let root = doc.root();
        let mut details = Element::new("details")
            .child(Element::new("summary").size(400.0, 40.0))
            .child(Element::new("div").size(400.0, 160.0));
        if open {
            details = details.attr("open", "");
        }
        let node = doc.append_element(root, details);

        let scheduler = AnimationScheduler::new();
        let channel = EventChannel::new();
        let changes = channel.mailbox();
        let accordion = Accordion::bind(
            &mut doc,
            node,
            scheduler.handle(),
            AccordionOptions::default(),
            channel,
        )
        .unwrap();

        Fixture {
            doc,
            scheduler,
            accordion,
            changes,
        }
    }

    impl Fixture {
        /// Run 16 ms frames until the accordion settles; returns frames run
        fn settle(&mut self) -> usize {
            for frame in 1..=100 {
                self.scheduler.tick(16.0);
                if !self.accordion.update(&mut self.doc) {
                    return frame;
                }
            }
            panic!("accordion never settled");
        }

        fn frames(&mut self, n: usize) {
            for _ in 0..n {
                self.scheduler.tick(16.0);
                self.accordion.update(&mut self.doc);
            }
        }

        fn height_override(&self) -> Option<f32> {
            self.doc.style(self.accordion.node()).unwrap().height
        }
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(Closed.transition(OpenRequested).unwrap().state, Expanding);
        assert_eq!(Open.transition(ShrinkRequested).unwrap().state, Closing);
        assert_eq!(Expanding.transition(AnimationFinished).unwrap().state, Open);
        assert_eq!(Closing.transition(AnimationFinished).unwrap().state, Closed);

        let reverse = Closing.transition(OpenRequested).unwrap();
        assert_eq!(reverse.state, Expanding);
        assert_eq!(
            reverse.effects.as_slice(),
            &[DisclosureEffect::CancelAnimation, DisclosureEffect::BeginExpand]
        );

        // Idempotent requests
        assert!(Open.transition(OpenRequested).is_none());
        assert!(Expanding.transition(OpenRequested).is_none());
        assert!(Closed.transition(ShrinkRequested).is_none());
        assert!(Closing.transition(ShrinkRequested).is_none());
        assert!(Closed.transition(AnimationFinished).is_none());
    }

    #[test]
    fn test_bind_rejects_other_elements() {
        let mut doc = Document::new(800.0, 600.0);
        let root = doc.root();
        let div = doc.append_element(root, Element::new("div"));
        let bare = doc.append_element(root, Element::new("details"));
        let scheduler = AnimationScheduler::new();

        let options = AccordionOptions::default();
        assert!(
            Accordion::bind(&mut doc, div, scheduler.handle(), options.clone(), EventChannel::new())
                .is_none()
        );
        assert!(
            Accordion::bind(&mut doc, bare, scheduler.handle(), options, EventChannel::new())
                .is_none()
        );
        assert!(!doc.has_attr(bare, INIT_ATTR));
    }

    #[test]
    fn test_open_runs_full_animation() {
        let mut f = fixture(false);
        assert!(f.doc.has_attr(f.accordion.node(), INIT_ATTR));

        f.accordion.open(&mut f.doc);
        assert!(f.accordion.is_expanding());
        assert!(f.doc.has_attr(f.accordion.node(), "open"));
        assert_eq!(f.height_override(), Some(40.0));
        assert!(f.doc.style(f.accordion.node()).unwrap().overflow_hidden);

        f.frames(8);
        let mid = f.height_override().unwrap();
        assert!(mid > 40.0 && mid < 200.0, "mid-animation height {mid}");

        f.settle();
        assert!(f.accordion.is_open());
        assert_eq!(f.height_override(), None);
        assert!(!f.doc.style(f.accordion.node()).unwrap().overflow_hidden);
        assert_eq!(f.doc.offset_height(f.accordion.node()), 200.0);
        assert_eq!(
            f.changes.drain(),
            vec![DisclosureChange {
                node: f.accordion.node(),
                open: true
            }]
        );
        // Roughly one frame of measurement plus 300 ms of animation
        assert!(f.scheduler.now_ms() >= 300.0 && f.scheduler.now_ms() <= 340.0);
    }

    #[test]
    fn test_shrink_runs_full_animation() {
        let mut f = fixture(true);
        assert!(f.accordion.is_open());

        f.accordion.shrink(&mut f.doc);
        assert!(f.accordion.is_closing());
        assert_eq!(f.height_override(), Some(200.0));

        f.settle();
        assert_eq!(f.accordion.state(), Closed);
        assert!(!f.doc.has_attr(f.accordion.node(), "open"));
        assert_eq!(f.height_override(), None);
        assert_eq!(f.doc.offset_height(f.accordion.node()), 40.0);
        assert_eq!(f.changes.drain().len(), 1);
    }

    #[test]
    fn test_repeated_requests_are_idempotent() {
        let mut f = fixture(false);
        f.accordion.open(&mut f.doc);
        f.frames(2);
        assert_eq!(f.scheduler.tween_count(), 1);

        f.accordion.open(&mut f.doc);
        assert_eq!(f.scheduler.tween_count(), 1);
        f.settle();

        f.accordion.open(&mut f.doc);
        assert!(f.accordion.is_open());
        assert!(!f.accordion.is_animating());
        assert_eq!(f.height_override(), None);
        assert_eq!(f.changes.drain().len(), 1);
    }

    #[test]
    fn test_shrink_while_expanding_cancels_expansion() {
        let mut f = fixture(false);
        f.accordion.open(&mut f.doc);
        f.frames(5);
        let reached = f.height_override().unwrap();

        f.accordion.shrink(&mut f.doc);
        assert!(f.accordion.is_closing());
        assert!(!f.accordion.is_expanding());
        assert_eq!(f.height_override(), Some(reached));
        // The expansion tween is gone; only the shrink tween remains
        assert_eq!(f.scheduler.tween_count(), 1);

        f.settle();
        assert_eq!(f.accordion.state(), Closed);
        let changes = f.changes.drain();
        assert_eq!(changes.len(), 1);
        assert!(!changes[0].open);
    }

    #[test]
    fn test_open_while_closing_reverses() {
        let mut f = fixture(true);
        f.accordion.shrink(&mut f.doc);
        f.frames(5);
        let reached = f.height_override().unwrap();
        assert!(reached < 200.0);

        f.accordion.toggle(&mut f.doc);
        assert!(f.accordion.is_expanding());
        assert_eq!(f.height_override(), Some(reached));
        assert_eq!(f.scheduler.tween_count(), 0);

        f.settle();
        assert!(f.accordion.is_open());
        assert_eq!(
            f.changes.drain(),
            vec![DisclosureChange {
                node: f.accordion.node(),
                open: true
            }]
        );
    }

    #[test]
    fn test_shrink_before_first_frame() {
        let mut f = fixture(false);
        f.accordion.open(&mut f.doc);
        f.accordion.shrink(&mut f.doc);
        assert!(f.accordion.is_closing());

        f.settle();
        assert_eq!(f.accordion.state(), Closed);
        assert!(!f.doc.has_attr(f.accordion.node(), "open"));
        assert_eq!(f.changes.drain().len(), 1);
    }

    #[test]
    fn test_disabled_ignores_clicks_only() {
        let mut f = fixture(false);
        let node = f.accordion.node();
        f.doc.set_attr(node, DISABLED_ATTR, "");

        f.accordion.on_summary_click(&mut f.doc);
        assert_eq!(f.accordion.state(), Closed);

        f.accordion.open(&mut f.doc);
        assert!(f.accordion.is_expanding());

        f.doc.remove_attr(node, DISABLED_ATTR);
        f.accordion.set_disabled(true);
        f.accordion.on_summary_click(&mut f.doc);
        assert!(f.accordion.is_expanding());
    }

    #[test]
    fn test_never_expanding_and_closing() {
        let mut f = fixture(false);
        for step in 0..40 {
            if step % 3 == 0 {
                f.accordion.toggle(&mut f.doc);
            }
            f.frames(1);
            assert!(!(f.accordion.is_expanding() && f.accordion.is_closing()));
            assert_eq!(f.accordion.is_animating(), f.accordion.state().is_transient());
        }
    }
}
