//! The page runtime
//!
//! A [`Page`] owns the document, the animation scheduler and every widget
//! bound to the document. Hosts feed it platform [`Event`]s; the page turns
//! them into widget calls:
//!
//! | event | effect |
//! |---|---|
//! | resize | viewport update, responsive groups, slider visibility |
//! | scroll | scroll offset, scroll direction events, slider visibility |
//! | pointer down/move/up | focus changes, slider drags (through pointer capture) |
//! | click | [`DocumentClick`] broadcast, summaries, slider track clicks |
//! | text / Enter / Tab | slider text views |
//! | frame | scheduler tick, then every widget's `update` |
//!
//! # Example
//!
//! ```rust
//! use vitrine_app::prelude::*;
//!
//! let mut doc = Document::new(1024.0, 768.0);
//! let root = doc.root();
//! doc.append_element(
//!     root,
//!     Element::new("details")
//!         .child(Element::new("summary").size(400.0, 40.0))
//!         .child(Element::new("p").size(400.0, 80.0)),
//! );
//!
//! let mut page = Page::new(doc, VitrineConfig::default()).unwrap();
//! page.handle_event(Event::Input(InputEvent::Pointer(PointerEvent::Click { x: 5.0, y: 5.0 })));
//! for _ in 0..30 {
//!     page.handle_event(Event::Frame { dt_ms: 16.0 });
//! }
//! assert!(page.accordions()[0].is_open());
//! ```

use vitrine_animation::AnimationScheduler;
use vitrine_core::{EventChannel, Point};
use vitrine_layout::{Document, NodeId, Selector};
use vitrine_platform::{
    ControlFlow, Event, EventLoop, InputEvent, Key, KeyState, KeyboardEvent, PointerEvent,
    WindowEvent,
};
use vitrine_widgets::components::accordion::INIT_ATTR;
use vitrine_widgets::{
    Accordion, AccordionGroup, ContactForm, DisclosureChange, DocumentClick, FormStatus,
    HeaderScroll, MailTransport, RangeSlider, ScrollWindow,
};

use std::path::Path;

use crate::config::VitrineConfig;
use crate::error::{Result, VitrineError};

const FOCUSABLE_TAGS: [&str; 4] = ["input", "textarea", "select", "button"];

pub struct Page {
    doc: Document,
    scheduler: AnimationScheduler,
    config: VitrineConfig,
    clicks: EventChannel<DocumentClick>,
    groups: Vec<AccordionGroup>,
    /// Accordions outside any group
    accordions: Vec<Accordion>,
    accordion_changes: EventChannel<DisclosureChange>,
    sliders: Vec<RangeSlider>,
    forms: Vec<ContactForm>,
    scroll_window: ScrollWindow,
    header: Option<HeaderScroll>,
    busy: bool,
}

impl Page {
    /// Load the configuration at `path`, then bind like [`Page::new`]
    pub fn from_config_file(doc: Document, path: &Path) -> Result<Self> {
        let config =
            VitrineConfig::load(path).map_err(|err| VitrineError::Config(format!("{err:#}")))?;
        Self::new(doc, config)
    }

    /// Bind every widget the document and configuration call for
    pub fn new(mut doc: Document, config: VitrineConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|err| VitrineError::Config(format!("{err:#}")))?;
        let scheduler = AnimationScheduler::new();
        let clicks = EventChannel::new();
        let accordion_options = config.accordion.options();
        let viewport_width = doc.viewport().width;

        let group_selector: Selector = config.page.group_selector.parse()?;
        let group_nodes = doc.query_selector_all(doc.root(), &group_selector);
        let mut groups: Vec<AccordionGroup> = group_nodes
            .into_iter()
            .filter_map(|node| {
                AccordionGroup::new(
                    &mut doc,
                    node,
                    scheduler.handle(),
                    accordion_options.clone(),
                    clicks.clone(),
                    viewport_width,
                )
            })
            .collect();

        if config.page.open_first_group_item {
            if let Some(first) = groups.first_mut().and_then(|g| g.items_mut().first_mut()) {
                first.open(&mut doc);
            }
        }

        let accordion_changes = EventChannel::new();
        let standalone: Vec<NodeId> = doc
            .descendants(doc.root())
            .into_iter()
            .filter(|&n| doc.tag(n) == Some("details") && !doc.has_attr(n, INIT_ATTR))
            .collect();
        let accordions = standalone
            .into_iter()
            .filter_map(|node| {
                Accordion::bind(
                    &mut doc,
                    node,
                    scheduler.handle(),
                    accordion_options.clone(),
                    accordion_changes.clone(),
                )
            })
            .collect();

        let mut sliders = Vec::new();
        for slider in &config.sliders {
            let selector: Selector = slider.selector.parse()?;
            let options = slider.options();
            for node in doc.query_selector_all(doc.root(), &selector) {
                sliders.extend(RangeSlider::mount(&mut doc, node, &options));
            }
        }

        let form_selector: Selector = "form".parse()?;
        let forms = doc
            .query_selector_all(doc.root(), &form_selector)
            .into_iter()
            .filter_map(|node| ContactForm::bind(&doc, node, config.form.messages()))
            .collect();

        let scroll_window = ScrollWindow::new();
        let header = if config.header.enabled {
            HeaderScroll::bind(&doc, config.header.options(), &scroll_window.channel())
        } else {
            None
        };

        let mut page = Self {
            doc,
            scheduler,
            config,
            clicks,
            groups,
            accordions,
            accordion_changes,
            sliders,
            forms,
            scroll_window,
            header,
            busy: false,
        };
        page.check_visibility();

        tracing::info!(
            groups = page.groups.len(),
            accordions = page.accordions.len(),
            sliders = page.sliders.len(),
            forms = page.forms.len(),
            header = page.header.is_some(),
            "page ready"
        );
        Ok(page)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &VitrineConfig {
        &self.config
    }

    pub fn groups(&self) -> &[AccordionGroup] {
        &self.groups
    }

    pub fn accordions(&self) -> &[Accordion] {
        &self.accordions
    }

    pub fn sliders(&self) -> &[RangeSlider] {
        &self.sliders
    }

    pub fn forms(&self) -> &[ContactForm] {
        &self.forms
    }

    pub fn header(&self) -> Option<&HeaderScroll> {
        self.header.as_ref()
    }

    pub fn scroll_window(&self) -> &ScrollWindow {
        &self.scroll_window
    }

    /// Page-wide click broadcasts
    pub fn clicks(&self) -> &EventChannel<DocumentClick> {
        &self.clicks
    }

    /// Completed transitions of the standalone accordions
    pub fn accordion_changes(&self) -> &EventChannel<DisclosureChange> {
        &self.accordion_changes
    }

    /// Whether the last frame left animations or timers running
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    /// Drive the page from an event loop until it ends
    pub fn run<L: EventLoop>(&mut self, event_loop: L) -> Result<()> {
        event_loop.run(|event| self.handle_event(event))?;
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> ControlFlow {
        match event {
            Event::Window(WindowEvent::Resized { width, height }) => self.on_resize(width, height),
            Event::Window(WindowEvent::Scrolled { scroll_y }) => self.on_scroll(scroll_y),
            Event::Input(InputEvent::Pointer(pointer)) => self.on_pointer(pointer),
            Event::Input(InputEvent::Keyboard(keyboard)) => self.on_key(keyboard),
            Event::Input(InputEvent::Text { value }) => self.on_text(&value),
            Event::Frame { dt_ms } => self.on_frame(dt_ms),
        }
        ControlFlow::Continue
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        tracing::debug!(width, height, "resize");
        self.doc.set_viewport(width, height);
        for group in &mut self.groups {
            group.on_resize(&mut self.doc, width);
        }
        self.check_visibility();
    }

    fn on_scroll(&mut self, scroll_y: f32) {
        self.doc.set_scroll_y(scroll_y);
        self.scroll_window.on_scroll(self.doc.scroll_y());
        self.check_visibility();
    }

    fn check_visibility(&mut self) {
        for slider in &mut self.sliders {
            slider.on_visibility(&mut self.doc);
        }
    }

    fn on_pointer(&mut self, pointer: PointerEvent) {
        match pointer {
            PointerEvent::Down { pointer_id, x, y } => {
                let target = self.doc.hit_test(Point::new(x, y));
                let focusable = self
                    .doc
                    .tag(target)
                    .is_some_and(|tag| FOCUSABLE_TAGS.contains(&tag));
                self.focus(focusable.then_some(target));
                for slider in &mut self.sliders {
                    if slider.on_pointer_down(&mut self.doc, pointer_id, target, x) {
                        break;
                    }
                }
            }
            PointerEvent::Moved { pointer_id, x, .. } => {
                let capture = self.doc.pointer_capture(pointer_id);
                if let Some(slider) = capturing_slider(&mut self.sliders, capture) {
                    slider.on_pointer_move(&mut self.doc, pointer_id, x);
                }
            }
            PointerEvent::Up { pointer_id, .. } => {
                let capture = self.doc.pointer_capture(pointer_id);
                if let Some(slider) = capturing_slider(&mut self.sliders, capture) {
                    slider.on_pointer_up(&mut self.doc, pointer_id);
                }
            }
            PointerEvent::Click { x, y } => self.on_click(x, y),
        }
    }

    fn on_click(&mut self, x: f32, y: f32) {
        let target = self.doc.hit_test(Point::new(x, y));
        tracing::trace!(?target, x, y, "click");
        self.clicks.emit(&DocumentClick {
            target,
            path: self.doc.path(target),
        });

        let consumed = self
            .groups
            .iter_mut()
            .any(|group| group.on_click(&mut self.doc, target));

        if !consumed {
            let summary = std::iter::once(target)
                .chain(self.doc.ancestors(target))
                .find(|&n| self.doc.tag(n) == Some("summary"));
            if let Some(accordion) = summary.and_then(|summary| {
                self.accordions
                    .iter_mut()
                    .find(|accordion| accordion.summary() == summary)
            }) {
                accordion.on_summary_click(&mut self.doc);
            }

            for slider in &mut self.sliders {
                if slider.on_click(&mut self.doc, target, x) {
                    break;
                }
            }
        }

        for group in &mut self.groups {
            group.flush(&mut self.doc);
        }
    }

    fn on_key(&mut self, keyboard: KeyboardEvent) {
        if keyboard.state != KeyState::Pressed {
            return;
        }
        match keyboard.key {
            Key::Enter => {
                if let Some(focused) = self.doc.focused() {
                    self.commit_view(focused);
                }
            }
            Key::Tab | Key::Escape => self.focus(None),
            _ => {}
        }
    }

    fn on_text(&mut self, value: &str) {
        let Some(focused) = self.doc.focused() else {
            return;
        };
        self.doc.set_value(focused, value);
        for slider in &mut self.sliders {
            if slider.on_view_input(&mut self.doc, focused) {
                break;
            }
        }
    }

    /// Move focus; the element losing it commits its text
    fn focus(&mut self, target: Option<NodeId>) {
        let previous = self.doc.set_focus(target);
        if let Some(blurred) = previous.filter(|&p| Some(p) != target) {
            self.commit_view(blurred);
        }
    }

    fn commit_view(&mut self, node: NodeId) {
        for slider in &mut self.sliders {
            if slider.commit_view(&mut self.doc, node) {
                break;
            }
        }
    }

    fn on_frame(&mut self, dt_ms: f32) {
        let mut busy = self.scheduler.tick(dt_ms);
        let now = self.scheduler.now_ms();

        for group in &mut self.groups {
            busy |= group.update(&mut self.doc);
        }
        for accordion in &mut self.accordions {
            busy |= accordion.update(&mut self.doc);
        }
        for form in &mut self.forms {
            busy |= form.update(&mut self.doc, now);
        }
        if let Some(header) = &mut self.header {
            busy |= header.update(&mut self.doc, now);
        }
        self.busy = busy;
    }

    // ========================================================================
    // Forms
    // ========================================================================

    /// Submit the form bound to `node` through `transport`
    ///
    /// Returns `Ok(None)` if no form is bound to `node`. A failed send is
    /// shown in the form and returned as [`VitrineError::Mail`].
    pub async fn submit_form<T: MailTransport>(
        &mut self,
        node: NodeId,
        transport: &T,
    ) -> Result<Option<FormStatus>> {
        let now = self.scheduler.now_ms();
        let Some(form) = self.forms.iter_mut().find(|form| form.node() == node) else {
            return Ok(None);
        };
        let status = form.submit(&mut self.doc, transport, now).await?;
        Ok(Some(status))
    }

    /// HTTP transport for the configured mail endpoint
    #[cfg(feature = "network")]
    pub fn mail_transport(&self) -> vitrine_widgets::HttpMailTransport {
        vitrine_widgets::HttpMailTransport::new(self.config.form.endpoint.clone())
    }
}

fn capturing_slider(
    sliders: &mut [RangeSlider],
    capture: Option<NodeId>,
) -> Option<&mut RangeSlider> {
    let capture = capture?;
    sliders.iter_mut().find(|slider| slider.node() == capture)
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("nodes", &self.doc.len())
            .field("frame", &self.scheduler.frame())
            .field("groups", &self.groups.len())
            .field("accordions", &self.accordions.len())
            .field("sliders", &self.sliders.len())
            .field("forms", &self.forms.len())
            .field("header", &self.header.is_some())
            .finish()
    }
}
