//! Accordion group ("spollers")
//!
//! Coordinates every not-yet-bound `details` element under a container.
//! Behaviour is configured from attributes on the container:
//!
//! - `data-spollers="768, max"` - responsive rule: the group is enabled at or
//!   below 768px (`max`) or at or above it (`min`) and disabled otherwise.
//!   Without a rule the group is permanently enabled.
//! - `data-spollers-one` - exclusive: opening one item shrinks the others
//! - `data-spoller-close` - a click outside the group collapses every item
//!
//! An enabled group starts collapsed and carries `data-spollers-minimize`. A
//! disabled group expands every item and swallows summary clicks.

use smallvec::SmallVec;
use std::str::FromStr;
use thiserror::Error;

use vitrine_animation::SchedulerHandle;
use vitrine_core::{EventChannel, Mailbox};
use vitrine_layout::{Document, NodeId};

use super::accordion::{Accordion, AccordionOptions, DisclosureChange, INIT_ATTR};

pub const SPOLLERS_ATTR: &str = "data-spollers";
pub const EXCLUSIVE_ATTR: &str = "data-spollers-one";
pub const CLOSE_OUTSIDE_ATTR: &str = "data-spoller-close";
pub const MINIMIZE_ATTR: &str = "data-spollers-minimize";

/// A click anywhere in the document, published by the page
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentClick {
    /// Topmost node under the pointer
    pub target: NodeId,
    /// `target` followed by its ancestors
    pub path: SmallVec<[NodeId; 8]>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Responsive rule parse errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupConfigError {
    #[error("invalid breakpoint '{0}'")]
    InvalidBreakpoint(String),

    #[error("unknown bound '{0}', expected 'min' or 'max'")]
    UnknownBound(String),

    #[error("expected '<breakpoint>, <min|max>', got {0} values")]
    Arity(usize),
}

/// Which side of the breakpoint enables the group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponsiveBound {
    /// Enabled when the viewport is at least the breakpoint
    Min,
    /// Enabled when the viewport is at most the breakpoint
    Max,
}

impl FromStr for ResponsiveBound {
    type Err = GroupConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(ResponsiveBound::Min),
            "max" => Ok(ResponsiveBound::Max),
            other => Err(GroupConfigError::UnknownBound(other.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResponsiveRule {
    pub breakpoint_px: f32,
    pub bound: ResponsiveBound,
}

impl ResponsiveRule {
    /// Parse a `data-spollers` value
    ///
    /// An empty or single value means "no rule".
    pub fn parse(value: &str) -> Result<Option<Self>, GroupConfigError> {
        let parts: SmallVec<[&str; 2]> = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [] | [_] => Ok(None),
            [breakpoint, bound] => {
                let breakpoint_px = breakpoint
                    .parse::<f32>()
                    .ok()
                    .filter(|bp| bp.is_finite() && *bp >= 0.0)
                    .ok_or_else(|| GroupConfigError::InvalidBreakpoint((*breakpoint).to_owned()))?;
                Ok(Some(Self {
                    breakpoint_px,
                    bound: bound.parse()?,
                }))
            }
            more => Err(GroupConfigError::Arity(more.len())),
        }
    }

    /// Check if `viewport_width` lies on the enabling side (boundary
    /// included for both bounds)
    pub fn enables_at(&self, viewport_width: f32) -> bool {
        match self.bound {
            ResponsiveBound::Max => viewport_width <= self.breakpoint_px,
            ResponsiveBound::Min => viewport_width >= self.breakpoint_px,
        }
    }
}

/// Group behaviour read from the container's attributes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupConfig {
    pub exclusive: bool,
    pub close_on_outside_click: bool,
    pub responsive: Option<ResponsiveRule>,
}

impl GroupConfig {
    pub fn from_element(doc: &Document, node: NodeId) -> Self {
        let responsive = match doc.attr(node, SPOLLERS_ATTR).map(ResponsiveRule::parse) {
            Some(Ok(rule)) => rule,
            Some(Err(err)) => {
                tracing::warn!(?node, %err, "ignoring malformed data-spollers");
                None
            }
            None => None,
        };
        Self {
            exclusive: doc.has_attr(node, EXCLUSIVE_ATTR),
            close_on_outside_click: doc.has_attr(node, CLOSE_OUTSIDE_ATTR),
            responsive,
        }
    }
}

/// Last side of the breakpoint the group was configured for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum ViewportSide {
    #[default]
    Unset,
    Inside,
    Outside,
}

// ============================================================================
// Group
// ============================================================================

/// A set of accordions under one container
#[derive(Debug)]
pub struct AccordionGroup {
    node: NodeId,
    items: Vec<Accordion>,
    config: GroupConfig,
    enabled: bool,
    side: ViewportSide,
    /// Items publish their completed transitions here
    changes: EventChannel<DisclosureChange>,
    /// Page-wide click channel
    clicks: EventChannel<DocumentClick>,
    /// Held while enabled with outside-click collapse configured
    state_listener: Option<Mailbox<DisclosureChange>>,
    /// Held while an item is open and outside clicks should collapse
    outside_watcher: Option<Mailbox<DocumentClick>>,
}

impl AccordionGroup {
    /// Bind every unbound `details` under `node` and apply the
    /// configuration for the current viewport width
    pub fn new(
        doc: &mut Document,
        node: NodeId,
        scheduler: SchedulerHandle,
        options: AccordionOptions,
        clicks: EventChannel<DocumentClick>,
        viewport_width: f32,
    ) -> Option<Self> {
        if !doc.exists(node) {
            return None;
        }

        let changes = EventChannel::new();
        let candidates: Vec<NodeId> = doc
            .descendants(node)
            .into_iter()
            .filter(|&d| doc.tag(d) == Some("details") && !doc.has_attr(d, INIT_ATTR))
            .collect();
        let items: Vec<Accordion> = candidates
            .into_iter()
            .filter_map(|d| {
                Accordion::bind(doc, d, scheduler.clone(), options.clone(), changes.clone())
            })
            .collect();

        let config = GroupConfig::from_element(doc, node);
        tracing::debug!(?node, items = items.len(), ?config, "accordion group bound");

        let mut group = Self {
            node,
            items,
            config,
            enabled: false,
            side: ViewportSide::Unset,
            changes,
            clicks,
            state_listener: None,
            outside_watcher: None,
        };
        group.enable(doc);
        group.on_resize(doc, viewport_width);
        Some(group)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn items(&self) -> &[Accordion] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Accordion] {
        &mut self.items
    }

    pub fn item(&self, node: NodeId) -> Option<&Accordion> {
        self.items.iter().find(|item| item.node() == node)
    }

    /// Channel the items publish their completed transitions on
    pub fn changes(&self) -> &EventChannel<DisclosureChange> {
        &self.changes
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_watching_outside_clicks(&self) -> bool {
        self.outside_watcher.is_some()
    }

    /// Collapse everything and start intercepting summary clicks
    pub fn enable(&mut self, doc: &mut Document) {
        self.shrink_all(doc);
        doc.set_attr(self.node, MINIMIZE_ATTR, "");
        self.enabled = true;
        if self.config.close_on_outside_click && self.state_listener.is_none() {
            self.state_listener = Some(self.changes.mailbox());
        }
        tracing::debug!(node = ?self.node, "accordion group enabled");
    }

    /// Expand everything and ignore summary clicks
    pub fn disable(&mut self, doc: &mut Document) {
        self.expand_all(doc);
        doc.remove_attr(self.node, MINIMIZE_ATTR);
        self.enabled = false;
        self.state_listener = None;
        self.outside_watcher = None;
        tracing::debug!(node = ?self.node, "accordion group disabled");
    }

    pub fn shrink_all(&mut self, doc: &mut Document) {
        for item in &mut self.items {
            item.shrink(doc);
        }
    }

    pub fn expand_all(&mut self, doc: &mut Document) {
        for item in &mut self.items {
            item.open(doc);
        }
    }

    /// Apply the responsive rule for a new viewport width
    ///
    /// Only a change of side re-applies the configuration.
    pub fn on_resize(&mut self, doc: &mut Document, viewport_width: f32) {
        let Some(rule) = self.config.responsive else {
            return;
        };
        let side = if rule.enables_at(viewport_width) {
            ViewportSide::Inside
        } else {
            ViewportSide::Outside
        };
        if side == self.side {
            return;
        }
        self.side = side;
        match side {
            ViewportSide::Inside => self.enable(doc),
            ViewportSide::Outside => self.disable(doc),
            ViewportSide::Unset => {}
        }
    }

    /// Route a click inside the document
    ///
    /// Returns true if the click landed on a summary inside this group, in
    /// which case the group consumed it.
    pub fn on_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let summary = std::iter::once(target)
            .chain(doc.ancestors(target))
            .take_while(|&n| n != self.node)
            .find(|&n| doc.tag(n) == Some("summary"));
        let Some(summary) = summary else {
            return false;
        };
        if !doc.contains(self.node, summary) {
            return false;
        }
        // Summaries of details the group does not own belong to their own accordion
        let Some(index) = self.items.iter().position(|item| item.summary() == summary) else {
            return false;
        };
        if !self.enabled {
            tracing::trace!(node = ?self.node, "group disabled; summary click swallowed");
            return true;
        }
        if self.config.exclusive {
            for (i, item) in self.items.iter_mut().enumerate() {
                if i != index {
                    item.shrink(doc);
                }
            }
        }
        self.items[index].on_summary_click(doc);
        true
    }

    /// Per-frame step for every item, then process published changes and
    /// pending document clicks
    ///
    /// Returns true while any item is animating.
    pub fn update(&mut self, doc: &mut Document) -> bool {
        let mut animating = false;
        for item in &mut self.items {
            animating |= item.update(doc);
        }
        self.flush(doc);
        animating
    }

    /// Process queued state changes and document clicks
    pub fn flush(&mut self, doc: &mut Document) {
        let opened = self
            .state_listener
            .as_ref()
            .is_some_and(|listener| listener.drain().iter().any(|change| change.open));
        if opened && self.outside_watcher.is_none() {
            tracing::debug!(node = ?self.node, "watching for outside clicks");
            self.outside_watcher = Some(self.clicks.mailbox());
        }

        let outside = self.outside_watcher.as_ref().is_some_and(|watcher| {
            watcher
                .drain()
                .iter()
                .any(|click| !click.path.contains(&self.node))
        });
        if outside {
            tracing::debug!(node = ?self.node, "outside click; collapsing group");
            self.shrink_all(doc);
            self.outside_watcher = None;
        }

        let any_open = self
            .items
            .iter()
            .any(|item| item.is_open() || item.is_expanding());
        if !any_open {
            self.outside_watcher = None;
        }
    }
}
