//! Range slider with any number of thumbs
//!
//! Mounted on a container holding one `input` per thumb. Mounting builds the
//! visual parts around the inputs:
//!
//! ```text
//! div.range-slider
//! ├── div.range-slider__rail
//! ├── div.range-slider__track          left/width span first..last thumb
//! ├── div.range-slider__thumb[data-index=0] > input
//! └── div.range-slider__thumb[data-index=1] > input
//! ```
//!
//! The domain (`min`, `max`, `step`) comes from the inputs' attributes,
//! defaulting to 0 / 100 / 1. Values always sit on the step grid after a
//! drag or click and stay non-decreasing across thumbs: dragging a thumb
//! into its neighbour parks it at the neighbour's value and hands the drag
//! over to the neighbour.
//!
//! The slider only becomes interactive after [`RangeSlider::init`], which
//! the page runs the first time the slider scrolls into view (a slider
//! inside a collapsed container has no width to measure before that).
//!
//! Optional view elements mirror each value, thousands-separated. Editable
//! views (`input`) also accept typed values, committed on blur or Enter.

use vitrine_core::Rect;
use vitrine_layout::{Document, NodeId, Selector};

use crate::number_format::{format_number, format_typed, parse_number};

pub const RAIL_CLASS: &str = "range-slider__rail";
pub const TRACK_CLASS: &str = "range-slider__track";
pub const THUMB_CLASS: &str = "range-slider__thumb";
pub const ACTIVE_CLASS: &str = "range-slider_active";

/// Slider mount options
#[derive(Clone, Debug, PartialEq)]
pub struct SliderOptions {
    /// One selector per thumb for the element mirroring its value
    pub views: Vec<String>,
    /// Thumb box size in pixels, centred on the value position
    pub thumb_size: f32,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            views: Vec::new(),
            thumb_size: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Thumb {
    node: NodeId,
    input: NodeId,
}

#[derive(Clone, Debug)]
struct ViewBinding {
    node: NodeId,
    editable: bool,
    /// Text restored when a typed value is rejected
    committed: String,
}

/// An in-progress drag, from pointer-down to pointer-up
#[derive(Clone, Copy, Debug)]
struct DragSession {
    pointer_id: u32,
    /// Thumb currently following the pointer; changes on hand-off
    index: usize,
    slider_left: f32,
    width: f32,
}

#[derive(Debug)]
pub struct RangeSlider {
    node: NodeId,
    rail: NodeId,
    track: NodeId,
    thumbs: Vec<Thumb>,
    views: Vec<Option<ViewBinding>>,
    min: f64,
    max: f64,
    step: f64,
    /// Decimal places of the step grid, used to strip float noise
    precision: i32,
    values: Vec<f64>,
    initialized: bool,
    drag: Option<DragSession>,
    /// Set by pointer-up; the click that ends a drag is not a track click
    suppress_click: bool,
}

impl RangeSlider {
    /// Build rail, track and thumbs inside `node`
    ///
    /// Returns `None` if `node` holds no inputs or its domain is invalid
    /// (`min >= max` or `step <= 0`).
    pub fn mount(doc: &mut Document, node: NodeId, options: &SliderOptions) -> Option<Self> {
        if !doc.exists(node) {
            return None;
        }
        let inputs: Vec<NodeId> = doc
            .descendants(node)
            .into_iter()
            .filter(|&n| doc.tag(n) == Some("input"))
            .collect();
        if inputs.is_empty() {
            tracing::debug!(?node, "range slider: no inputs");
            return None;
        }

        let (mut min, mut max, mut step) = (0.0, 100.0, 1.0);
        for &input in &inputs {
            let read = |name| doc.attr(input, name).and_then(parse_number);
            min = read("min").unwrap_or(min);
            max = read("max").unwrap_or(max);
            step = read("step").unwrap_or(step);
        }
        if min >= max || step <= 0.0 {
            tracing::warn!(?node, min, max, step, "range slider: invalid domain");
            return None;
        }

        let height = doc.frame(node).height();
        let rail = Self::create_part(doc, node, RAIL_CLASS, height);
        if let Some(style) = doc.style_mut(rail) {
            style.width_percent = Some(100.0);
        }
        let track = Self::create_part(doc, node, TRACK_CLASS, height);

        let size = options.thumb_size;
        let thumbs: Vec<Thumb> = inputs
            .iter()
            .enumerate()
            .map(|(index, &input)| {
                let thumb = Self::create_part(doc, node, THUMB_CLASS, size);
                doc.set_attr(thumb, "data-index", &index.to_string());
                doc.set_frame(
                    thumb,
                    Rect::new(
                        -size / 2.0,
                        (height - size) / 2.0,
                        size,
                        size,
                    ),
                );
                doc.append_child(thumb, input);
                if let Some(style) = doc.style_mut(input) {
                    style.position_absolute = true;
                }
                Thumb { node: thumb, input }
            })
            .collect();

        let views = (0..thumbs.len())
            .map(|index| {
                let selector = options.views.get(index)?;
                let view = match selector.parse::<Selector>() {
                    Ok(selector) => doc.query_selector(doc.root(), &selector),
                    Err(err) => {
                        tracing::warn!(%selector, %err, "range slider: bad view selector");
                        None
                    }
                }?;
                Some(ViewBinding {
                    node: view,
                    editable: doc.tag(view) == Some("input"),
                    committed: String::new(),
                })
            })
            .collect();

        let precision = decimals(step).max(decimals(min));
        tracing::debug!(?node, thumbs = thumbs.len(), min, max, step, "range slider mounted");

        Some(Self {
            node,
            rail,
            track,
            values: vec![min; thumbs.len()],
            thumbs,
            views,
            min,
            max,
            step,
            precision,
            initialized: false,
            drag: None,
            suppress_click: false,
        })
    }

    fn create_part(doc: &mut Document, parent: NodeId, class: &str, height: f32) -> NodeId {
        let part = doc.create_element("div");
        doc.add_class(part, class);
        doc.set_frame(part, Rect::new(0.0, 0.0, 0.0, height));
        if let Some(style) = doc.style_mut(part) {
            style.position_absolute = true;
        }
        doc.append_child(parent, part);
        part
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn rail(&self) -> NodeId {
        self.rail
    }

    pub fn track(&self) -> NodeId {
        self.track
    }

    pub fn thumb(&self, index: usize) -> Option<NodeId> {
        self.thumbs.get(index).map(|t| t.node)
    }

    pub fn thumb_count(&self) -> usize {
        self.thumbs.len()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Check if `node` belongs to this slider's subtree
    pub fn contains(&self, doc: &Document, node: NodeId) -> bool {
        doc.contains(self.node, node)
    }

    /// Check if `node` is one of this slider's view elements
    pub fn has_view(&self, node: NodeId) -> bool {
        self.view_index(node).is_some()
    }

    // ========================================================================
    // Initialisation
    // ========================================================================

    /// Initialise once the slider is in the viewport
    ///
    /// Returns true if this call initialised it.
    pub fn on_visibility(&mut self, doc: &mut Document) -> bool {
        if self.initialized || !doc.is_in_viewport(self.node) {
            return false;
        }
        self.init(doc);
        true
    }

    /// Read each thumb's value from its input and render
    pub fn init(&mut self, doc: &mut Document) {
        let mut floor = self.min;
        for index in 0..self.thumbs.len() {
            let raw = parse_number(doc.value(self.thumbs[index].input)).unwrap_or(self.min);
            let value = self.snap(raw).max(floor);
            floor = value;
            self.write_value(doc, index, value);
        }
        self.sync_track(doc);
        self.initialized = true;
        tracing::debug!(node = ?self.node, values = ?self.values, "range slider initialised");
    }

    // ========================================================================
    // Value model
    // ========================================================================

    fn percent(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min) * 100.0
    }

    fn round_to_precision(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.precision);
        (value * scale).round() / scale
    }

    /// Largest grid value not above `max`
    fn grid_max(&self) -> f64 {
        let steps = ((self.max - self.min) / self.step + 1e-9).floor();
        self.round_to_precision(self.min + steps * self.step)
    }

    /// Nearest grid value inside the domain
    fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        self.round_to_precision(self.min + steps * self.step)
            .clamp(self.min, self.grid_max())
    }

    /// Value under a pixel offset from the slider's left edge
    fn value_at(&self, offset_px: f32, width: f32) -> f64 {
        let step_px = self.step * f64::from(width) / (self.max - self.min);
        let steps = (f64::from(offset_px) / step_px).round();
        self.round_to_precision(self.min + steps * self.step)
            .min(self.grid_max())
    }

    /// Allowed range for thumb `index` given its neighbours
    fn bounds(&self, index: usize) -> (f64, f64) {
        let lower = index
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or(self.min);
        let upper = self.values.get(index + 1).copied().unwrap_or(self.max);
        (lower, upper)
    }

    /// Store a value and mirror it to the thumb, its input and its view
    fn write_value(&mut self, doc: &mut Document, index: usize, value: f64) {
        let Some(thumb) = self.thumbs.get(index).copied() else {
            return;
        };
        self.values[index] = value;

        let percent = self.percent(value) as f32;
        if let Some(style) = doc.style_mut(thumb.node) {
            style.left_percent = Some(percent);
        }
        let plain = value.to_string();
        doc.set_value(thumb.input, &plain);
        doc.set_attr(thumb.node, "data-value", &plain);

        if let Some(Some(view)) = self.views.get_mut(index) {
            let shown = format_number(value);
            if view.editable {
                doc.set_value(view.node, &shown);
            } else {
                doc.set_text(view.node, &shown);
            }
            view.committed = shown;
        }
    }

    fn sync_track(&self, doc: &mut Document) {
        let (Some(first), Some(last)) = (self.values.first(), self.values.last()) else {
            return;
        };
        let left = self.percent(*first) as f32;
        let right = self.percent(*last) as f32;
        if let Some(style) = doc.style_mut(self.track) {
            style.left_percent = Some(left);
            style.width_percent = Some(right - left);
        }
    }

    /// Set every value programmatically
    ///
    /// Values are snapped to the step grid inside the domain and raised
    /// where needed to keep the order; extra entries are ignored.
    pub fn set_values(&mut self, doc: &mut Document, values: &[f64]) {
        let mut floor = self.min;
        for (index, &value) in values.iter().enumerate().take(self.thumbs.len()) {
            let value = self.snap(value).max(floor);
            floor = value;
            self.write_value(doc, index, value);
        }
        // Later thumbs must not sit below a raised predecessor
        for index in values.len().min(self.thumbs.len())..self.thumbs.len() {
            if self.values[index] < floor {
                self.write_value(doc, index, floor);
            }
        }
        self.sync_track(doc);
    }

    // ========================================================================
    // Pointer interaction
    // ========================================================================

    /// Pointer pressed on `target` at page x
    ///
    /// Starts a drag when `target` is (inside) a thumb. Returns true if the
    /// event was handled.
    pub fn on_pointer_down(
        &mut self,
        doc: &mut Document,
        pointer_id: u32,
        target: NodeId,
        x: f32,
    ) -> bool {
        if !self.initialized || !self.contains(doc, target) {
            return false;
        }
        self.suppress_click = false;

        let Some(index) = std::iter::once(target)
            .chain(doc.ancestors(target))
            .take_while(|&n| n != self.node)
            .find_map(|n| self.thumbs.iter().position(|t| t.node == n))
        else {
            return false;
        };
        let rect = doc.page_rect(self.node);
        if rect.width() <= 0.0 {
            return false;
        }

        doc.capture_pointer(pointer_id, self.node);
        doc.add_class(self.node, ACTIVE_CLASS);
        self.drag = Some(DragSession {
            pointer_id,
            index,
            slider_left: rect.x(),
            width: rect.width(),
        });
        tracing::trace!(node = ?self.node, index, "range slider drag start");
        self.drag_to(doc, x);
        true
    }

    /// Pointer moved; only the dragging pointer is handled
    pub fn on_pointer_move(&mut self, doc: &mut Document, pointer_id: u32, x: f32) -> bool {
        if self.drag.is_some_and(|d| d.pointer_id == pointer_id) {
            self.drag_to(doc, x);
            true
        } else {
            false
        }
    }

    /// Pointer released; ends the drag
    pub fn on_pointer_up(&mut self, doc: &mut Document, pointer_id: u32) -> bool {
        if !self.drag.is_some_and(|d| d.pointer_id == pointer_id) {
            return false;
        }
        self.drag = None;
        doc.release_pointer(pointer_id);
        doc.remove_class(self.node, ACTIVE_CLASS);
        self.suppress_click = true;
        tracing::trace!(node = ?self.node, values = ?self.values, "range slider drag end");
        true
    }

    fn drag_to(&mut self, doc: &mut Document, x: f32) {
        let Some(mut drag) = self.drag else {
            return;
        };
        let offset = (x - drag.slider_left).clamp(0.0, drag.width);
        let candidate = self.value_at(offset, drag.width);

        // Push through neighbours: park the current thumb on the neighbour
        // and continue with the neighbour
        let mut index = drag.index;
        let start = index;
        while index + 1 < self.thumbs.len() && candidate >= self.values[index + 1] {
            let parked = self.values[index + 1];
            self.write_value(doc, index, parked);
            index += 1;
        }
        if index == start {
            while index > 0 && candidate <= self.values[index - 1] {
                let parked = self.values[index - 1];
                self.write_value(doc, index, parked);
                index -= 1;
            }
        }
        if index != start {
            tracing::trace!(from = start, to = index, "range slider hand-off");
        }

        let (lower, upper) = self.bounds(index);
        self.write_value(doc, index, candidate.clamp(lower, upper));
        self.sync_track(doc);

        drag.index = index;
        self.drag = Some(drag);
    }

    /// Click inside the slider at page x: jump the nearest thumb there
    pub fn on_click(&mut self, doc: &mut Document, target: NodeId, x: f32) -> bool {
        if !self.initialized || !self.contains(doc, target) {
            return false;
        }
        if std::mem::take(&mut self.suppress_click) {
            return true;
        }
        let rect = doc.page_rect(self.node);
        let width = rect.width();
        if width <= 0.0 || self.thumbs.is_empty() {
            return false;
        }
        let offset = (x - rect.x()).clamp(0.0, width);

        // Nearest thumb; on a tie prefer the later thumb when clicking to its
        // right and keep the earlier one otherwise
        let mut nearest = 0;
        let mut best = f64::INFINITY;
        for index in 0..self.thumbs.len() {
            let position = self.percent(self.values[index]) * f64::from(width) / 100.0;
            let distance = (f64::from(offset) - position).abs();
            if distance < best || (distance == best && f64::from(offset) > position) {
                nearest = index;
                best = distance;
            }
        }

        let (lower, upper) = self.bounds(nearest);
        let value = self.value_at(offset, width).clamp(lower, upper);
        self.write_value(doc, nearest, value);
        self.sync_track(doc);
        true
    }

    // ========================================================================
    // Text views
    // ========================================================================

    fn view_index(&self, node: NodeId) -> Option<usize> {
        self.views
            .iter()
            .position(|v| v.as_ref().is_some_and(|v| v.node == node))
    }

    /// Live re-formatting while the user types into a view
    pub fn on_view_input(&mut self, doc: &mut Document, node: NodeId) -> bool {
        let Some(index) = self.view_index(node) else {
            return false;
        };
        if !self.views[index].as_ref().is_some_and(|v| v.editable) {
            return false;
        }
        let formatted = format_typed(doc.value(node));
        doc.set_value(node, &formatted);
        true
    }

    /// Commit a typed value (blur or Enter)
    ///
    /// The typed value must lie between the neighbouring thumbs' values (or
    /// the domain edges); it is then snapped to the step grid. Anything
    /// else restores the last committed text.
    pub fn commit_view(&mut self, doc: &mut Document, node: NodeId) -> bool {
        let Some(index) = self.view_index(node) else {
            return false;
        };
        let Some(view) = self.views[index].clone().filter(|v| v.editable) else {
            return false;
        };

        let (lower, upper) = self.bounds(index);
        match parse_number(doc.value(node)) {
            Some(typed) if (lower..=upper).contains(&typed) => {
                let value = self.snap(typed).clamp(lower, upper);
                self.write_value(doc, index, value);
                self.sync_track(doc);
                tracing::debug!(node = ?self.node, index, value, "range slider value typed");
            }
            _ => {
                tracing::debug!(node = ?self.node, index, "range slider: typed value rejected");
                doc.set_value(node, &view.committed);
            }
        }
        true
    }
}

/// Number of decimal places in `value`'s shortest representation
fn decimals(value: f64) -> i32 {
    let text = value.to_string();
    text.split_once('.')
        .map(|(_, fraction)| fraction.len() as i32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::geometry::Point;
    use vitrine_layout::Element;

    /// A 100px-wide slider at page x = 100, so page x - 100 is the offset
    /// and, with a 0..100 domain, also the raw value
    fn slider_doc(values: &[&str], step: &str) -> (Document, NodeId) {
        let mut doc = Document::new(1024.0, 768.0);
        let root = doc.root();
        let mut slider = Element::new("div")
            .class("range-slider")
            .at(100.0, 50.0)
            .size(100.0, 20.0);
        for value in values {
            slider = slider.child(
                Element::new("input")
                    .attr("type", "range")
                    .attr("min", "0")
                    .attr("max", "100")
                    .attr("step", step)
                    .attr("value", *value),
            );
        }
        let node = doc.append_element(root, slider);
        doc.append_element(
            root,
            Element::new("input").id("price-from").at(0.0, 100.0).size(80.0, 20.0),
        );
        doc.append_element(
            root,
            Element::new("span").id("price-to").at(100.0, 100.0).size(80.0, 20.0),
        );
        (doc, node)
    }

    fn mounted(values: &[&str], step: &str) -> (Document, RangeSlider) {
        let (mut doc, node) = slider_doc(values, step);
        let options = SliderOptions {
            views: vec!["#price-from".into(), "#price-to".into()],
            ..Default::default()
        };
        let mut slider = RangeSlider::mount(&mut doc, node, &options).unwrap();
        assert!(slider.on_visibility(&mut doc));
        (doc, slider)
    }

    fn thumb_left(doc: &Document, slider: &RangeSlider, index: usize) -> f32 {
        doc.style(slider.thumb(index).unwrap())
            .unwrap()
            .left_percent
            .unwrap()
    }

    fn drag(doc: &mut Document, slider: &mut RangeSlider, index: usize, moves: &[f32]) {
        let thumb = slider.thumb(index).unwrap();
        let start = doc.page_rect(slider.node()).x() + thumb_left(doc, slider, index);
        assert!(slider.on_pointer_down(doc, 1, thumb, start));
        for &x in moves {
            assert!(slider.on_pointer_move(doc, 1, x));
        }
        assert!(slider.on_pointer_up(doc, 1));
    }

    #[test]
    fn test_mount_builds_parts() {
        let (mut doc, node) = slider_doc(&["20", "70"], "5");
        let slider = RangeSlider::mount(&mut doc, node, &SliderOptions::default()).unwrap();

        assert_eq!(slider.thumb_count(), 2);
        assert_eq!((slider.min(), slider.max(), slider.step()), (0.0, 100.0, 5.0));
        assert!(doc.has_class(slider.rail(), RAIL_CLASS));
        assert!(doc.has_class(slider.track(), TRACK_CLASS));
        for index in 0..2 {
            let thumb = slider.thumb(index).unwrap();
            assert!(doc.has_class(thumb, THUMB_CLASS));
            assert_eq!(doc.attr(thumb, "data-index"), Some(index.to_string().as_str()));
            assert_eq!(doc.tag(doc.children(thumb)[0]), Some("input"));
        }
        // Absolute parts do not change the slider's height
        assert_eq!(doc.offset_height(node), 20.0);
        assert!(!slider.is_initialized());
    }

    #[test]
    fn test_mount_rejects_bad_domains() {
        let mut doc = Document::new(800.0, 600.0);
        let root = doc.root();
        let empty = doc.append_element(root, Element::new("div"));
        let inverted = doc.append_element(
            root,
            Element::new("div").child(Element::new("input").attr("min", "10").attr("max", "5")),
        );
        let flat = doc.append_element(
            root,
            Element::new("div").child(Element::new("input").attr("step", "0")),
        );
        let options = SliderOptions::default();
        assert!(RangeSlider::mount(&mut doc, empty, &options).is_none());
        assert!(RangeSlider::mount(&mut doc, inverted, &options).is_none());
        assert!(RangeSlider::mount(&mut doc, flat, &options).is_none());
    }

    #[test]
    fn test_defaults_without_attributes() {
        let mut doc = Document::new(800.0, 600.0);
        let root = doc.root();
        let node = doc.append_element(
            root,
            Element::new("div").size(200.0, 10.0).child(Element::new("input")),
        );
        let mut slider = RangeSlider::mount(&mut doc, node, &SliderOptions::default()).unwrap();
        assert_eq!((slider.min(), slider.max(), slider.step()), (0.0, 100.0, 1.0));
        slider.init(&mut doc);
        assert_eq!(slider.values(), &[0.0]);
    }

    #[test]
    fn test_init_waits_for_visibility() {
        let (mut doc, node) = slider_doc(&["20", "70"], "5");
        doc.set_frame(node, Rect::new(100.0, 2000.0, 100.0, 20.0));
        let mut slider = RangeSlider::mount(&mut doc, node, &SliderOptions::default()).unwrap();

        assert!(!slider.on_visibility(&mut doc));
        let thumb = slider.thumb(0).unwrap();
        assert!(!slider.on_pointer_down(&mut doc, 1, thumb, 120.0));

        doc.set_scroll_y(1500.0);
        assert!(slider.on_visibility(&mut doc));
        assert!(!slider.on_visibility(&mut doc));
        assert_eq!(slider.values(), &[20.0, 70.0]);
    }

    #[test]
    fn test_init_renders_thumbs_track_and_views() {
        let (doc, slider) = mounted(&["20", "70"], "5");
        assert_eq!(thumb_left(&doc, &slider, 0), 20.0);
        assert_eq!(thumb_left(&doc, &slider, 1), 70.0);

        let track = doc.style(slider.track()).unwrap();
        assert_eq!(track.left_percent, Some(20.0));
        assert_eq!(track.width_percent, Some(50.0));

        let from = doc.element_by_id("price-from").unwrap();
        let to = doc.element_by_id("price-to").unwrap();
        assert_eq!(doc.value(from), "20");
        assert_eq!(doc.text(to), "70");
        assert_eq!(doc.attr(slider.thumb(1).unwrap(), "data-value"), Some("70"));
    }

    #[test]
    fn test_init_orders_out_of_order_values() {
        let (_, slider) = mounted(&["80", "30"], "5");
        assert_eq!(slider.values(), &[80.0, 80.0]);
    }

    #[test]
    fn test_two_thumb_push_through_scenario() {
        let (mut doc, mut slider) = mounted(&["20", "70"], "5");
        let thumb = slider.thumb(0).unwrap();

        assert!(slider.on_pointer_down(&mut doc, 1, thumb, 120.0));
        assert_eq!(doc.pointer_capture(1), Some(slider.node()));
        assert!(doc.has_class(slider.node(), ACTIVE_CLASS));

        slider.on_pointer_move(&mut doc, 1, 163.0);
        assert_eq!(slider.values(), &[65.0, 70.0]);

        slider.on_pointer_move(&mut doc, 1, 181.0);
        assert_eq!(slider.values(), &[70.0, 80.0]);

        // The neighbour keeps following for the rest of the drag
        slider.on_pointer_move(&mut doc, 1, 192.0);
        assert_eq!(slider.values(), &[70.0, 90.0]);

        slider.on_pointer_up(&mut doc, 1);
        assert_eq!(doc.pointer_capture(1), None);
        assert!(!doc.has_class(slider.node(), ACTIVE_CLASS));
        assert_eq!(thumb_left(&doc, &slider, 0), 70.0);

        let track = doc.style(slider.track()).unwrap();
        assert_eq!(track.left_percent, Some(70.0));
        assert_eq!(track.width_percent, Some(20.0));
    }

    #[test]
    fn test_push_through_downwards() {
        let (mut doc, mut slider) = mounted(&["30", "60"], "5");
        drag(&mut doc, &mut slider, 1, &[140.0, 110.0]);
        assert_eq!(slider.values(), &[10.0, 30.0]);
    }

    #[test]
    fn test_drag_clamps_to_slider_edges() {
        let (mut doc, mut slider) = mounted(&["20", "70"], "5");
        drag(&mut doc, &mut slider, 0, &[-500.0]);
        assert_eq!(slider.values()[0], 0.0);
        drag(&mut doc, &mut slider, 1, &[900.0]);
        assert_eq!(slider.values()[1], 100.0);
    }

    #[test]
    fn test_order_and_grid_hold_during_drags() {
        let (mut doc, mut slider) = mounted(&["10", "50", "90"], "5");
        let path = [103.0, 171.0, 199.0, 147.0, 101.0, 133.3, 166.6, 150.0];
        for index in 0..3 {
            let thumb = slider.thumb(index).unwrap();
            let start = 100.0 + thumb_left(&doc, &slider, index);
            slider.on_pointer_down(&mut doc, 7, thumb, start);
            for &x in &path {
                slider.on_pointer_move(&mut doc, 7, x);
                let values = slider.values();
                assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");
                assert!(values.iter().all(|v| v % 5.0 == 0.0), "{values:?}");
            }
            slider.on_pointer_up(&mut doc, 7);
        }
    }

    #[test]
    fn test_other_pointers_are_ignored() {
        let (mut doc, mut slider) = mounted(&["20", "70"], "5");
        let thumb = slider.thumb(0).unwrap();
        slider.on_pointer_down(&mut doc, 1, thumb, 120.0);
        assert!(!slider.on_pointer_move(&mut doc, 2, 150.0));
        assert!(!slider.on_pointer_up(&mut doc, 2));
        assert!(slider.is_dragging());
        assert_eq!(slider.values(), &[20.0, 70.0]);
    }

    #[test]
    fn test_click_moves_nearest_thumb() {
        let (mut doc, mut slider) = mounted(&["20", "70"], "5");
        let target = doc.hit_test(Point::new(156.0, 60.0));
        assert!(slider.contains(&doc, target));

        assert!(slider.on_click(&mut doc, target, 156.0));
        assert_eq!(slider.values(), &[20.0, 55.0]);

        assert!(slider.on_click(&mut doc, slider.rail(), 101.0));
        assert_eq!(slider.values(), &[0.0, 55.0]);
    }

    #[test]
    fn test_click_tie_break_keeps_order() {
        let (mut doc, mut slider) = mounted(&["50", "50"], "5");
        slider.on_click(&mut doc, slider.rail(), 180.0);
        assert_eq!(slider.values(), &[50.0, 80.0]);

        slider.set_values(&mut doc, &[50.0, 50.0]);
        slider.on_click(&mut doc, slider.rail(), 120.0);
        assert_eq!(slider.values(), &[20.0, 50.0]);
    }

    #[test]
    fn test_click_after_drag_is_suppressed() {
        let (mut doc, mut slider) = mounted(&["20", "70"], "5");
        drag(&mut doc, &mut slider, 0, &[140.0]);
        assert_eq!(slider.values(), &[40.0, 70.0]);

        // The click that ends the drag lands elsewhere but changes nothing
        assert!(slider.on_click(&mut doc, slider.rail(), 195.0));
        assert_eq!(slider.values(), &[40.0, 70.0]);

        assert!(slider.on_click(&mut doc, slider.rail(), 195.0));
        assert_eq!(slider.values(), &[40.0, 95.0]);
    }

    #[test]
    fn test_typed_value_commit_and_revert() {
        let (mut doc, mut slider) = mounted(&["20", "70"], "5");
        let from = doc.element_by_id("price-from").unwrap();

        doc.set_value(from, "4 2");
        assert!(slider.on_view_input(&mut doc, from));
        assert_eq!(doc.value(from), "42");

        assert!(slider.commit_view(&mut doc, from));
        assert_eq!(slider.values(), &[40.0, 70.0]);
        assert_eq!(doc.value(from), "40");
        assert_eq!(thumb_left(&doc, &slider, 0), 40.0);

        // Above the neighbour: rejected and reverted
        doc.set_value(from, "85");
        slider.commit_view(&mut doc, from);
        assert_eq!(slider.values(), &[40.0, 70.0]);
        assert_eq!(doc.value(from), "40");

        doc.set_value(from, "lots");
        slider.commit_view(&mut doc, from);
        assert_eq!(doc.value(from), "40");

        // Read-only views do not take input
        let to = doc.element_by_id("price-to").unwrap();
        assert!(!slider.commit_view(&mut doc, to));
    }

    #[test]
    fn test_thousands_in_views() {
        let mut doc = Document::new(1024.0, 768.0);
        let root = doc.root();
        let node = doc.append_element(
            root,
            Element::new("div")
                .size(300.0, 20.0)
                .child(
                    Element::new("input")
                        .attr("min", "1000")
                        .attr("max", "250000")
                        .attr("step", "500")
                        .attr("value", "12500"),
                ),
        );
        let view = doc.append_element(root, Element::new("input").id("budget"));
        let options = SliderOptions {
            views: vec!["#budget".into()],
            ..Default::default()
        };
        let mut slider = RangeSlider::mount(&mut doc, node, &options).unwrap();
        slider.init(&mut doc);
        assert_eq!(doc.value(view), "12 500");

        doc.set_value(view, "100 200");
        slider.commit_view(&mut doc, view);
        assert_eq!(slider.values(), &[100_000.0]);
        assert_eq!(doc.value(view), "100 000");
    }

    #[test]
    fn test_set_values_clamps_and_orders() {
        let (mut doc, mut slider) = mounted(&["20", "70"], "5");
        slider.set_values(&mut doc, &[-10.0, 150.0]);
        assert_eq!(slider.values(), &[0.0, 100.0]);

        slider.set_values(&mut doc, &[60.0, 30.0]);
        assert_eq!(slider.values(), &[60.0, 60.0]);

        slider.set_values(&mut doc, &[90.0]);
        assert_eq!(slider.values(), &[90.0, 90.0]);

        let to = doc.element_by_id("price-to").unwrap();
        assert_eq!(doc.text(to), "90");
        let track = doc.style(slider.track()).unwrap();
        assert_eq!(track.width_percent, Some(0.0));
    }

    #[test]
    fn test_values_stay_on_grid_when_step_does_not_divide_domain() {
        let (mut doc, mut slider) = mounted(&["10", "100"], "40");
        assert_eq!(slider.values(), &[0.0, 80.0]);

        slider.set_values(&mut doc, &[15.0, 45.0]);
        assert_eq!(slider.values(), &[0.0, 40.0]);

        let rail = slider.rail();
        slider.on_click(&mut doc, rail, 199.0);
        assert_eq!(slider.values(), &[0.0, 80.0]);

        slider.set_values(&mut doc, &[0.0, 40.0]);
        drag(&mut doc, &mut slider, 1, &[900.0]);
        assert_eq!(slider.values(), &[0.0, 80.0]);
        assert_eq!(thumb_left(&doc, &slider, 1), 80.0);

        slider.set_values(&mut doc, &[63.0, 1000.0]);
        assert_eq!(slider.values(), &[80.0, 80.0]);
        assert!(slider.values().iter().all(|v| v % 40.0 == 0.0));
    }

    #[test]
    fn test_fractional_step_has_no_float_noise() {
        let mut doc = Document::new(1024.0, 768.0);
        let root = doc.root();
        let node = doc.append_element(
            root,
            Element::new("div").at(100.0, 0.0).size(100.0, 20.0).child(
                Element::new("input")
                    .attr("min", "0")
                    .attr("max", "1")
                    .attr("step", "0.1")
                    .attr("value", "0"),
            ),
        );
        let mut slider = RangeSlider::mount(&mut doc, node, &SliderOptions::default()).unwrap();
        slider.init(&mut doc);
        let thumb = slider.thumb(0).unwrap();
        slider.on_pointer_down(&mut doc, 1, thumb, 100.0);
        slider.on_pointer_move(&mut doc, 1, 130.0);
        assert_eq!(slider.values(), &[0.3]);
        assert_eq!(doc.value(doc.children(thumb)[0]), "0.3");
    }
}
