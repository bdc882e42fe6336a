//! Layout metrics
//!
//! Rendered heights, page positions and hit testing over the document.
//!
//! Boxes are placed by the host: each node's frame origin is relative to its
//! parent, and leaf nodes carry their intrinsic height. Container heights are
//! derived from the rendered in-flow children, so a fixed-height override or
//! a closed `details` element changes the height of every ancestor.
//! Percentage `left`/`width` overrides resolve against the parent's width.

use vitrine_core::geometry::{Point, Rect};

use crate::tree::{Document, NodeId};

impl Document {
    /// Check if `parent` renders `child`
    ///
    /// A `details` element without the `open` attribute renders only its
    /// `summary` children.
    pub fn displays_child(&self, parent: NodeId, child: NodeId) -> bool {
        let Some(node) = self.get(parent) else {
            return false;
        };
        if node.tag() == "details" && !node.has_attr("open") {
            return self.tag(child) == Some("summary");
        }
        true
    }

    /// Check if the node and every ancestor are rendered
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.get(current) else {
                return false;
            };
            if node.style().hidden {
                return false;
            }
            match node.parent() {
                Some(parent) if !self.displays_child(parent, current) => return false,
                Some(parent) => current = parent,
                None => return true,
            }
        }
    }

    /// Height of the node's content, ignoring any fixed-height override
    ///
    /// Containers stack their rendered in-flow children vertically; nodes
    /// without such children report the intrinsic height of their frame.
    pub fn natural_height(&self, id: NodeId) -> f32 {
        let Some(node) = self.get(id) else {
            return 0.0;
        };
        let mut in_flow = node
            .children()
            .iter()
            .copied()
            .filter(|&child| self.displays_child(id, child))
            .filter(|&child| self.style(child).is_some_and(|s| !s.position_absolute))
            .peekable();

        if in_flow.peek().is_none() {
            return node.frame().height();
        }
        in_flow.map(|child| self.offset_height(child)).sum()
    }

    /// Rendered height, honouring the inline height override
    pub fn offset_height(&self, id: NodeId) -> f32 {
        let Some(style) = self.style(id) else {
            return 0.0;
        };
        if style.hidden {
            return 0.0;
        }
        style.height.unwrap_or_else(|| self.natural_height(id))
    }

    /// Rendered width, honouring a percentage width override
    pub fn offset_width(&self, id: NodeId) -> f32 {
        let Some(style) = self.style(id) else {
            return 0.0;
        };
        if style.hidden {
            return 0.0;
        }
        match (style.width_percent, self.parent(id)) {
            (Some(percent), Some(parent)) => self.offset_width(parent) * percent / 100.0,
            _ => self.frame(id).width(),
        }
    }

    /// Origin relative to the parent, with a percentage `left` applied on
    /// top of the frame's x
    pub fn resolved_origin(&self, id: NodeId) -> Point {
        let frame = self.frame(id);
        let shift = match (self.style(id).and_then(|s| s.left_percent), self.parent(id)) {
            (Some(percent), Some(parent)) => self.offset_width(parent) * percent / 100.0,
            _ => 0.0,
        };
        frame.origin.offset(shift, 0.0)
    }

    /// Position in page coordinates
    ///
    /// Accumulates origins along the parent chain iteratively.
    pub fn offset_position(&self, id: NodeId) -> Point {
        let mut position = Point::ZERO;
        let mut current = Some(id).filter(|&n| self.exists(n));
        while let Some(node) = current {
            let origin = self.resolved_origin(node);
            position = position.offset(origin.x, origin.y);
            current = self.parent(node);
        }
        position
    }

    pub fn offset_left(&self, id: NodeId) -> f32 {
        self.offset_position(id).x
    }

    pub fn offset_top(&self, id: NodeId) -> f32 {
        self.offset_position(id).y
    }

    /// Rendered box in page coordinates
    pub fn page_rect(&self, id: NodeId) -> Rect {
        let origin = self.offset_position(id);
        Rect::new(
            origin.x,
            origin.y,
            self.offset_width(id),
            self.offset_height(id),
        )
    }

    /// Check if any part of the node is inside the viewport
    pub fn is_in_viewport(&self, id: NodeId) -> bool {
        self.is_rendered(id) && self.page_rect(id).intersects(&self.viewport_rect())
    }

    /// Topmost rendered node under a page-coordinate point
    ///
    /// Later siblings paint over earlier ones and children over parents.
    /// Points outside every box hit the root.
    pub fn hit_test(&self, point: Point) -> NodeId {
        let root = self.root();
        let mut hit = root;
        let mut stack = vec![(root, Point::ZERO)];

        while let Some((id, parent_origin)) = stack.pop() {
            let Some(style) = self.style(id) else {
                continue;
            };
            if style.hidden || style.visibility_hidden {
                continue;
            }
            let local = self.resolved_origin(id);
            let origin = parent_origin.offset(local.x, local.y);
            let rect = Rect::new(
                origin.x,
                origin.y,
                self.offset_width(id),
                self.offset_height(id),
            );
            if rect.contains(point) {
                hit = id;
            }
            stack.extend(
                self.children(id)
                    .iter()
                    .rev()
                    .filter(|&&child| self.displays_child(id, child))
                    .map(|&child| (child, origin)),
            );
        }
        hit
    }
}
