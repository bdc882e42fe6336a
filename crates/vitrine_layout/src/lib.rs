//! Vitrine Layout
//!
//! A headless document: an element tree with attributes, classes, inline
//! style overrides and host-placed boxes. Widgets read measurements from it
//! and write their visual state back into it.
//!
//! # Features
//!
//! - **Element tree**: slotmap arena of nodes with ordered attributes
//! - **Selectors**: `tag#id.class[attr=value]` compounds joined by descendant
//!   combinators
//! - **Metrics**: offset accumulation, page rectangles, hit testing
//! - **Pointer capture**: which node receives a pointer's events mid-gesture
//!
//! # Example
//!
//! ```rust
//! use vitrine_layout::prelude::*;
//!
//! let mut doc = Document::new(1024.0, 768.0);
//! let root = doc.root();
//! let details = doc.append_element(
//!     root,
//!     Element::new("details")
//!         .class("faq")
//!         .at(0.0, 100.0)
//!         .size(400.0, 0.0)
//!         .child(Element::new("summary").size(400.0, 40.0))
//!         .child(Element::new("div").size(400.0, 120.0)),
//! );
//!
//! // Closed details only render their summary
//! assert_eq!(doc.offset_height(details), 40.0);
//! assert_eq!(doc.query_selector(root, &"details.faq".parse().unwrap()), Some(details));
//! ```

pub mod metrics;
pub mod selector;
pub mod tree;

pub use selector::{Selector, SelectorError};
pub use tree::{Document, Element, Node, NodeId, Style};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::selector::{Selector, SelectorError};
    pub use crate::tree::{Document, Element, Node, NodeId, Style};
    pub use vitrine_core::geometry::{Point, Rect, Size};
}
