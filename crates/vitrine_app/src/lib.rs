//! Vitrine Page Runtime
//!
//! Binds the widgets a brochure page needs to a [`Document`] and drives
//! them from platform events.
//!
//! # Example
//!
//! ```rust
//! use vitrine_app::prelude::*;
//!
//! fn main() -> Result<()> {
//!     vitrine_app::logging::init_tracing();
//!
//!     let config = VitrineConfig::from_toml("[accordion]\nduration_ms = 200")?;
//!     let mut doc = Document::new(1280.0, 800.0);
//!     let root = doc.root();
//!     doc.append_element(root, Element::new("header").size(1280.0, 80.0));
//!
//!     let mut page = Page::new(doc, config)?;
//!     page.run(ScriptedEventLoop::new(vec![
//!         Event::Window(WindowEvent::Scrolled { scroll_y: 300.0 }),
//!         Event::Frame { dt_ms: 16.0 },
//!     ]))?;
//!
//!     let header = page.header().map(|h| h.node()).unwrap();
//!     assert!(page.document().has_class(header, "header_scroll"));
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
pub mod logging;
mod page;

#[cfg(test)]
mod tests;

pub use config::VitrineConfig;
pub use error::{Result, VitrineError};
pub use page::Page;

// Re-export the layers a host works with
pub use vitrine_layout::{Document, Element, NodeId};
pub use vitrine_platform::{Event, EventLoop, ScriptedEventLoop};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::VitrineConfig;
    pub use crate::error::{Result, VitrineError};
    pub use crate::page::Page;

    pub use vitrine_layout::prelude::*;
    pub use vitrine_platform::prelude::*;
    pub use vitrine_widgets::prelude::*;
}
