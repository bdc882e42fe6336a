//! Widgets bound to document elements
//!
//! Each widget follows a consistent pattern:
//! - A constructor (`bind` / `mount`) that returns `None` for elements it
//!   cannot drive
//! - Event handlers taking `&mut Document`
//! - An `update` method called once per frame when the widget animates or
//!   has timers

pub mod accordion;
pub mod accordion_group;
pub mod contact_form;
pub mod header_scroll;
pub mod range_slider;
pub mod scroll_window;

pub use accordion::{Accordion, AccordionOptions, DisclosureChange, DisclosureState};
pub use accordion_group::{AccordionGroup, DocumentClick, GroupConfig, GroupConfigError};
pub use contact_form::{ContactForm, FormEvent, FormMessages, FormStatus};
pub use header_scroll::{HeaderScroll, HeaderScrollOptions};
pub use range_slider::{RangeSlider, SliderOptions};
pub use scroll_window::{ScrollDirection, ScrollWindow, ScrollWindowEvent};
