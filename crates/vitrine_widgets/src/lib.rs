//! # Vitrine Widgets
//!
//! Interactive behaviour for a brochure page, built on the `vitrine_layout`
//! document and the `vitrine_animation` frame clock.
//!
//! ## Components
//!
//! - **Accordion** - Animated open/close of a `details` element
//! - **AccordionGroup** - Coordinated accordions ("spollers"): exclusive
//!   mode, responsive enable/disable, collapse on outside click
//! - **RangeSlider** - Multi-thumb slider with push-through dragging and
//!   synchronised text views
//! - **ScrollWindow / HeaderScroll** - Scroll direction events and header
//!   classes driven by them
//! - **ContactForm** - Submission status flow over a [`MailTransport`]
//!
//! Widgets never own the document. The page hands them `&mut Document` for
//! each operation and calls their `update` once per frame.

pub mod components;
pub mod mailer;
pub mod number_format;

pub use components::*;
pub use mailer::{FormFields, MailError, MailResponse, MailTransport};

#[cfg(feature = "network")]
pub use mailer::HttpMailTransport;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::components::accordion::{
        Accordion, AccordionOptions, DisclosureChange, DisclosureEffect, DisclosureEvent,
        DisclosureState,
    };
    pub use crate::components::accordion_group::{
        AccordionGroup, DocumentClick, GroupConfig, GroupConfigError, ResponsiveBound,
        ResponsiveRule,
    };
    pub use crate::components::contact_form::{ContactForm, FormEvent, FormMessages, FormStatus};
    pub use crate::components::header_scroll::{HeaderScroll, HeaderScrollOptions};
    pub use crate::components::range_slider::{RangeSlider, SliderOptions};
    pub use crate::components::scroll_window::{ScrollDirection, ScrollWindow, ScrollWindowEvent};
    pub use crate::mailer::{FormFields, MailError, MailResponse, MailTransport};
    pub use crate::number_format::{format_number, format_typed, parse_number};
}
