//! Contact form submission flow
//!
//! Submitting a form shows a status overlay inside it:
//!
//! ```text
//! form (position: relative)
//! ├── ...original children (hidden once a result arrives)
//! └── div.status.status_loader | .status_success | .status_error
//!     └── div.status__body
//!         ├── div.status__icon
//!         └── div.status__message
//! ```
//!
//! The overlay goes away a few seconds after the result arrives and the
//! original children are shown again.
//!
//! Sending is split in two so the host controls the I/O: [`ContactForm::begin_submit`]
//! returns the fields to send and [`ContactForm::finish_submit`] takes the
//! outcome. [`ContactForm::submit`] chains both over a [`MailTransport`].

use vitrine_core::EventChannel;
use vitrine_layout::{Document, Element, NodeId};

use crate::mailer::{FormFields, MailError, MailResponse, MailTransport};

const FIELD_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// Texts shown in the status overlay
#[derive(Clone, Debug, PartialEq)]
pub struct FormMessages {
    pub success: String,
    /// Prefix for the failure text; the error itself follows it
    pub error: String,
    pub hide_delay_ms: f64,
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            success: "Your message has been sent.".into(),
            error: "Error! Your message was NOT sent.".into(),
            hide_delay_ms: 3000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormEvent {
    /// The endpoint accepted the message
    Submitted { form: NodeId },
}

#[derive(Clone, Copy, Debug)]
struct StatusOverlay {
    node: NodeId,
    message: NodeId,
}

#[derive(Debug)]
pub struct ContactForm {
    node: NodeId,
    messages: FormMessages,
    /// Children present before any overlay was added
    content: Vec<NodeId>,
    /// Field values at bind time, restored after a successful send
    defaults: Vec<(NodeId, String)>,
    status: FormStatus,
    overlay: Option<StatusOverlay>,
    hide_at: Option<f64>,
    events: EventChannel<FormEvent>,
}

impl ContactForm {
    /// Bind to a `form` element
    pub fn bind(doc: &Document, node: NodeId, messages: FormMessages) -> Option<Self> {
        if doc.tag(node) != Some("form") {
            tracing::debug!(?node, "contact form: not a form element");
            return None;
        }
        let defaults = field_nodes(doc, node)
            .into_iter()
            .map(|field| (field, doc.value(field).to_string()))
            .collect();
        Some(Self {
            node,
            messages,
            content: doc.children(node).to_vec(),
            defaults,
            status: FormStatus::Idle,
            overlay: None,
            hide_at: None,
            events: EventChannel::new(),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// The overlay element, while shown
    pub fn status_node(&self) -> Option<NodeId> {
        self.overlay.map(|o| o.node)
    }

    pub fn events(&self) -> EventChannel<FormEvent> {
        self.events.clone()
    }

    /// Collect the fields and show the loading overlay
    ///
    /// Returns `None` while a previous submission is still in flight.
    pub fn begin_submit(&mut self, doc: &mut Document) -> Option<FormFields> {
        if self.status == FormStatus::Loading {
            tracing::debug!(node = ?self.node, "contact form: already sending");
            return None;
        }
        if self.overlay.is_some() {
            self.restore(doc);
        }

        let fields = self.collect_fields(doc);

        let overlay = doc.append_element(
            self.node,
            Element::new("div")
                .class("status")
                .class("status_loader")
                .child(
                    Element::new("div")
                        .class("status__body")
                        .child(Element::new("div").class("status__icon"))
                        .child(Element::new("div").class("status__message")),
                ),
        );
        let message = doc.descendants(overlay).into_iter().last().unwrap_or(overlay);
        if let Some(style) = doc.style_mut(self.node) {
            style.position_relative = true;
        }

        self.overlay = Some(StatusOverlay {
            node: overlay,
            message,
        });
        self.status = FormStatus::Loading;
        tracing::debug!(node = ?self.node, fields = fields.len(), "contact form sending");
        Some(fields)
    }

    fn collect_fields(&self, doc: &Document) -> FormFields {
        field_nodes(doc, self.node)
            .into_iter()
            .filter(|&n| {
                let checkable = matches!(doc.attr(n, "type"), Some("checkbox" | "radio"));
                !checkable || doc.has_attr(n, "checked")
            })
            .filter_map(|n| {
                let name = doc.attr(n, "name")?;
                Some((name.to_string(), doc.value(n).to_string()))
            })
            .collect()
    }

    /// Show the outcome of the submission started by [`Self::begin_submit`]
    ///
    /// A response with `success: false` counts as a failure. The overlay
    /// hides itself `hide_delay_ms` after `now_ms`. A failure is shown in
    /// the overlay and handed back to the caller.
    pub fn finish_submit(
        &mut self,
        doc: &mut Document,
        result: Result<MailResponse, MailError>,
        now_ms: f64,
    ) -> Result<FormStatus, MailError> {
        let (Some(overlay), FormStatus::Loading) = (self.overlay, self.status) else {
            return Ok(self.status);
        };
        self.set_content_hidden(doc, true);
        self.hide_at = Some(now_ms + self.messages.hide_delay_ms);

        match result.and_then(MailResponse::into_result) {
            Ok(_) => {
                doc.set_attr(overlay.node, "class", "status status_success");
                doc.set_text(overlay.message, &self.messages.success);
                self.reset_fields(doc);
                self.status = FormStatus::Success;
                tracing::debug!(node = ?self.node, "contact form sent");
                self.events.emit(&FormEvent::Submitted { form: self.node });
                Ok(self.status)
            }
            Err(err) => {
                tracing::warn!(node = ?self.node, %err, "contact form failed");
                doc.set_attr(overlay.node, "class", "status status_error");
                doc.set_text(overlay.message, &format!("{} {err}", self.messages.error));
                self.status = FormStatus::Error;
                Err(err)
            }
        }
    }

    /// Put every field back to its bind-time value
    fn reset_fields(&self, doc: &mut Document) {
        for (field, value) in &self.defaults {
            if doc.exists(*field) {
                doc.set_value(*field, value);
            }
        }
    }

    /// Send through `transport` and show the result
    ///
    /// While a submission is in flight this returns `Ok(FormStatus::Loading)`
    /// without sending.
    pub async fn submit<T: MailTransport>(
        &mut self,
        doc: &mut Document,
        transport: &T,
        now_ms: f64,
    ) -> Result<FormStatus, MailError> {
        let Some(fields) = self.begin_submit(doc) else {
            return Ok(self.status);
        };
        let result = transport.send(&fields).await;
        self.finish_submit(doc, result, now_ms)
    }

    /// Hide the overlay once its delay has passed
    ///
    /// Returns true while the overlay is waiting to hide.
    pub fn update(&mut self, doc: &mut Document, now_ms: f64) -> bool {
        match self.hide_at {
            Some(at) if now_ms >= at => {
                self.restore(doc);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    fn restore(&mut self, doc: &mut Document) {
        self.set_content_hidden(doc, false);
        if let Some(style) = doc.style_mut(self.node) {
            style.position_relative = false;
        }
        if let Some(overlay) = self.overlay.take() {
            doc.remove(overlay.node);
        }
        self.hide_at = None;
        self.status = FormStatus::Idle;
    }

    fn set_content_hidden(&self, doc: &mut Document, hidden: bool) {
        for &child in &self.content {
            if let Some(style) = doc.style_mut(child) {
                style.visibility_hidden = hidden;
            }
        }
    }
}

fn field_nodes(doc: &Document, form: NodeId) -> Vec<NodeId> {
    doc.descendants(form)
        .into_iter()
        .filter(|&n| doc.tag(n).is_some_and(|tag| FIELD_TAGS.contains(&tag)))
        .collect()
}
