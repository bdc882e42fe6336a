//! Page-level scenarios: a landing page driven through platform events

use std::path::Path;

use crate::prelude::*;
use vitrine_widgets::components::accordion_group::MINIMIZE_ATTR;

/// Header, an exclusive FAQ group, a standalone accordion, a price slider
/// with two views and a contact form
fn landing() -> Document {
    let mut doc = Document::new(1280.0, 800.0);
    let root = doc.root();
    doc.append_element(root, Element::new("header").size(1280.0, 80.0));

    let mut faq = Element::new("section")
        .attr("data-spollers", "")
        .attr("data-spollers-one", "")
        .attr("data-spoller-close", "")
        .at(0.0, 100.0)
        .size(800.0, 0.0);
    for i in 0..3 {
        faq = faq.child(
            Element::new("details")
                .at(0.0, i as f32 * 150.0)
                .size(800.0, 0.0)
                .child(Element::new("summary").size(800.0, 40.0))
                .child(Element::new("div").at(0.0, 40.0).size(800.0, 100.0)),
        );
    }
    doc.append_element(root, faq);

    doc.append_element(
        root,
        Element::new("details")
            .class("delivery")
            .at(900.0, 100.0)
            .size(300.0, 0.0)
            .child(Element::new("summary").size(300.0, 40.0))
            .child(Element::new("div").at(0.0, 40.0).size(300.0, 60.0)),
    );

    let price_input = |value: &str| {
        Element::new("input")
            .attr("min", "0")
            .attr("max", "1000")
            .attr("step", "10")
            .attr("value", value)
    };
    doc.append_element(
        root,
        Element::new("div")
            .class("range-slider")
            .at(100.0, 600.0)
            .size(400.0, 20.0)
            .child(price_input("200"))
            .child(price_input("800")),
    );
    doc.append_element(
        root,
        Element::new("input").id("price-from").at(100.0, 640.0).size(100.0, 20.0),
    );
    doc.append_element(
        root,
        Element::new("span").id("price-to").at(300.0, 640.0).size(100.0, 20.0),
    );

    doc.append_element(
        root,
        Element::new("form")
            .at(0.0, 1200.0)
            .size(600.0, 300.0)
            .child(
                Element::new("input")
                    .attr("name", "email")
                    .attr("value", "ann@example.com")
                    .size(600.0, 40.0),
            )
            .child(Element::new("button").at(0.0, 60.0).size(120.0, 40.0)),
    );
    doc
}

fn config() -> VitrineConfig {
    let mut config = VitrineConfig::default();
    config.sliders[0].views = vec!["#price-from".into(), "#price-to".into()];
    config
}

fn landing_page() -> Page {
    Page::new(landing(), config()).unwrap()
}

fn frames(page: &mut Page, count: usize) {
    for _ in 0..count {
        page.handle_event(Event::Frame { dt_ms: 16.0 });
    }
}

fn pointer(page: &mut Page, event: PointerEvent) {
    page.handle_event(Event::Input(InputEvent::Pointer(event)));
}

fn click(page: &mut Page, x: f32, y: f32) {
    pointer(page, PointerEvent::Click { x, y });
}

fn key(page: &mut Page, key: Key) {
    page.handle_event(Event::Input(InputEvent::Keyboard(KeyboardEvent {
        key,
        state: KeyState::Pressed,
    })));
}

fn type_text(page: &mut Page, value: &str) {
    page.handle_event(Event::Input(InputEvent::Text {
        value: value.to_string(),
    }));
}

fn open_items(page: &Page) -> Vec<usize> {
    page.groups()[0]
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_open())
        .map(|(i, _)| i)
        .collect()
}

struct FakeTransport(std::result::Result<MailResponse, u16>);

impl MailTransport for FakeTransport {
    async fn send(&self, _fields: &FormFields) -> std::result::Result<MailResponse, MailError> {
        self.0.clone().map_err(MailError::Status)
    }
}

#[test]
fn test_page_binds_widgets() {
    let page = landing_page();
    assert_eq!(page.groups().len(), 1);
    assert_eq!(page.groups()[0].items().len(), 3);
    assert_eq!(page.accordions().len(), 1);
    assert_eq!(page.sliders().len(), 1);
    assert_eq!(page.forms().len(), 1);
    assert!(page.header().is_some());

    // The slider is on screen from the start
    assert!(page.sliders()[0].is_initialized());
    assert_eq!(page.sliders()[0].values(), &[200.0, 800.0]);
}

#[test]
fn test_first_group_item_opens_on_load() {
    let mut page = landing_page();
    assert!(page.groups()[0].items()[0].is_expanding());

    frames(&mut page, 30);
    assert_eq!(open_items(&page), vec![0]);
    assert!(!page.is_busy());

    let node = page.groups()[0].items()[0].node();
    let doc = page.document();
    assert!(doc.has_attr(node, "open"));
    assert_eq!(doc.style(node).unwrap().height, None);
    assert_eq!(doc.offset_height(node), 140.0);
}

#[test]
fn test_exclusive_group_then_outside_click() {
    let mut page = landing_page();
    frames(&mut page, 30);
    assert!(page.groups()[0].is_watching_outside_clicks());

    // Summary of the second item
    click(&mut page, 10.0, 260.0);
    frames(&mut page, 30);
    assert_eq!(open_items(&page), vec![1]);

    click(&mut page, 1000.0, 700.0);
    frames(&mut page, 30);
    assert!(open_items(&page).is_empty());
    assert!(!page.groups()[0].is_watching_outside_clicks());
}

#[test]
fn test_clicks_are_broadcast_with_their_path() {
    let mut page = landing_page();
    let clicks = page.clicks().mailbox();
    click(&mut page, 10.0, 110.0);

    let received = clicks.drain();
    assert_eq!(received.len(), 1);
    let summary = page.groups()[0].items()[0].summary();
    assert_eq!(received[0].target, summary);
    assert!(received[0].path.contains(&page.groups()[0].node()));
}

#[test]
fn test_standalone_accordion() {
    let mut page = landing_page();
    let changes = page.accordion_changes().mailbox();

    click(&mut page, 910.0, 110.0);
    assert!(page.accordions()[0].is_expanding());
    frames(&mut page, 30);
    assert!(page.accordions()[0].is_open());

    let node = page.accordions()[0].node();
    assert_eq!(changes.drain(), vec![DisclosureChange { node, open: true }]);
    // The group is untouched
    assert_eq!(open_items(&page), vec![0]);
}

#[test]
fn test_responsive_group_follows_resizes() {
    let mut doc = Document::new(1024.0, 768.0);
    let root = doc.root();
    let section = doc.append_element(
        root,
        Element::new("section").attr("data-spollers", "768,max").child(
            Element::new("details")
                .child(Element::new("summary").size(400.0, 40.0))
                .child(Element::new("div").size(400.0, 100.0)),
        ),
    );
    let mut page = Page::new(doc, VitrineConfig::default()).unwrap();
    assert!(!page.groups()[0].is_enabled());
    assert!(!page.document().has_attr(section, MINIMIZE_ATTR));

    page.handle_event(Event::Window(WindowEvent::Resized {
        width: 600.0,
        height: 800.0,
    }));
    assert!(page.groups()[0].is_enabled());
    assert!(page.document().has_attr(section, MINIMIZE_ATTR));

    page.handle_event(Event::Window(WindowEvent::Resized {
        width: 700.0,
        height: 800.0,
    }));
    assert!(page.groups()[0].is_enabled());
    assert_eq!(page.document().viewport().width, 700.0);
}

#[test]
fn test_slider_drag_through_pointer_events() {
    let mut page = landing_page();
    let slider = page.sliders()[0].node();

    // Thumb 0 sits at 20% of 400px, i.e. page x 180
    pointer(&mut page, PointerEvent::Down { pointer_id: 1, x: 180.0, y: 610.0 });
    assert_eq!(page.document().pointer_capture(1), Some(slider));
    assert!(page.document().has_class(slider, "range-slider_active"));

    // Moves outside the slider's box still reach it through capture
    pointer(&mut page, PointerEvent::Moved { pointer_id: 1, x: 300.0, y: 900.0 });
    pointer(&mut page, PointerEvent::Up { pointer_id: 1, x: 300.0, y: 900.0 });
    assert_eq!(page.sliders()[0].values(), &[500.0, 800.0]);
    assert_eq!(page.document().pointer_capture(1), None);
    assert!(!page.document().has_class(slider, "range-slider_active"));

    let doc = page.document();
    assert_eq!(doc.value(doc.element_by_id("price-from").unwrap()), "500");
    assert_eq!(doc.text(doc.element_by_id("price-to").unwrap()), "800");

    // The click ending the drag is swallowed, the next one jumps
    click(&mut page, 300.0, 610.0);
    assert_eq!(page.sliders()[0].values(), &[500.0, 800.0]);
    click(&mut page, 140.0, 610.0);
    assert_eq!(page.sliders()[0].values(), &[100.0, 800.0]);
}

#[test]
fn test_slider_text_view() {
    let mut page = landing_page();
    let from = page.document().element_by_id("price-from").unwrap();

    pointer(&mut page, PointerEvent::Down { pointer_id: 1, x: 150.0, y: 650.0 });
    assert_eq!(page.document().focused(), Some(from));

    type_text(&mut page, "7000");
    assert_eq!(page.document().value(from), "7 000");
    key(&mut page, Key::Enter);
    assert_eq!(page.document().value(from), "200");
    assert_eq!(page.sliders()[0].values(), &[200.0, 800.0]);

    type_text(&mut page, "3 5 0");
    assert_eq!(page.document().value(from), "350");
    key(&mut page, Key::Enter);
    assert_eq!(page.sliders()[0].values(), &[350.0, 800.0]);

    // Leaving the field commits too
    type_text(&mut page, "120");
    key(&mut page, Key::Tab);
    assert_eq!(page.document().focused(), None);
    assert_eq!(page.sliders()[0].values(), &[120.0, 800.0]);
}

#[test]
fn test_offscreen_slider_initialises_on_scroll() {
    let mut doc = Document::new(1024.0, 768.0);
    let root = doc.root();
    doc.append_element(
        root,
        Element::new("div")
            .class("range-slider")
            .at(0.0, 2000.0)
            .size(300.0, 20.0)
            .child(Element::new("input").attr("value", "40")),
    );
    let mut page = Page::new(doc, VitrineConfig::default()).unwrap();
    assert!(!page.sliders()[0].is_initialized());

    page.handle_event(Event::Window(WindowEvent::Scrolled { scroll_y: 1500.0 }));
    assert!(page.sliders()[0].is_initialized());
    assert_eq!(page.sliders()[0].values(), &[40.0]);
}

#[test]
fn test_header_classes_follow_scrolling() {
    let mut page = landing_page();
    let header = page.header().unwrap().node();

    page.handle_event(Event::Window(WindowEvent::Scrolled { scroll_y: 300.0 }));
    frames(&mut page, 1);
    assert!(page.document().has_class(header, "header_scroll"));

    page.handle_event(Event::Window(WindowEvent::Scrolled { scroll_y: 500.0 }));
    frames(&mut page, 40);
    assert!(page.document().has_class(header, "header_scroll_down"));
    assert!(!page.document().has_class(header, "header_scroll_stop"));

    frames(&mut page, 40);
    assert!(page.document().has_class(header, "header_scroll_stop"));

    page.handle_event(Event::Window(WindowEvent::Scrolled { scroll_y: 0.0 }));
    frames(&mut page, 1);
    let doc = page.document();
    assert!(doc.get(header).unwrap().classes().next().is_none());
}

#[test]
fn test_form_submission_and_auto_hide() {
    let mut page = landing_page();
    let form = page.forms()[0].node();
    let email = page.document().children(form)[0];
    page.document_mut().set_value(email, "bob@example.com");

    let status = pollster::block_on(page.submit_form(form, &FakeTransport(Ok(MailResponse {
        success: true,
        message: String::new(),
    }))))
    .unwrap();
    assert_eq!(status, Some(FormStatus::Success));
    assert!(page.document().style(email).unwrap().visibility_hidden);
    assert_eq!(page.document().value(email), "ann@example.com");

    frames(&mut page, 190);
    assert_eq!(page.forms()[0].status(), FormStatus::Idle);
    assert!(page.forms()[0].status_node().is_none());
    assert!(!page.document().style(email).unwrap().visibility_hidden);

    let err = pollster::block_on(page.submit_form(form, &FakeTransport(Err(503)))).unwrap_err();
    assert!(matches!(err, VitrineError::Mail(MailError::Status(503))));
    assert_eq!(page.forms()[0].status(), FormStatus::Error);

    let not_a_form = page.header().unwrap().node();
    assert_eq!(
        pollster::block_on(page.submit_form(not_a_form, &FakeTransport(Err(500)))).unwrap(),
        None
    );
}

#[test]
fn test_scripted_session() {
    let mut page = landing_page();
    let script = ScriptedEventLoop::from_json(
        r#"[
            {"window": {"scrolled": {"scroll_y": 300.0}}},
            {"input": {"pointer": {"click": {"x": 910.0, "y": 110.0}}}}
        ]"#,
    )
    .unwrap();
    page.run(script).unwrap();
    page.run(ScriptedEventLoop::new(vec![Event::Frame { dt_ms: 16.0 }; 30]))
        .unwrap();

    assert!(page.accordions()[0].is_open());
    let header = page.header().unwrap().node();
    assert!(page.document().has_class(header, "header_scroll"));
    assert_eq!(page.scroll_window().prev_scroll_y(), Some(300.0));
}

#[test]
fn test_bad_configured_selector_is_an_error() {
    let mut config = VitrineConfig::default();
    config.sliders[0].selector = "[unclosed".into();
    let err = Page::new(landing(), config).unwrap_err();
    assert!(matches!(err, VitrineError::Selector(_)));
}

#[test]
fn test_invalid_config_is_a_config_error() {
    let mut config = VitrineConfig::default();
    config.accordion.duration_ms = -1.0;
    let err = Page::new(landing(), config).unwrap_err();
    assert!(matches!(err, VitrineError::Config(ref message) if message.contains("accordion.duration_ms")));

    let err = Page::from_config_file(landing(), Path::new("/nonexistent/vitrine.toml")).unwrap_err();
    assert!(matches!(err, VitrineError::Config(ref message) if message.contains("/nonexistent/vitrine.toml")));
}
