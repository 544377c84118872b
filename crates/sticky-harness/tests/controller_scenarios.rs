//! End-to-end controller scenarios against the in-memory document.

use pretty_assertions::assert_eq;
use sticky_core::{
    Anchor, FlowReason, LayoutHost, Placement, ReadyState, Rect, StickyConfig, StickyController,
    StickyEvent, StickyId, StyleProperty, Viewport, document_rect, resolve_container,
};
use sticky_harness::{FakeDocument, FakeElement, NodeId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("sticky_core=trace"))
        .with_test_writer()
        .try_init();
}

/// Element at document top 500 (height 100, margin 20) inside a container
/// spanning 0..1000, viewport 800 tall.
fn reference_page() -> (FakeDocument, NodeId) {
    let doc = FakeDocument::new(Viewport::new(1024.0, 800.0), 3000.0);
    let container = doc.append(
        doc.root(),
        FakeElement::div()
            .attr("data-sticky-container", "")
            .offset(0.0, 0.0, 1024.0, 1000.0),
    );
    let el = doc.append(
        container,
        FakeElement::div()
            .class("sticky")
            .attr("data-margin-top", "20")
            .offset(500.0, 12.0, 300.0, 100.0),
    );
    (doc, el)
}

fn activated(doc: &FakeDocument) -> (StickyController<FakeDocument>, StickyId) {
    let mut controller = StickyController::new(doc.clone(), ".sticky");
    let ids = controller.activate();
    assert_eq!(ids.len(), 1);
    (controller, ids[0])
}

fn scroll_to(
    doc: &FakeDocument,
    controller: &mut StickyController<FakeDocument>,
    id: StickyId,
    offset: f64,
) -> Option<Placement> {
    doc.set_scroll(offset);
    controller.handle_event(id, StickyEvent::Scroll)
}

#[test]
fn reference_scroll_sequence() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);

    scroll_to(&doc, &mut controller, id, 400.0);
    assert!(!doc.is_fixed(el));
    assert!(doc.styles(el).is_empty());

    scroll_to(&doc, &mut controller, id, 500.0);
    assert!(doc.is_fixed(el));
    assert_eq!(doc.top_px(el), Some(20.0));
    assert_eq!(doc.style(el, StyleProperty::Width).as_deref(), Some("300px"));
    assert_eq!(doc.style(el, StyleProperty::Left).as_deref(), Some("12px"));

    let clamped = scroll_to(&doc, &mut controller, id, 900.0);
    assert!(doc.is_fixed(el));
    assert_eq!(doc.top_px(el), Some(0.0));
    assert!(matches!(
        clamped,
        Some(Placement::Pinned {
            anchor: Anchor::ContainerBottom,
            ..
        })
    ));

    scroll_to(&doc, &mut controller, id, 300.0);
    assert!(!doc.is_fixed(el));
    assert!(doc.styles(el).is_empty());
}

#[test]
fn activation_reads_margin_and_geometry() {
    init_tracing();
    let (doc, el) = reference_page();
    let (controller, id) = activated(&doc);

    let state = controller.state(id).expect("registered");
    assert_eq!(state.margin_top, 20);
    assert_eq!(state.rect, Rect::new(500.0, 12.0, 300.0, 100.0));
    assert_eq!(state.container.rect, Rect::new(0.0, 0.0, 1024.0, 1000.0));
    assert!(!state.image);
    assert_eq!(controller.node(id), Some(&el));
    assert!(controller.is_active());
}

#[test]
fn empty_selector_match_is_inert() {
    init_tracing();
    let (doc, _) = reference_page();
    let mut controller = StickyController::new(doc.clone(), ".nothing-here");
    assert!(controller.targets().is_empty());
    assert!(controller.activate().is_empty());

    doc.set_scroll(900.0);
    controller.update();
    assert_eq!(controller.ids().count(), 0);
    assert_eq!(doc.style_writes(), 0);
}

#[test]
fn activation_waits_for_ready_document() {
    init_tracing();
    let (doc, el) = reference_page();
    doc.set_ready_state(ReadyState::Loading);
    doc.set_scroll(600.0);

    let mut controller = StickyController::new(doc.clone(), ".sticky");
    assert!(controller.activate().is_empty());
    assert!(!controller.is_active());
    assert!(!doc.is_fixed(el));

    let ids = controller.on_ready_state(ReadyState::Interactive);
    assert_eq!(ids.len(), 1);
    assert!(doc.is_fixed(el), "initial placement applied on activation");

    assert!(controller.on_ready_state(ReadyState::Complete).is_empty());
    assert_eq!(controller.ids().count(), 1);
}

#[test]
fn container_is_nearest_marked_ancestor() {
    init_tracing();
    let doc = FakeDocument::new(Viewport::new(800.0, 600.0), 2000.0);
    let outer = doc.append(
        doc.root(),
        FakeElement::div().attr("data-sticky-container", ""),
    );
    let inner = doc.append(outer, FakeElement::div().attr("data-sticky-container", ""));
    let plain = doc.append(inner, FakeElement::div());
    let el = doc.append(plain, FakeElement::div());

    assert_eq!(resolve_container(&doc, &el, "data-sticky-container"), inner);
    assert_eq!(resolve_container(&doc, &inner, "data-sticky-container"), inner);
}

#[test]
fn container_falls_back_to_document_root() {
    init_tracing();
    let doc = FakeDocument::new(Viewport::new(800.0, 600.0), 2000.0);
    let wrapper = doc.append(doc.root(), FakeElement::div());
    let el = doc.append(wrapper, FakeElement::div());
    assert_eq!(resolve_container(&doc, &el, "data-sticky-container"), doc.root());

    doc.detach(wrapper);
    assert_eq!(resolve_container(&doc, &el, "data-sticky-container"), doc.root());
}

#[test]
fn document_rect_sums_offset_chain() {
    init_tracing();
    let doc = FakeDocument::new(Viewport::new(800.0, 600.0), 2000.0);
    let a = doc.append(doc.root(), FakeElement::div().offset(100.0, 10.0, 700.0, 900.0));
    let b = doc.append(a, FakeElement::div().offset(50.0, 5.0, 600.0, 400.0));
    let c = doc.append(b, FakeElement::div().offset(25.0, 1.0, 200.0, 40.0));

    assert_eq!(document_rect(&doc, &c), Rect::new(175.0, 16.0, 200.0, 40.0));
}

#[test]
fn resize_refreshes_viewport_and_geometry() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    scroll_to(&doc, &mut controller, id, 500.0);
    assert!(doc.is_fixed(el));

    doc.set_viewport(Viewport::new(600.0, 700.0));
    doc.set_offset(el, 650.0, 8.0, 200.0, 100.0);
    let placement = controller.handle_event(id, StickyEvent::Resize);

    assert_eq!(controller.viewport(), Viewport::new(600.0, 700.0));
    assert_eq!(
        controller.state(id).map(|s| s.rect),
        Some(Rect::new(650.0, 8.0, 200.0, 100.0))
    );
    assert_eq!(
        placement,
        Some(Placement::Flowing {
            reason: FlowReason::BelowThreshold
        })
    );
    assert!(!doc.is_fixed(el));
}

#[test]
fn update_measures_natural_geometry_while_pinned() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    scroll_to(&doc, &mut controller, id, 600.0);
    assert!(doc.is_fixed(el));

    // A pinned element reports viewport offsets; update must unpin first.
    controller.update();
    assert_eq!(controller.state(id).map(|s| s.rect.top), Some(500.0));
    assert!(doc.is_fixed(el));
    assert_eq!(doc.top_px(el), Some(20.0));
}

#[test]
fn update_is_idempotent() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    scroll_to(&doc, &mut controller, id, 900.0);

    controller.update();
    let first = doc.styles(el);
    controller.update();
    assert_eq!(doc.styles(el), first);
    assert_eq!(doc.top_px(el), Some(0.0));
}

#[test]
fn update_picks_up_external_layout_changes() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    scroll_to(&doc, &mut controller, id, 460.0);
    assert!(!doc.is_fixed(el));

    // Content inserted above moves the element up.
    doc.set_offset(el, 300.0, 12.0, 300.0, 100.0);
    controller.update();
    assert!(doc.is_fixed(el));
    assert_eq!(doc.top_px(el), Some(20.0));
}

#[test]
fn element_taller_than_viewport_never_sticks() {
    init_tracing();
    let (doc, el) = reference_page();
    doc.set_viewport(Viewport::new(1024.0, 80.0));
    let (mut controller, id) = activated(&doc);

    for offset in [0.0, 480.0, 600.0, 900.0, 2000.0] {
        let placement = scroll_to(&doc, &mut controller, id, offset);
        assert_eq!(
            placement,
            Some(Placement::Flowing {
                reason: FlowReason::TallerThanViewport
            })
        );
        assert!(doc.styles(el).is_empty());
    }
}

#[test]
fn shrinking_viewport_unpins() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    scroll_to(&doc, &mut controller, id, 600.0);
    assert!(doc.is_fixed(el));

    doc.set_viewport(Viewport::new(1024.0, 50.0));
    controller.handle_event(id, StickyEvent::Resize);
    assert!(doc.styles(el).is_empty());
}

#[test]
fn image_load_remeasures() {
    init_tracing();
    let doc = FakeDocument::new(Viewport::new(1024.0, 800.0), 3000.0);
    let img = doc.append(
        doc.root(),
        FakeElement::img().class("sticky").offset(400.0, 0.0, 0.0, 0.0),
    );
    let (mut controller, id) = activated(&doc);
    assert_eq!(controller.state(id).map(|s| s.image), Some(true));
    assert_eq!(controller.state(id).map(|s| s.rect.height), Some(0.0));

    doc.set_offset(img, 400.0, 0.0, 320.0, 240.0);
    doc.set_scroll(500.0);
    controller.handle_event(id, StickyEvent::Scroll);
    assert_eq!(controller.state(id).map(|s| s.rect.height), Some(0.0));

    controller.handle_event(id, StickyEvent::ImageLoaded);
    assert_eq!(
        controller.state(id).map(|s| s.rect),
        Some(Rect::new(400.0, 0.0, 320.0, 240.0))
    );
    assert_eq!(doc.style(img, StyleProperty::Width).as_deref(), Some("320px"));
}

#[test]
fn detached_elements_are_left_alone() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    scroll_to(&doc, &mut controller, id, 600.0);
    let pinned = doc.styles(el);

    doc.detach(el);
    let writes = doc.style_writes();
    assert_eq!(scroll_to(&doc, &mut controller, id, 100.0), None);
    assert_eq!(controller.handle_event(id, StickyEvent::Resize), None);
    assert_eq!(doc.styles(el), pinned);
    assert_eq!(doc.style_writes(), writes);
}

#[test]
fn update_skips_detached_elements() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    scroll_to(&doc, &mut controller, id, 600.0);
    let rect = controller.state(id).map(|s| s.rect);
    let pinned = doc.styles(el);
    assert!(doc.is_fixed(el));

    doc.detach(el);
    let writes = doc.style_writes();
    controller.update();

    assert_eq!(controller.state(id).map(|s| s.rect), rect);
    assert_eq!(doc.styles(el), pinned);
    assert_eq!(doc.style_writes(), writes);
    assert_eq!(controller.update_rect(id), None);
    assert_eq!(controller.set_position(id), None);
}

#[test]
fn elements_are_positioned_independently() {
    init_tracing();
    let doc = FakeDocument::new(Viewport::new(1024.0, 800.0), 3000.0);
    let first = doc.append(
        doc.root(),
        FakeElement::div().class("sticky").offset(100.0, 0.0, 200.0, 50.0),
    );
    let second = doc.append(
        doc.root(),
        FakeElement::div()
            .class("sticky")
            .attr("data-margin-top", "60")
            .offset(1000.0, 300.0, 200.0, 50.0),
    );
    let mut controller = StickyController::new(doc.clone(), ".sticky");
    let ids = controller.activate();
    assert_eq!(ids.len(), 2);

    scroll_to(&doc, &mut controller, ids[0], 500.0);
    scroll_to(&doc, &mut controller, ids[1], 500.0);
    assert!(doc.is_fixed(first));
    assert!(!doc.is_fixed(second));
    assert_eq!(controller.state(ids[1]).map(|s| s.margin_top), Some(60));
}

#[test]
fn malformed_margin_defaults_to_zero() {
    init_tracing();
    let doc = FakeDocument::new(Viewport::new(1024.0, 800.0), 3000.0);
    doc.append(
        doc.root(),
        FakeElement::div()
            .class("sticky")
            .attr("data-margin-top", "lots")
            .offset(100.0, 0.0, 200.0, 50.0),
    );
    let (controller, id) = activated(&doc);
    assert_eq!(controller.state(id).map(|s| s.margin_top), Some(0));
}

#[test]
fn custom_attribute_names() {
    init_tracing();
    let doc = FakeDocument::new(Viewport::new(1024.0, 800.0), 3000.0);
    let bounds = doc.append(
        doc.root(),
        FakeElement::div()
            .attr("data-bounds", "")
            .offset(200.0, 0.0, 1024.0, 600.0),
    );
    doc.append(
        bounds,
        FakeElement::div()
            .class("sticky")
            .attr("data-offset", "10")
            .offset(50.0, 0.0, 100.0, 40.0),
    );

    let config = StickyConfig::default()
        .margin_attribute("data-offset")
        .container_attribute("data-bounds");
    let mut controller = StickyController::with_config(doc.clone(), ".sticky", config);
    let ids = controller.activate();

    let state = controller.state(ids[0]).expect("registered");
    assert_eq!(state.margin_top, 10);
    assert_eq!(state.container.node, bounds);
    assert_eq!(state.container.rect.bottom(), 800.0);
}

#[test]
fn only_position_width_top_left_are_written() {
    init_tracing();
    let (doc, el) = reference_page();
    let (mut controller, id) = activated(&doc);
    for offset in [0.0, 500.0, 900.0, 2000.0] {
        scroll_to(&doc, &mut controller, id, offset);
        for name in doc.styles(el).keys() {
            assert!(
                ["position", "width", "top", "left"].contains(name),
                "unexpected style property {name}"
            );
        }
    }
    assert_eq!(doc.attribute(&el, "style"), None);
}
