//! Browser-side lifecycle tests for the render session: attachment,
//! teardown idempotence, the dispose-during-init race, resize, and the
//! shared tooltip.

#![cfg(target_arch = "wasm32")]

use std::sync::Arc;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent};

use cloud_globe_canvas::components::globe_view::RenderSession;
use cloud_globe_canvas::globe::ready;
use cloud_globe_canvas::store::{Link, Location, VisibleSets};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
	web_sys::window().unwrap().document().unwrap()
}

fn location(id: &str, provider: &str, lat: f64, lng: f64) -> Location {
	Location {
		id: id.into(),
		name: id.to_uppercase(),
		country: "Testland".into(),
		lat,
		lng,
		provider: provider.into(),
		region: "test-region".into(),
		weight: 1.0,
	}
}

fn sample_sets() -> VisibleSets {
	let locations = vec![
		location("a", "aws-east", 10.0, 20.0),
		location("b", "gcp-west", -5.0, 40.0),
		location("c", "azure-north", 48.0, 2.0),
	];
	let links = vec![
		Link {
			id: "l1".into(),
			from: "a".into(),
			to: "b".into(),
			arc_alt: 0.3,
			active: true,
			order: 0,
		},
		Link {
			id: "l2".into(),
			from: "b".into(),
			to: "c".into(),
			arc_alt: 0.2,
			active: false,
			order: 1,
		},
	];
	VisibleSets {
		locations: Arc::new(locations),
		links: Arc::new(links),
	}
}

fn mount(width_px: f64, height_px: f64) -> HtmlElement {
	let el: HtmlElement = document().create_element("div").unwrap().unchecked_into();
	let style = el.style();
	style
		.set_property("width", &format!("{width_px}px"))
		.unwrap();
	style
		.set_property("height", &format!("{height_px}px"))
		.unwrap();
	document().body().unwrap().append_child(&el).unwrap();
	el
}

async fn settle(frames: usize) {
	for _ in 0..frames {
		ready().await;
	}
}

fn tooltip_count() -> u32 {
	document().query_selector_all(".globe-tooltip").unwrap().length()
}

fn marker_count(container: &HtmlElement) -> u32 {
	container.query_selector_all(".globe-marker").unwrap().length()
}

#[wasm_bindgen_test]
async fn session_attaches_renderers_markers_and_tooltip() {
	let container = mount(400.0, 300.0);
	let sets = sample_sets();
	let session = RenderSession::start(container.clone(), sets.clone());
	settle(3).await;

	// canvas renderer + overlay renderer
	assert_eq!(container.child_element_count(), 2);
	assert_eq!(marker_count(&container), sets.locations.len() as u32);
	assert_eq!(tooltip_count(), 1);

	session.dispose();
	assert_eq!(container.child_element_count(), 0);
	assert_eq!(tooltip_count(), 0);
	container.remove();
}

#[wasm_bindgen_test]
async fn dispose_twice_is_a_no_op() {
	let container = mount(400.0, 300.0);
	let session = RenderSession::start(container.clone(), sample_sets());
	settle(3).await;

	session.dispose();
	assert!(session.is_disposed());
	session.dispose();
	assert!(session.is_disposed());
	assert_eq!(container.child_element_count(), 0);
	assert_eq!(tooltip_count(), 0);
	container.remove();
}

#[wasm_bindgen_test]
async fn dispose_before_init_completes_leaks_nothing() {
	let container = mount(400.0, 300.0);
	let session = RenderSession::start(container.clone(), sample_sets());
	// no await between start and dispose: initialization is still parked
	session.dispose();
	settle(4).await;

	assert_eq!(container.child_element_count(), 0);
	assert_eq!(tooltip_count(), 0);
	assert_eq!(marker_count(&container), 0);
	container.remove();
}

#[wasm_bindgen_test]
async fn resize_updates_renderers_and_camera_only() {
	let container = mount(400.0, 300.0);
	let sets = sample_sets();
	let locations_before = sets.locations.clone();
	let links_before = sets.links.clone();
	let session = RenderSession::start(container.clone(), sets);
	settle(3).await;

	let dpr = web_sys::window().unwrap().device_pixel_ratio().max(1.0);
	let canvas: HtmlCanvasElement = container
		.query_selector("canvas")
		.unwrap()
		.unwrap()
		.unchecked_into();
	assert_eq!(canvas.width(), (400.0 * dpr) as u32);

	container.style().set_property("width", "500px").unwrap();
	container.style().set_property("height", "250px").unwrap();
	let resize = web_sys::Event::new("resize").unwrap();
	web_sys::window().unwrap().dispatch_event(&resize).unwrap();

	assert_eq!(canvas.width(), (500.0 * dpr) as u32);
	assert_eq!(canvas.height(), (250.0 * dpr) as u32);
	// the inputs the session renders from are untouched
	assert_eq!(locations_before.len(), 3);
	assert_eq!(links_before.len(), 2);

	session.dispose();
	container.remove();
}

#[wasm_bindgen_test]
async fn marker_hover_drives_the_shared_tooltip() {
	let container = mount(400.0, 300.0);
	let session = RenderSession::start(container.clone(), sample_sets());
	settle(3).await;

	let marker: HtmlElement = container
		.query_selector(".globe-marker")
		.unwrap()
		.unwrap()
		.unchecked_into();
	let tooltip: HtmlElement = document()
		.query_selector(".globe-tooltip")
		.unwrap()
		.unwrap()
		.unchecked_into();
	assert_eq!(tooltip.style().get_property_value("display").unwrap(), "none");

	let enter = MouseEvent::new("mouseenter").unwrap();
	marker.dispatch_event(&enter).unwrap();
	assert_eq!(tooltip.style().get_property_value("display").unwrap(), "block");
	let body = tooltip.inner_html();
	assert!(body.contains("id: a"), "tooltip body: {body}");
	assert!(body.contains("provider: aws-east"), "tooltip body: {body}");
	assert!(body.contains("10.0000"), "tooltip body: {body}");
	assert_eq!(
		marker.style().get_property_value("transform").unwrap(),
		"scale(1.5)"
	);

	let leave = MouseEvent::new("mouseleave").unwrap();
	marker.dispatch_event(&leave).unwrap();
	assert_eq!(tooltip.style().get_property_value("display").unwrap(), "none");
	assert_eq!(
		marker.style().get_property_value("transform").unwrap(),
		"scale(1)"
	);

	session.dispose();
	container.remove();
}
