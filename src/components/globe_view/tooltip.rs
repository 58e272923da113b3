use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::store::Location;

/// The one tooltip node a session shares across all of its markers. Marker
/// elements only notify it of enter/move/leave; they hold no tooltip state
/// of their own.
pub struct Tooltip {
	el: HtmlElement,
}

impl Tooltip {
	/// Create the node and attach it to `document.body`, hidden.
	pub fn new() -> Self {
		let document = web_sys::window().unwrap().document().unwrap();
		let el: HtmlElement = document
			.create_element("div")
			.unwrap()
			.unchecked_into();
		el.set_class_name("globe-tooltip");
		let style = el.style();
		let _ = style.set_property("position", "fixed");
		let _ = style.set_property("pointer-events", "none");
		let _ = style.set_property("background", "rgba(10, 12, 18, 0.95)");
		let _ = style.set_property("color", "#fff");
		let _ = style.set_property("padding", "8px 10px");
		let _ = style.set_property("border-radius", "8px");
		let _ = style.set_property("box-shadow", "0 6px 18px rgba(0, 0, 0, 0.6)");
		let _ = style.set_property("display", "none");
		let _ = style.set_property("z-index", "9999");
		let _ = style.set_property("font-size", "13px");
		let _ = style.set_property("max-width", "260px");
		if let Some(body) = document.body() {
			let _ = body.append_child(&el);
		}
		Self { el }
	}

	/// Populate from a location and show at the pointer.
	pub fn show(&self, location: &Location, x: f64, y: f64) {
		self.el.set_inner_html(&render_body(location));
		self.track(x, y);
		let _ = self.el.style().set_property("display", "block");
	}

	/// Follow the pointer with a small offset.
	pub fn track(&self, x: f64, y: f64) {
		let style = self.el.style();
		let _ = style.set_property("left", &format!("{}px", x + 12.0));
		let _ = style.set_property("top", &format!("{}px", y + 12.0));
	}

	pub fn hide(&self) {
		let _ = self.el.style().set_property("display", "none");
	}

	/// Detach the node from the document. Safe when already detached.
	pub fn remove(&self) {
		self.hide();
		if self.el.parent_node().is_some() {
			self.el.remove();
		}
	}
}

fn render_body(location: &Location) -> String {
	let title = if location.country.is_empty() {
		&location.name
	} else {
		&location.country
	};
	format!(
		"<div style=\"font-weight:600;margin-bottom:6px\">{title}</div>\
		 <div style=\"font-size:12px;color:#cfd8dc\">id: {id}</div>\
		 <div style=\"font-size:12px;color:#cfd8dc\">provider: {provider}</div>\
		 <div style=\"font-size:12px;color:#cfd8dc\">region: {region}</div>\
		 <div style=\"margin-top:6px;font-size:12px;color:#a0a0a0\">lat {lat:.4}, lng {lng:.4}</div>",
		id = location.id,
		provider = location.provider,
		region = if location.region.is_empty() { "-" } else { &location.region },
		lat = location.lat,
		lng = location.lng,
	)
}
