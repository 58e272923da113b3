use anyhow::{Context, Result};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Node};

use super::camera::OrbitCamera;
use super::dom::js_err;
use super::scene::Scene;
use super::{Globe, draw};

fn document() -> Result<web_sys::Document> {
	web_sys::window()
		.context("no window")?
		.document()
		.context("no document")
}

/// Remove `el` from `container` if (and only if) it is still attached
/// there. Tolerates every already-detached state.
fn detach_from(el: &Node, container: &Node) {
	if let Some(parent) = el.parent_node()
		&& parent.is_same_node(Some(container))
	{
		let _ = container.remove_child(el);
	}
}

/// Main renderer: a 2D canvas the scene is drawn into every frame.
pub struct CanvasRenderer {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	pixel_ratio: f64,
	width: f64,
	height: f64,
}

impl CanvasRenderer {
	pub fn new() -> Result<Self> {
		let canvas: HtmlCanvasElement = document()?
			.create_element("canvas")
			.map_err(js_err)?
			.unchecked_into();
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(js_err)?
			.context("canvas 2d context unavailable")?
			.unchecked_into();
		let _ = canvas.style().set_property("display", "block");
		Ok(Self {
			canvas,
			ctx,
			pixel_ratio: 1.0,
			width: 0.0,
			height: 0.0,
		})
	}

	pub fn dom_element(&self) -> &HtmlCanvasElement {
		&self.canvas
	}

	pub fn set_pixel_ratio(&mut self, ratio: f64) {
		self.pixel_ratio = ratio.max(1.0);
	}

	/// Resize the backing store (device pixels) and the CSS box together.
	pub fn set_size(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.canvas.set_width((width * self.pixel_ratio) as u32);
		self.canvas.set_height((height * self.pixel_ratio) as u32);
		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{width}px"));
		let _ = style.set_property("height", &format!("{height}px"));
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn render(&self, scene: &Scene, camera: &OrbitCamera) {
		self.ctx.save();
		let _ = self.ctx.scale(self.pixel_ratio, self.pixel_ratio);
		draw::render_scene(&self.ctx, self.width, self.height, scene, camera);
		self.ctx.restore();
	}

	pub fn detach(&self, container: &HtmlElement) {
		detach_from(self.canvas.as_ref(), container);
	}

	/// Release the canvas backing store.
	pub fn dispose(&mut self) {
		self.canvas.set_width(1);
		self.canvas.set_height(1);
	}
}

/// Secondary renderer: an absolutely positioned layer holding the DOM
/// markers. Markers receive pointer events; the layer itself does not.
pub struct OverlayRenderer {
	root: HtmlElement,
}

impl OverlayRenderer {
	pub fn new() -> Result<Self> {
		let root: HtmlElement = document()?
			.create_element("div")
			.map_err(js_err)?
			.unchecked_into();
		root.set_class_name("globe-overlay");
		let style = root.style();
		let _ = style.set_property("position", "absolute");
		let _ = style.set_property("top", "0");
		let _ = style.set_property("left", "0");
		let _ = style.set_property("overflow", "hidden");
		let _ = style.set_property("pointer-events", "none");
		Ok(Self { root })
	}

	pub fn dom_element(&self) -> &HtmlElement {
		&self.root
	}

	/// Move the globe's marker elements into this layer.
	pub fn adopt_markers(&self, globe: &Globe) {
		for el in globe.marker_elements() {
			let _ = self.root.append_child(el);
		}
	}

	pub fn set_size(&self, width: f64, height: f64) {
		let style = self.root.style();
		let _ = style.set_property("width", &format!("{width}px"));
		let _ = style.set_property("height", &format!("{height}px"));
	}

	/// One overlay pass: sync marker positions to the camera.
	pub fn render(&self, globe: &Globe, camera: &OrbitCamera) {
		globe.set_point_of_view(camera);
	}

	pub fn detach(&self, container: &HtmlElement) {
		detach_from(self.root.as_ref(), container);
	}
}
