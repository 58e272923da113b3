//! The rendering backend for the globe view: a canvas-2D globe renderer
//! plus a DOM overlay for per-location markers. The surface is datasets
//! in, per-item styling callbacks, and `set_point_of_view` for overlay
//! sync; the drawing internals stay private to this module.

mod camera;
mod controls;
mod dom;
mod draw;
mod geo;
mod math;
mod renderer;
mod scene;

pub use camera::OrbitCamera;
pub use controls::{ControlsConfig, TrackballControls};
pub use dom::{ListenerGuard, ready};
pub use geo::outlines;
pub use math::{GLOBE_RADIUS, Vec3};
pub use renderer::{CanvasRenderer, OverlayRenderer};
pub use scene::{AmbientLight, DirectionalLight, Scene};

use std::cell::Cell;

use web_sys::HtmlElement;

/// One background outline ring, lat/lng pairs in degrees.
#[derive(Clone, Debug)]
pub struct PolygonRing(pub Vec<(f64, f64)>);

/// One rendered arc; endpoint coordinates are joined from the link's
/// locations before the globe ever sees it.
#[derive(Clone, Debug)]
pub struct ArcDatum {
	pub id: String,
	pub start: (f64, f64),
	pub end: (f64, f64),
	pub alt: f64,
	pub active: bool,
	pub order: u32,
}

/// One overlay point.
#[derive(Clone, Debug)]
pub struct PointDatum {
	pub id: String,
	pub lat: f64,
	pub lng: f64,
	pub weight: f64,
}

/// A marker element plus the listener guards that keep its event wiring
/// alive; dropping it detaches the listeners with it.
pub struct MarkerElement {
	pub el: HtmlElement,
	pub hooks: Vec<ListenerGuard>,
}

/// Per-item arc styling callbacks and the shared dash timing.
pub struct ArcStyle {
	pub color: Box<dyn Fn(&ArcDatum) -> String>,
	pub stroke: Box<dyn Fn(&ArcDatum) -> f64>,
	pub initial_gap: Box<dyn Fn(&ArcDatum) -> f64>,
	/// Dash length as a fraction of the arc's on-screen length.
	pub dash_length: f64,
	/// Gap between dashes, in multiples of the arc's on-screen length.
	pub dash_gap: f64,
	/// Milliseconds for one full dash cycle.
	pub animate_ms: f64,
}

/// Static sphere styling, exposed through [`Globe::material_mut`].
pub struct GlobeMaterial {
	pub color: String,
	pub emissive: String,
	pub emissive_intensity: f64,
	pub shininess: f64,
}

impl Default for GlobeMaterial {
	fn default() -> Self {
		Self {
			color: "#2a2a66".to_owned(),
			emissive: "#101030".to_owned(),
			emissive_intensity: 0.1,
			shininess: 0.7,
		}
	}
}

/// Everything a globe is constructed from.
pub struct GlobeOptions {
	pub outlines: Vec<PolygonRing>,
	pub arcs: Vec<ArcDatum>,
	pub points: Vec<PointDatum>,
	/// Per-item DOM element factory for overlay markers.
	pub point_element: Box<dyn Fn(&PointDatum) -> MarkerElement>,
	pub arc_style: ArcStyle,
	pub atmosphere_color: String,
	pub atmosphere_altitude: f64,
}

struct Marker {
	datum: PointDatum,
	element: MarkerElement,
}

/// The globe object: static outline data, the current arc/point datasets,
/// material, and the overlay markers it positions against the camera.
pub struct Globe {
	outlines: Vec<PolygonRing>,
	arcs: Vec<ArcDatum>,
	arc_style: ArcStyle,
	markers: Vec<Marker>,
	material: GlobeMaterial,
	atmosphere_color: String,
	atmosphere_altitude: f64,
	viewport: Cell<(f64, f64)>,
	flow_ms: f64,
}

impl Globe {
	/// Build the globe and its marker elements. The elements come back
	/// detached; an [`OverlayRenderer`] adopts them into the document.
	pub fn new(options: GlobeOptions) -> Self {
		let markers = options
			.points
			.iter()
			.map(|datum| Marker {
				datum: datum.clone(),
				element: (options.point_element)(datum),
			})
			.collect();
		Self {
			outlines: options.outlines,
			arcs: options.arcs,
			arc_style: options.arc_style,
			markers,
			material: GlobeMaterial::default(),
			atmosphere_color: options.atmosphere_color,
			atmosphere_altitude: options.atmosphere_altitude,
			viewport: Cell::new((0.0, 0.0)),
			flow_ms: 0.0,
		}
	}

	pub fn material(&self) -> &GlobeMaterial {
		&self.material
	}

	pub fn material_mut(&mut self) -> &mut GlobeMaterial {
		&mut self.material
	}

	pub fn marker_elements(&self) -> impl Iterator<Item = &HtmlElement> {
		self.markers.iter().map(|marker| &marker.element.el)
	}

	/// The overlay projection surface, kept in CSS pixels by the session.
	pub fn set_viewport(&self, width: f64, height: f64) {
		self.viewport.set((width, height));
	}

	/// Advance the dash animation clock.
	pub fn advance(&mut self, dt_secs: f64) {
		self.flow_ms += dt_secs * 1000.0;
	}

	/// Reproject every overlay marker for the given camera, hiding markers
	/// on the far hemisphere. Called on every interactive camera change and
	/// once per overlay render pass.
	pub fn set_point_of_view(&self, camera: &OrbitCamera) {
		let (width, height) = self.viewport.get();
		for marker in &self.markers {
			let p = Vec3::from_lat_lng(marker.datum.lat, marker.datum.lng, GLOBE_RADIUS);
			let style = marker.element.el.style();
			match camera.project(p, width, height) {
				Some((x, y)) if camera.facing(p) => {
					let _ = style.set_property("left", &format!("{x:.1}px"));
					let _ = style.set_property("top", &format!("{y:.1}px"));
					let _ = style.set_property("display", "block");
				}
				_ => {
					let _ = style.set_property("display", "none");
				}
			}
		}
	}

	pub(crate) fn outlines(&self) -> &[PolygonRing] {
		&self.outlines
	}

	pub(crate) fn arcs(&self) -> &[ArcDatum] {
		&self.arcs
	}

	pub(crate) fn arc_style(&self) -> &ArcStyle {
		&self.arc_style
	}

	pub(crate) fn atmosphere(&self) -> (&str, f64) {
		(&self.atmosphere_color, self.atmosphere_altitude)
	}

	pub(crate) fn flow_ms(&self) -> f64 {
		self.flow_ms
	}
}
