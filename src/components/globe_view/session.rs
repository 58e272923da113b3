use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlElement, MouseEvent};

use crate::globe::{
	ArcDatum, ArcStyle, CanvasRenderer, ControlsConfig, Globe, GlobeOptions, ListenerGuard,
	MarkerElement, OrbitCamera, OverlayRenderer, PointDatum, Scene, TrackballControls, outlines,
	ready,
};
use crate::store::{Location, ProviderClass, VisibleSets};

use super::tooltip::Tooltip;

const BACKGROUND: &str = "#040d21";
const ATMOSPHERE_COLOR: &str = "#3a228a";
const ATMOSPHERE_ALTITUDE: f64 = 0.25;
const CAMERA_DISTANCE: f64 = 400.0;
const INITIAL_LAT: f64 = 30.0;
const INITIAL_LON: f64 = 100.0;
const MIN_DISTANCE: f64 = 101.0;
const ROTATE_SPEED: f64 = 3.0;
const ZOOM_SPEED: f64 = 0.8;
const FRAME_DT: f64 = 0.016;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
	Initializing,
	Running,
	Disposed,
}

struct Resources {
	renderer: CanvasRenderer,
	overlay: OverlayRenderer,
	scene: Scene,
	camera: Rc<RefCell<OrbitCamera>>,
	controls: TrackballControls,
	globe: Rc<RefCell<Globe>>,
}

struct Inner {
	phase: Phase,
	container: HtmlElement,
	tooltip: Option<Rc<Tooltip>>,
	resources: Option<Resources>,
	raf_id: Rc<Cell<Option<i32>>>,
	raf_closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize_hook: Option<ListenerGuard>,
}

/// The owned lifecycle handle for one active globe view: every graphical
/// resource (renderers, scene, camera, controls, animation loop, tooltip)
/// lives and dies with it. Explicitly a value, never a global, so sessions
/// cannot interfere with each other.
pub struct RenderSession {
	inner: Rc<RefCell<Inner>>,
}

impl RenderSession {
	/// Synchronous "request init": returns the handle immediately and
	/// completes construction asynchronously on the event loop. The shared
	/// tooltip node exists from this point on; everything else appears only
	/// once the backend is ready. Disposing before completion is safe and
	/// leaks nothing.
	pub fn start(container: HtmlElement, snapshot: VisibleSets) -> Self {
		let tooltip = Rc::new(Tooltip::new());
		let inner = Rc::new(RefCell::new(Inner {
			phase: Phase::Initializing,
			container,
			tooltip: Some(tooltip.clone()),
			resources: None,
			raf_id: Rc::new(Cell::new(None)),
			raf_closure: Rc::new(RefCell::new(None)),
			resize_hook: None,
		}));
		debug!(
			"render session: initializing ({} locations, {} links)",
			snapshot.locations.len(),
			snapshot.links.len()
		);

		let task_inner = inner.clone();
		spawn_local(async move {
			ready().await;

			// Torn down while we were parked: only the tooltip existed and
			// dispose() already removed it. Construction never starts.
			if task_inner.borrow().phase == Phase::Disposed {
				debug!("render session: init abandoned, disposed while loading");
				return;
			}

			let container = task_inner.borrow().container.clone();
			match build(&container, &snapshot, &tooltip) {
				Ok(resources) => {
					// Construction ran in one synchronous segment, so no
					// dispose can have slipped in since the check above.
					task_inner.borrow_mut().resources = Some(resources);
					task_inner.borrow_mut().phase = Phase::Running;
					start_animation_loop(&task_inner);
					wire_resize(&task_inner);
					debug!("render session: running");
				}
				Err(err) => {
					// Fatal to this session only; the page stays up.
					error!("render session: init failed: {err:#}");
					let tooltip = task_inner.borrow_mut().tooltip.take();
					if let Some(tooltip) = tooltip {
						tooltip.remove();
					}
					task_inner.borrow_mut().phase = Phase::Disposed;
				}
			}
		});

		Self { inner }
	}

	/// Tear everything down. Idempotent; callable at any phase, including
	/// while initialization is still in flight.
	pub fn dispose(&self) {
		let mut guard = self.inner.borrow_mut();
		if guard.phase == Phase::Disposed {
			return;
		}
		let was_initializing = guard.phase == Phase::Initializing;
		guard.phase = Phase::Disposed;

		// Stop the loop first so no further frames can run.
		if let Some(id) = guard.raf_id.take() {
			let _ = web_sys::window().unwrap().cancel_animation_frame(id);
		}
		guard.raf_closure.borrow_mut().take();
		guard.resize_hook.take();

		let container = guard.container.clone();
		let resources = guard.resources.take();
		let tooltip = guard.tooltip.take();
		drop(guard);

		if let Some(resources) = resources {
			release(resources, &container);
		}
		if let Some(tooltip) = tooltip {
			tooltip.remove();
		}
		debug!(
			"render session: disposed{}",
			if was_initializing { " before init completed" } else { "" }
		);
	}

	/// True once [`RenderSession::dispose`] has run (or init failed).
	pub fn is_disposed(&self) -> bool {
		self.inner.borrow().phase == Phase::Disposed
	}
}

impl Drop for RenderSession {
	fn drop(&mut self) {
		// dispose() is idempotent; an explicit dispose before the drop
		// leaves this a no-op.
		self.dispose();
	}
}

/// Release every resource, each step guarded independently so one failure
/// cannot strand the rest.
fn release(resources: Resources, container: &HtmlElement) {
	let Resources {
		mut renderer,
		overlay,
		mut scene,
		camera: _camera,
		mut controls,
		globe,
	} = resources;
	controls.dispose();
	renderer.detach(container);
	overlay.detach(container);
	renderer.dispose();
	scene.remove_globe();
	// Marker elements and their listeners die with the globe.
	drop(globe);
}

fn surface_size(container: &HtmlElement) -> (f64, f64) {
	let width = container.client_width() as f64;
	let height = container.client_height() as f64;
	(
		if width > 0.0 { width } else { 800.0 },
		if height > 0.0 { height } else { 600.0 },
	)
}

fn build(container: &HtmlElement, snapshot: &VisibleSets, tooltip: &Rc<Tooltip>) -> Result<Resources> {
	let window = web_sys::window().unwrap();
	let (width, height) = surface_size(container);

	let mut renderer = CanvasRenderer::new()?;
	renderer.set_pixel_ratio(window.device_pixel_ratio());
	renderer.set_size(width, height);

	let overlay = OverlayRenderer::new()?;
	overlay.set_size(width, height);

	let mut scene = Scene::new(BACKGROUND);

	let mut camera = OrbitCamera::new(CAMERA_DISTANCE);
	camera.lat = INITIAL_LAT;
	camera.lon = INITIAL_LON;
	camera.set_aspect(width / height);

	let mut globe = build_globe(snapshot, tooltip);
	let material = globe.material_mut();
	material.color = "#3a228a".to_owned();
	material.emissive = "#220038".to_owned();
	material.emissive_intensity = 0.1;
	material.shininess = 0.7;

	globe.set_viewport(width, height);
	overlay.adopt_markers(&globe);
	let globe = Rc::new(RefCell::new(globe));
	scene.add_globe(globe.clone());

	let camera = Rc::new(RefCell::new(camera));
	let controls = TrackballControls::new(
		renderer.dom_element(),
		camera.clone(),
		ControlsConfig {
			rotate_speed: ROTATE_SPEED,
			zoom_speed: ZOOM_SPEED,
			min_distance: MIN_DISTANCE,
		},
	);
	let pov_globe = globe.clone();
	let pov_camera = camera.clone();
	controls.on_change(move || {
		pov_globe.borrow().set_point_of_view(&pov_camera.borrow());
	});

	// Attach last, once every fallible step is behind us.
	let _ = container.append_child(renderer.dom_element());
	let _ = container.append_child(overlay.dom_element());
	globe.borrow().set_point_of_view(&camera.borrow());

	Ok(Resources {
		renderer,
		overlay,
		scene,
		camera,
		controls,
		globe,
	})
}

fn build_globe(snapshot: &VisibleSets, tooltip: &Rc<Tooltip>) -> Globe {
	let by_id: HashMap<&str, &Location> = snapshot
		.locations
		.iter()
		.map(|location| (location.id.as_str(), location))
		.collect();

	let arcs: Vec<ArcDatum> = snapshot
		.links
		.iter()
		.filter_map(|link| {
			let from = by_id.get(link.from.as_str())?;
			let to = by_id.get(link.to.as_str())?;
			Some(ArcDatum {
				id: link.id.clone(),
				start: (from.lat, from.lng),
				end: (to.lat, to.lng),
				alt: link.arc_alt,
				active: link.active,
				order: link.order,
			})
		})
		.collect();

	let points: Vec<PointDatum> = snapshot
		.locations
		.iter()
		.map(|location| PointDatum {
			id: location.id.clone(),
			lat: location.lat,
			lng: location.lng,
			weight: location.weight,
		})
		.collect();

	let catalog: HashMap<String, Location> = snapshot
		.locations
		.iter()
		.map(|location| (location.id.clone(), location.clone()))
		.collect();
	let tooltip = tooltip.clone();
	let point_element = Box::new(move |datum: &PointDatum| match catalog.get(&datum.id) {
		Some(location) => marker_element(location, datum.weight, &tooltip),
		None => bare_marker(datum.weight),
	});

	Globe::new(GlobeOptions {
		outlines: outlines(),
		arcs,
		points,
		point_element,
		arc_style: ArcStyle {
			color: Box::new(|arc| {
				if arc.active { "#9cff00" } else { "#ff4000" }.to_owned()
			}),
			stroke: Box::new(|arc| if arc.active { 0.5 } else { 0.3 }),
			initial_gap: Box::new(|arc| arc.order as f64),
			dash_length: 0.9,
			dash_gap: 4.0,
			animate_ms: 1000.0,
		},
		atmosphere_color: ATMOSPHERE_COLOR.to_owned(),
		atmosphere_altitude: ATMOSPHERE_ALTITUDE,
	})
}

fn marker_shell(size: f64, color: &str) -> HtmlElement {
	let document = web_sys::window().unwrap().document().unwrap();
	let el: HtmlElement = document
		.create_element("div")
		.unwrap()
		.unchecked_into();
	el.set_class_name("globe-marker");
	let style = el.style();
	let _ = style.set_property("position", "absolute");
	let _ = style.set_property("display", "none");
	let _ = style.set_property("width", &format!("{size}px"));
	let _ = style.set_property("height", &format!("{size}px"));
	let _ = style.set_property("margin", &format!("-{half}px 0 0 -{half}px", half = size / 2.0));
	let _ = style.set_property("border-radius", "50%");
	let _ = style.set_property("background", color);
	let _ = style.set_property("box-shadow", "0 0 8px rgba(0, 0, 0, 0.6)");
	let _ = style.set_property("transition", "transform 120ms ease, opacity 120ms");
	let _ = style.set_property("opacity", "0.95");
	let _ = style.set_property("pointer-events", "auto");
	el
}

fn marker_size(weight: f64) -> f64 {
	(10.0 * weight.max(0.25).sqrt()).clamp(6.0, 16.0)
}

/// Marker with tooltip wiring: enter shows and fills the shared tooltip,
/// move keeps it tracking, leave hides it and resets the emphasis scale.
fn marker_element(location: &Location, weight: f64, tooltip: &Rc<Tooltip>) -> MarkerElement {
	let el = marker_shell(marker_size(weight), ProviderClass::marker_color(&location.provider));
	let mut hooks = Vec::new();

	{
		let tooltip = tooltip.clone();
		let location = location.clone();
		let target = el.clone();
		hooks.push(ListenerGuard::listen(&el, "mouseenter", move |ev: Event| {
			let ev: MouseEvent = ev.unchecked_into();
			tooltip.show(&location, ev.client_x() as f64, ev.client_y() as f64);
			let _ = target.style().set_property("transform", "scale(1.5)");
		}));
	}
	{
		let tooltip = tooltip.clone();
		hooks.push(ListenerGuard::listen(&el, "mousemove", move |ev: Event| {
			let ev: MouseEvent = ev.unchecked_into();
			tooltip.track(ev.client_x() as f64, ev.client_y() as f64);
		}));
	}
	{
		let tooltip = tooltip.clone();
		let target = el.clone();
		hooks.push(ListenerGuard::listen(&el, "mouseleave", move |_| {
			tooltip.hide();
			let _ = target.style().set_property("transform", "scale(1)");
		}));
	}

	MarkerElement { el, hooks }
}

fn bare_marker(weight: f64) -> MarkerElement {
	MarkerElement {
		el: marker_shell(marker_size(weight), "#888"),
		hooks: Vec::new(),
	}
}

fn start_animation_loop(inner: &Rc<RefCell<Inner>>) {
	let raf_id = inner.borrow().raf_id.clone();
	let raf_closure = inner.borrow().raf_closure.clone();

	let tick_inner = inner.clone();
	let tick_closure = raf_closure.clone();
	let tick_raf_id = raf_id.clone();
	*raf_closure.borrow_mut() = Some(Closure::new(move || {
		{
			let mut guard = tick_inner.borrow_mut();
			if guard.phase != Phase::Running {
				return;
			}
			if let Some(resources) = guard.resources.as_mut() {
				resources.controls.update();
				resources.globe.borrow_mut().advance(FRAME_DT);
				let camera = resources.camera.borrow();
				resources.renderer.render(&resources.scene, &camera);
				resources.overlay.render(&resources.globe.borrow(), &camera);
			}
		}
		// Reschedule outside the borrow; exactly one cycle is ever pending.
		if let Some(ref closure) = *tick_closure.borrow() {
			let id = web_sys::window()
				.unwrap()
				.request_animation_frame(closure.as_ref().unchecked_ref())
				.ok();
			tick_raf_id.set(id);
		}
	}));

	if let Some(ref closure) = *raf_closure.borrow() {
		let id = web_sys::window()
			.unwrap()
			.request_animation_frame(closure.as_ref().unchecked_ref())
			.ok();
		raf_id.set(id);
	}
}

fn wire_resize(inner: &Rc<RefCell<Inner>>) {
	let window = web_sys::window().unwrap();
	let resize_inner = inner.clone();
	let hook = ListenerGuard::listen(&window, "resize", move |_| {
		let mut guard = resize_inner.borrow_mut();
		if guard.phase != Phase::Running {
			return;
		}
		let (width, height) = surface_size(&guard.container);
		if let Some(resources) = guard.resources.as_mut() {
			resources.renderer.set_size(width, height);
			resources.overlay.set_size(width, height);
			{
				let mut camera = resources.camera.borrow_mut();
				camera.set_aspect(width / height);
			}
			let globe = resources.globe.borrow();
			globe.set_viewport(width, height);
			globe.set_point_of_view(&resources.camera.borrow());
		}
	});
	inner.borrow_mut().resize_hook = Some(hook);
}
