use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, PointerEvent, WheelEvent};

use super::camera::OrbitCamera;
use super::dom::ListenerGuard;

const MAX_LAT: f64 = 85.0;
const MAX_DISTANCE: f64 = 800.0;
const DRAG_DEGREES_PER_PX: f64 = 0.08;
const DAMPING: f64 = 0.9;
const VELOCITY_FLOOR: f64 = 0.002;

/// Tuning knobs, fixed at construction.
#[derive(Clone, Copy)]
pub struct ControlsConfig {
	pub rotate_speed: f64,
	pub zoom_speed: f64,
	pub min_distance: f64,
}

type ChangeListeners = Rc<RefCell<Vec<Box<dyn Fn()>>>>;

/// Drag-to-rotate / wheel-to-zoom camera controls bound to the renderer
/// canvas. Change listeners fire after every camera mutation, including the
/// momentum applied by [`TrackballControls::update`].
pub struct TrackballControls {
	camera: Rc<RefCell<OrbitCamera>>,
	listeners: ChangeListeners,
	dragging: Rc<Cell<bool>>,
	velocity: Rc<Cell<(f64, f64)>>,
	hooks: Vec<ListenerGuard>,
}

fn rotate(camera: &Rc<RefCell<OrbitCamera>>, dlon: f64, dlat: f64) {
	let mut camera = camera.borrow_mut();
	camera.lon += dlon;
	camera.lat = (camera.lat + dlat).clamp(-MAX_LAT, MAX_LAT);
}

fn notify(listeners: &ChangeListeners) {
	for listener in listeners.borrow().iter() {
		listener();
	}
}

impl TrackballControls {
	pub fn new(
		canvas: &HtmlCanvasElement,
		camera: Rc<RefCell<OrbitCamera>>,
		config: ControlsConfig,
	) -> Self {
		let listeners: ChangeListeners = Rc::default();
		let dragging = Rc::new(Cell::new(false));
		let velocity = Rc::new(Cell::new((0.0_f64, 0.0_f64)));
		let last = Rc::new(Cell::new((0.0_f64, 0.0_f64)));
		let _ = canvas.style().set_property("cursor", "grab");

		let mut hooks = Vec::new();

		{
			let dragging = dragging.clone();
			let last = last.clone();
			hooks.push(ListenerGuard::listen(canvas, "pointerdown", move |ev: Event| {
				let ev: PointerEvent = ev.unchecked_into();
				dragging.set(true);
				last.set((ev.client_x() as f64, ev.client_y() as f64));
				if let Some(target) = ev.target()
					&& let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
				{
					el.set_pointer_capture(ev.pointer_id()).ok();
					el.style().set_property("cursor", "grabbing").ok();
				}
			}));
		}

		{
			let camera = camera.clone();
			let listeners = listeners.clone();
			let dragging = dragging.clone();
			let velocity = velocity.clone();
			let last = last.clone();
			hooks.push(ListenerGuard::listen(canvas, "pointermove", move |ev: Event| {
				if !dragging.get() {
					return;
				}
				let ev: PointerEvent = ev.unchecked_into();
				let (lx, ly) = last.get();
				let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
				last.set((x, y));
				let step = config.rotate_speed * DRAG_DEGREES_PER_PX;
				let (dlon, dlat) = (-(x - lx) * step, (y - ly) * step);
				rotate(&camera, dlon, dlat);
				velocity.set((dlon, dlat));
				notify(&listeners);
			}));
		}

		for event in ["pointerup", "pointerleave"] {
			let dragging = dragging.clone();
			hooks.push(ListenerGuard::listen(canvas, event, move |ev: Event| {
				dragging.set(false);
				if let Some(target) = ev.target()
					&& let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
				{
					el.style().set_property("cursor", "grab").ok();
				}
			}));
		}

		{
			let camera = camera.clone();
			let listeners = listeners.clone();
			hooks.push(ListenerGuard::listen(canvas, "wheel", move |ev: Event| {
				ev.prevent_default();
				let ev: WheelEvent = ev.unchecked_into();
				let factor = if ev.delta_y() > 0.0 {
					1.0 + 0.05 * config.zoom_speed
				} else {
					1.0 / (1.0 + 0.05 * config.zoom_speed)
				};
				{
					let mut camera = camera.borrow_mut();
					camera.distance =
						(camera.distance * factor).clamp(config.min_distance, MAX_DISTANCE);
				}
				notify(&listeners);
			}));
		}

		Self {
			camera,
			listeners,
			dragging,
			velocity,
			hooks,
		}
	}

	pub fn on_change(&self, callback: impl Fn() + 'static) {
		self.listeners.borrow_mut().push(Box::new(callback));
	}

	/// Per-frame advance: decaying momentum once the pointer releases.
	pub fn update(&mut self) {
		if self.dragging.get() {
			return;
		}
		let (vlon, vlat) = self.velocity.get();
		if vlon.abs() < VELOCITY_FLOOR && vlat.abs() < VELOCITY_FLOOR {
			return;
		}
		rotate(&self.camera, vlon, vlat);
		self.velocity.set((vlon * DAMPING, vlat * DAMPING));
		notify(&self.listeners);
	}

	/// Detach every listener. Safe to call more than once.
	pub fn dispose(&mut self) {
		self.hooks.clear();
		self.listeners.borrow_mut().clear();
	}
}
