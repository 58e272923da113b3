use std::cell::RefCell;
use std::rc::Rc;

use super::Globe;
use super::math::Vec3;

/// Flat fill light.
pub struct AmbientLight {
	pub intensity: f64,
}

/// Single directional light; `direction` points from the light toward the
/// globe and biases the sphere shading highlight.
pub struct DirectionalLight {
	pub intensity: f64,
	pub direction: Vec3,
}

/// Minimal scene graph: a background, two lights, and at most one globe.
pub struct Scene {
	pub background: String,
	pub ambient: AmbientLight,
	pub directional: DirectionalLight,
	globe: Option<Rc<RefCell<Globe>>>,
}

impl Scene {
	pub fn new(background: &str) -> Self {
		Self {
			background: background.to_owned(),
			ambient: AmbientLight { intensity: 0.3 },
			directional: DirectionalLight {
				intensity: 0.8,
				direction: Vec3::new(-800.0, 2000.0, 400.0).normalize(),
			},
			globe: None,
		}
	}

	pub fn add_globe(&mut self, globe: Rc<RefCell<Globe>>) {
		self.globe = Some(globe);
	}

	/// Detach the globe; a no-op when none is attached.
	pub fn remove_globe(&mut self) -> Option<Rc<RefCell<Globe>>> {
		self.globe.take()
	}

	pub fn globe(&self) -> Option<&Rc<RefCell<Globe>>> {
		self.globe.as_ref()
	}
}
