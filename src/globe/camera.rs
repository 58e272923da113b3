use super::math::{GLOBE_RADIUS, Vec3};

/// Perspective camera orbiting the globe origin. `lat`/`lon` are the
/// surface point (degrees) the camera looks down on, `distance` the eye
/// distance from the origin.
pub struct OrbitCamera {
	pub lat: f64,
	pub lon: f64,
	pub distance: f64,
	pub fov_y: f64,
	pub aspect: f64,
	focal: f64,
}

impl OrbitCamera {
	pub fn new(distance: f64) -> Self {
		let mut camera = Self {
			lat: 0.0,
			lon: 0.0,
			distance,
			fov_y: 50.0,
			aspect: 1.0,
			focal: 0.0,
		};
		camera.update_projection();
		camera
	}

	/// Recompute the cached focal scale. Call after changing `fov_y`;
	/// [`OrbitCamera::set_aspect`] does it for you.
	pub fn update_projection(&mut self) {
		self.focal = 1.0 / (self.fov_y.to_radians() / 2.0).tan();
	}

	pub fn set_aspect(&mut self, aspect: f64) {
		self.aspect = aspect.max(f64::EPSILON);
		self.update_projection();
	}

	/// World point to camera space. +z points from the globe toward the
	/// eye, so the eye sits at z = `distance`.
	pub fn view(&self, p: Vec3) -> Vec3 {
		let (sin_lon, cos_lon) = self.lon.to_radians().sin_cos();
		let (sin_lat, cos_lat) = self.lat.to_radians().sin_cos();
		let x = p.x * cos_lon - p.z * sin_lon;
		let z1 = p.x * sin_lon + p.z * cos_lon;
		let y = p.y * cos_lat - z1 * sin_lat;
		let z = p.y * sin_lat + z1 * cos_lat;
		Vec3::new(x, y, z)
	}

	/// World point to screen pixels; `None` once it reaches the near plane.
	pub fn project(&self, p: Vec3, width: f64, height: f64) -> Option<(f64, f64)> {
		let v = self.view(p);
		let depth = self.distance - v.z;
		if depth <= 1.0 {
			return None;
		}
		let x_ndc = self.focal / self.aspect * v.x / depth;
		let y_ndc = self.focal * v.y / depth;
		Some((width / 2.0 * (1.0 + x_ndc), height / 2.0 * (1.0 - y_ndc)))
	}

	/// Whether a point at or above the surface is on the near side of the
	/// horizon. The threshold relaxes with altitude so raised arc samples
	/// peeking over the limb stay visible.
	pub fn facing(&self, p: Vec3) -> bool {
		let r = p.length().max(GLOBE_RADIUS);
		self.view(p).z >= GLOBE_RADIUS * GLOBE_RADIUS / self.distance * (GLOBE_RADIUS / r)
	}

	/// On-screen radius of the globe silhouette.
	pub fn silhouette_radius(&self, height: f64) -> f64 {
		let horizon = (self.distance * self.distance - GLOBE_RADIUS * GLOBE_RADIUS)
			.max(1.0)
			.sqrt();
		GLOBE_RADIUS / horizon * self.focal * height / 2.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn origin_projects_to_viewport_center() {
		let camera = OrbitCamera::new(400.0);
		let (x, y) = camera.project(Vec3::default(), 800.0, 600.0).expect("in front");
		assert!((x - 400.0).abs() < 1e-9);
		assert!((y - 300.0).abs() < 1e-9);
	}

	#[test]
	fn looked_at_surface_point_faces_the_camera() {
		let mut camera = OrbitCamera::new(400.0);
		camera.lat = 34.0;
		camera.lon = -118.0;
		let p = Vec3::from_lat_lng(34.0, -118.0, GLOBE_RADIUS);
		assert!(camera.facing(p));
		let v = camera.view(p);
		assert!((v.z - GLOBE_RADIUS).abs() < 1e-9);
	}

	#[test]
	fn antipode_is_hidden() {
		let camera = OrbitCamera::new(400.0);
		let back = Vec3::from_lat_lng(0.0, 180.0, GLOBE_RADIUS);
		assert!(!camera.facing(back));
	}

	#[test]
	fn aspect_scales_x_only() {
		let mut camera = OrbitCamera::new(400.0);
		camera.set_aspect(1.0);
		let p = Vec3::from_lat_lng(10.0, 20.0, GLOBE_RADIUS);
		let (x1, y1) = camera.project(p, 800.0, 600.0).expect("in front");
		camera.set_aspect(2.0);
		let (x2, y2) = camera.project(p, 800.0, 600.0).expect("in front");
		assert!((y1 - y2).abs() < 1e-9);
		assert!((x1 - 400.0).abs() > 1e-6);
		assert!(((x2 - 400.0) - (x1 - 400.0) / 2.0).abs() < 1e-9);
	}

	#[test]
	fn silhouette_radius_grows_when_zooming_in() {
		let far = OrbitCamera::new(400.0);
		let near = OrbitCamera::new(150.0);
		assert!(near.silhouette_radius(600.0) > far.silhouette_radius(600.0));
	}
}
