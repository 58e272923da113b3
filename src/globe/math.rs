use std::ops::{Add, Mul, Sub};

/// Sphere radius in world units. Camera distances are expressed against it.
pub const GLOBE_RADIUS: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vec3 {
	pub fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	/// Point on a sphere of radius `r` at the given geographic coordinates
	/// (degrees). +z faces lat 0 / lng 0, +y the north pole.
	pub fn from_lat_lng(lat: f64, lng: f64, r: f64) -> Self {
		let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
		let (sin_lng, cos_lng) = lng.to_radians().sin_cos();
		Self {
			x: r * cos_lat * sin_lng,
			y: r * sin_lat,
			z: r * cos_lat * cos_lng,
		}
	}

	pub fn dot(self, other: Self) -> f64 {
		self.x * other.x + self.y * other.y + self.z * other.z
	}

	pub fn length(self) -> f64 {
		self.dot(self).sqrt()
	}

	pub fn normalize(self) -> Self {
		let len = self.length();
		if len <= f64::EPSILON { self } else { self * (1.0 / len) }
	}
}

impl Add for Vec3 {
	type Output = Self;
	fn add(self, other: Self) -> Self {
		Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
	}
}

impl Sub for Vec3 {
	type Output = Self;
	fn sub(self, other: Self) -> Self {
		Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
	}
}

impl Mul<f64> for Vec3 {
	type Output = Self;
	fn mul(self, k: f64) -> Self {
		Self::new(self.x * k, self.y * k, self.z * k)
	}
}

/// Interpolate along the great circle between two unit directions.
pub fn slerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
	let omega = a.dot(b).clamp(-1.0, 1.0).acos();
	if omega.abs() < 1e-9 {
		return a;
	}
	let sin_omega = omega.sin();
	a * (((1.0 - t) * omega).sin() / sin_omega) + b * ((t * omega).sin() / sin_omega)
}
