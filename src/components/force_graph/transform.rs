//! Pan and zoom mapping from simulation (world) space to screen space.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D point or vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Builds a point from possibly missing or garbage pointer coordinates.
	pub fn from_raw(x: Option<f64>, y: Option<f64>) -> Option<Self> {
		match (x, y) {
			(Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Self { x, y }),
			_ => None,
		}
	}

	pub fn length(self) -> f64 {
		self.x.hypot(self.y)
	}

	pub fn distance(self, other: Point) -> f64 {
		(other - self).length()
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Point {
	fn add_assign(&mut self, rhs: Point) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

/// Translate + uniform scale, applied to the whole scene at render time.
///
/// `screen = world * scale + translate`. The scale always stays within the
/// limits given at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub translate_x: f64,
	pub translate_y: f64,
	scale: f64,
	scale_min: f64,
	scale_max: f64,
}

impl ViewTransform {
	pub fn new(scale_min: f64, scale_max: f64) -> Self {
		Self {
			translate_x: 0.0,
			translate_y: 0.0,
			scale: 1.0_f64.clamp(scale_min, scale_max),
			scale_min,
			scale_max,
		}
	}

	pub fn scale(&self) -> f64 {
		self.scale
	}

	pub fn limits(&self) -> (f64, f64) {
		(self.scale_min, self.scale_max)
	}

	pub fn screen_to_world(&self, screen: Point) -> Point {
		Point::new(
			(screen.x - self.translate_x) / self.scale,
			(screen.y - self.translate_y) / self.scale,
		)
	}

	pub fn world_to_screen(&self, world: Point) -> Point {
		Point::new(
			world.x * self.scale + self.translate_x,
			world.y * self.scale + self.translate_y,
		)
	}

	/// Multiplies the scale by `factor` (clamped) while keeping the world
	/// point under `anchor` fixed on screen.
	pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
		if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
			return;
		}
		let new_scale = (self.scale * factor).clamp(self.scale_min, self.scale_max);
		let ratio = new_scale / self.scale;
		self.translate_x = anchor.x - (anchor.x - self.translate_x) * ratio;
		self.translate_y = anchor.y - (anchor.y - self.translate_y) * ratio;
		self.scale = new_scale;
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if dx.is_finite() && dy.is_finite() {
			self.translate_x += dx;
			self.translate_y += dy;
		}
	}
}

/// d3-style wheel response: positive deltas (scrolling down) zoom out.
///
/// Kept within the positive finite range so that an extreme delta saturates
/// at a scale limit instead of being discarded.
pub fn zoom_factor(delta: f64, sensitivity: f64) -> f64 {
	2.0_f64
		.powf(-delta * sensitivity)
		.clamp(f64::MIN_POSITIVE, f64::MAX)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_between_spaces() {
		let mut transform = ViewTransform::new(0.3, 3.0);
		transform.pan_by(40.0, -10.0);
		transform.zoom_at(2.0, Point::new(100.0, 100.0));

		let world = Point::new(12.5, -7.0);
		let back = transform.screen_to_world(transform.world_to_screen(world));
		assert!((back.x - world.x).abs() < 1e-9);
		assert!((back.y - world.y).abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_point_under_cursor() {
		let mut transform = ViewTransform::new(0.3, 3.0);
		transform.pan_by(25.0, 60.0);
		let anchor = Point::new(320.0, 180.0);
		let before = transform.screen_to_world(anchor);

		transform.zoom_at(1.7, anchor);
		let after = transform.screen_to_world(anchor);

		assert!((transform.scale() - 1.7).abs() < 1e-12);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);
	}

	#[test]
	fn scale_never_leaves_limits() {
		let mut transform = ViewTransform::new(0.3, 3.0);
		let deltas = [1e6, -1e6, 120.0, -3000.0, 5000.0, -0.5, 1e300, -1e300];
		for (i, delta) in deltas.iter().cycle().take(200).enumerate() {
			transform.zoom_at(zoom_factor(*delta, 0.002), Point::new(i as f64, 50.0));
			assert!(transform.scale() >= 0.3 && transform.scale() <= 3.0);
			assert!(transform.translate_x.is_finite() && transform.translate_y.is_finite());
		}
	}

	#[test]
	fn extreme_wheel_delta_snaps_to_a_limit() {
		assert!(zoom_factor(-1e6, 0.002).is_finite());
		assert!(zoom_factor(1e6, 0.002) > 0.0);
		assert!(zoom_factor(f64::NAN, 0.002).is_nan());

		let mut transform = ViewTransform::new(0.3, 3.0);
		transform.zoom_at(zoom_factor(-1e6, 0.002), Point::new(80.0, 40.0));
		assert_eq!(transform.scale(), 3.0);
		transform.zoom_at(zoom_factor(1e6, 0.002), Point::new(80.0, 40.0));
		assert_eq!(transform.scale(), 0.3);
		assert!(transform.translate_x.is_finite() && transform.translate_y.is_finite());
	}

	#[test]
	fn pan_is_unbounded_and_ignores_garbage() {
		let mut transform = ViewTransform::new(0.3, 3.0);
		transform.pan_by(1e7, -1e7);
		transform.pan_by(f64::NAN, 3.0);
		assert_eq!(transform.translate_x, 1e7);
		assert_eq!(transform.translate_y, -1e7);
	}

	#[test]
	fn rejects_incomplete_pointer_coordinates() {
		assert_eq!(Point::from_raw(Some(1.0), None), None);
		assert_eq!(Point::from_raw(Some(f64::NAN), Some(2.0)), None);
		assert_eq!(Point::from_raw(Some(1.0), Some(2.0)), Some(Point::new(1.0, 2.0)));
	}
}
