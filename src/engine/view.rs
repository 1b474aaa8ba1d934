//! Pan and zoom transform applied at render time.
//!
//! `screen = model * scale + pan`. The transform never feeds back into
//! simulation coordinates; pointer positions are mapped through its inverse.

use super::config::ViewConfig;

/// Pan and zoom applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub pan_x: f64,
	/// Vertical translation in screen pixels.
	pub pan_y: f64,
	scale: f64,
	min_scale: f64,
	max_scale: f64,
	zoom_factor: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::new(&ViewConfig::default())
	}
}

impl ViewTransform {
	/// Identity transform with the configured zoom limits.
	pub fn new(config: &ViewConfig) -> Self {
		let min_scale = config.min_scale.min(config.max_scale);
		Self {
			pan_x: 0.0,
			pan_y: 0.0,
			scale: 1.0_f64.clamp(min_scale, config.max_scale),
			min_scale,
			max_scale: config.max_scale,
			zoom_factor: config.zoom_factor,
		}
	}

	/// Current zoom factor, always within `[min_scale, max_scale]`.
	pub fn scale(&self) -> f64 {
		self.scale
	}

	/// `(min_scale, max_scale)`.
	pub fn bounds(&self) -> (f64, f64) {
		(self.min_scale, self.max_scale)
	}

	/// Sets the scale, clamped. Returns true if it changed.
	pub fn set_scale(&mut self, scale: f64) -> bool {
		if !scale.is_finite() {
			return false;
		}
		let next = scale.clamp(self.min_scale, self.max_scale);
		let changed = next != self.scale;
		self.scale = next;
		changed
	}

	/// Non-finite values are ignored.
	pub fn set_pan(&mut self, x: f64, y: f64) {
		if x.is_finite() && y.is_finite() {
			self.pan_x = x;
			self.pan_y = y;
		}
	}

	/// Multiplies the scale by the zoom factor. Returns whether it changed.
	pub fn zoom_in(&mut self) -> bool {
		self.set_scale(self.scale * self.zoom_factor)
	}

	/// Divides the scale by the zoom factor. Returns whether it changed.
	pub fn zoom_out(&mut self) -> bool {
		self.set_scale(self.scale / self.zoom_factor)
	}

	/// Scales by `factor` keeping the model point under `(sx, sy)` fixed on
	/// screen. Returns true if the scale changed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) -> bool {
		let before = self.scale;
		if !self.set_scale(before * factor) {
			return false;
		}
		let ratio = self.scale / before;
		self.pan_x = sx - (sx - self.pan_x) * ratio;
		self.pan_y = sy - (sy - self.pan_y) * ratio;
		true
	}

	/// Back to identity. Returns true if the scale changed.
	pub fn reset(&mut self) -> bool {
		self.pan_x = 0.0;
		self.pan_y = 0.0;
		self.set_scale(1.0)
	}

	/// Screen point to simulation coordinates.
	pub fn screen_to_model(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.pan_x) / self.scale, (sy - self.pan_y) / self.scale)
	}

	/// Simulation coordinates to a screen point.
	pub fn model_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(x * self.scale + self.pan_x, y * self.scale + self.pan_y)
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;

	#[test]
	fn repeated_zoom_saturates_at_bounds() {
		let mut view = ViewTransform::default();
		for _ in 0..100 {
			view.zoom_in();
		}
		assert_eq!(view.scale(), 4.0);
		assert!(!view.zoom_in());

		for _ in 0..100 {
			view.zoom_out();
		}
		assert_eq!(view.scale(), 0.1);
		assert!(!view.zoom_out());
	}

	#[test]
	fn zoom_at_keeps_point_under_cursor() {
		let mut view = ViewTransform::default();
		view.set_pan(30.0, -20.0);
		let anchor = view.screen_to_model(200.0, 150.0);
		assert!(view.zoom_at(200.0, 150.0, 1.5));
		let (sx, sy) = view.model_to_screen(anchor.0, anchor.1);
		assert_relative_eq!(sx, 200.0, epsilon = 1e-9);
		assert_relative_eq!(sy, 150.0, epsilon = 1e-9);
	}

	#[test]
	fn reset_restores_identity() {
		let mut view = ViewTransform::default();
		view.set_pan(12.0, 5.0);
		view.zoom_in();
		assert!(view.reset());
		assert_eq!((view.pan_x, view.pan_y, view.scale()), (0.0, 0.0, 1.0));
		assert!(!view.reset());
	}

	#[test]
	fn non_finite_input_is_ignored() {
		let mut view = ViewTransform::default();
		assert!(!view.set_scale(f64::NAN));
		view.set_pan(f64::INFINITY, 0.0);
		assert_eq!((view.pan_x, view.pan_y, view.scale()), (0.0, 0.0, 1.0));
	}
}
