//! Particles drifting across the background and their per-frame motion rule.

use rand::Rng;

use super::config::FieldConfig;

/// Size of the drawing surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

/// The pointer as seen by particles during one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Repulsor {
	/// Pointer x, in surface coordinates.
	pub x: f64,
	/// Pointer y, in surface coordinates.
	pub y: f64,
	/// Reach of the push, before adding the particle's own radius.
	pub radius: f64,
}

/// A single floating particle.
///
/// `radius` is fixed at spawn. Velocity components are only ever negated by
/// edge reflection, never rescaled.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position of the center.
	pub x: f64,
	/// Vertical position of the center.
	pub y: f64,
	/// Horizontal drift per frame.
	pub vx: f64,
	/// Vertical drift per frame.
	pub vy: f64,
	radius: f64,
}

/// Uniform draw from `low..high`, collapsing to `low` when the range is empty.
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
	if high > low {
		rng.gen_range(low..high)
	} else {
		low
	}
}

impl Particle {
	/// A particle at `(x, y)` drifting by `(vx, vy)` each frame.
	pub fn new(x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> Self {
		Self {
			x,
			y,
			vx,
			vy,
			radius,
		}
	}

	/// Spawn a particle fully inside `bounds` with a random radius and drift.
	pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &FieldConfig, bounds: Bounds) -> Self {
		let radius = uniform(rng, config.radius_min, config.radius_max);
		let x = uniform(rng, 0.0, bounds.width - radius * 2.0);
		let y = uniform(rng, 0.0, bounds.height - radius * 2.0);
		let vx = uniform(rng, -config.max_speed, config.max_speed);
		let vy = uniform(rng, -config.max_speed, config.max_speed);
		Self::new(x, y, vx, vy, radius)
	}

	/// Radius chosen at spawn.
	pub fn radius(&self) -> f64 {
		self.radius
	}

	/// Advance one frame: move, bounce off the margins, then dodge the pointer.
	pub fn update(&mut self, config: &FieldConfig, bounds: Bounds, pointer: Option<Repulsor>) {
		self.x += self.vx;
		self.y += self.vy;

		let margin = config.reflect_margin;
		if self.x > bounds.width + margin || self.x < -margin {
			self.vx = -self.vx;
		}
		if self.y > bounds.height + margin || self.y < -margin {
			self.vy = -self.vy;
		}

		if let Some(p) = pointer {
			self.repel(config, bounds, p);
		}
	}

	fn repel(&mut self, config: &FieldConfig, bounds: Bounds, p: Repulsor) {
		let (dx, dy) = (p.x - self.x, p.y - self.y);
		if (dx * dx + dy * dy).sqrt() >= p.radius + self.radius {
			return;
		}

		let edge = self.radius * config.repel_edge_factor;
		let step = config.repel_step;
		if p.x < self.x && self.x < bounds.width - edge {
			self.x += step;
		}
		if p.x > self.x && self.x > edge {
			self.x -= step;
		}
		if p.y < self.y && self.y < bounds.height - edge {
			self.y += step;
		}
		if p.y > self.y && self.y > edge {
			self.y -= step;
		}
	}
}
