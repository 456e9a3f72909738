//! Tunable constants for the particle field.
//!
//! Every magic number of the animation lives here so it can be tuned in one
//! place, or overridden per page through a JSON `<script>` block (see
//! [`crate::load_field_config`]). [`FieldConfig::default`] reproduces the
//! stock look: a sparse, slowly drifting blue network.
//!
//! # Derived quantities
//!
//! Several values are not used directly but scale with the surface size:
//!
//! - particle count: `floor(width * height / density_area)`, capped at [`MAX_PARTICLES`]
//! - pointer radius: `(height / pointer_radius_divisor) * (width / pointer_radius_divisor)`
//! - link threshold: `(width / link_divisor) * (height / link_divisor)`, compared
//!   against the *squared* distance between two particles

use log::warn;
use serde::Deserialize;

/// Upper bound on the particle count, whatever the surface size or density.
///
/// The link pass is quadratic; 8K at the default density stays well below it.
pub const MAX_PARTICLES: usize = 5000;

/// Complete numeric configuration for a [`Field`](super::Field).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Surface area (px²) per particle.
	pub density_area: f64,
	/// Smallest spawn radius (inclusive).
	pub radius_min: f64,
	/// Largest spawn radius (exclusive).
	pub radius_max: f64,
	/// Each velocity component is drawn from `-max_speed..max_speed`.
	pub max_speed: f64,
	/// How far past an edge a particle travels before its velocity flips.
	pub reflect_margin: f64,
	/// Distance a particle is pushed per frame while under the pointer.
	pub repel_step: f64,
	/// Repulsion stops within `radius * repel_edge_factor` of an edge.
	pub repel_edge_factor: f64,
	/// See the module docs for the pointer radius formula.
	pub pointer_radius_divisor: f64,
	/// See the module docs for the link threshold formula.
	pub link_divisor: f64,
	/// Squared distance at which a link fades to fully transparent.
	pub link_fade_distance_sq: f64,
	/// Opacity of a zero-length link.
	pub link_max_alpha: f64,
	/// Stroke width for links, in pixels.
	pub link_width: f64,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			density_area: 9000.0,
			radius_min: 0.5,
			radius_max: 2.0,
			max_speed: 0.2,
			reflect_margin: 5.0,
			repel_step: 3.0,
			repel_edge_factor: 10.0,
			pointer_radius_divisor: 120.0,
			link_divisor: 7.0,
			link_fade_distance_sq: 20000.0,
			link_max_alpha: 0.2,
			link_width: 1.0,
		}
	}
}

/// Replace `value` with `default` unless it passes `valid`, warning on replacement.
fn checked(name: &str, value: f64, default: f64, valid: fn(f64) -> bool) -> f64 {
	if valid(value) {
		value
	} else {
		warn!("particle-field: invalid {} {}, using {}", name, value, default);
		default
	}
}

fn positive(v: f64) -> bool {
	v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
	v.is_finite() && v >= 0.0
}

impl FieldConfig {
	/// Copy of this configuration with every unusable value reset to its default.
	///
	/// Divisors and the radius range must be finite and positive; speeds,
	/// margins, steps and alphas must be finite and non-negative.
	pub fn validated(&self) -> Self {
		let d = Self::default();
		let (radius_min, radius_max) = if positive(self.radius_min)
			&& positive(self.radius_max)
			&& self.radius_min <= self.radius_max
		{
			(self.radius_min, self.radius_max)
		} else {
			warn!(
				"particle-field: invalid radius range {}..{}, using {}..{}",
				self.radius_min, self.radius_max, d.radius_min, d.radius_max
			);
			(d.radius_min, d.radius_max)
		};

		Self {
			density_area: checked("density_area", self.density_area, d.density_area, positive),
			radius_min,
			radius_max,
			max_speed: checked("max_speed", self.max_speed, d.max_speed, non_negative),
			reflect_margin: checked(
				"reflect_margin",
				self.reflect_margin,
				d.reflect_margin,
				non_negative,
			),
			repel_step: checked("repel_step", self.repel_step, d.repel_step, non_negative),
			repel_edge_factor: checked(
				"repel_edge_factor",
				self.repel_edge_factor,
				d.repel_edge_factor,
				non_negative,
			),
			pointer_radius_divisor: checked(
				"pointer_radius_divisor",
				self.pointer_radius_divisor,
				d.pointer_radius_divisor,
				positive,
			),
			link_divisor: checked("link_divisor", self.link_divisor, d.link_divisor, positive),
			link_fade_distance_sq: checked(
				"link_fade_distance_sq",
				self.link_fade_distance_sq,
				d.link_fade_distance_sq,
				positive,
			),
			link_max_alpha: checked(
				"link_max_alpha",
				self.link_max_alpha,
				d.link_max_alpha,
				non_negative,
			),
			link_width: checked("link_width", self.link_width, d.link_width, non_negative),
		}
	}

	/// Number of particles seeded on a `width` x `height` surface.
	///
	/// Empty, negative and non-finite areas yield zero; the result never
	/// exceeds [`MAX_PARTICLES`].
	pub fn particle_count(&self, width: f64, height: f64) -> usize {
		let n = (width * height / self.density_area).floor();
		if n.is_finite() && n > 0.0 {
			(n as usize).min(MAX_PARTICLES)
		} else {
			0
		}
	}

	/// Radius around the pointer inside which particles are pushed away.
	pub fn pointer_radius(&self, width: f64, height: f64) -> f64 {
		(height / self.pointer_radius_divisor) * (width / self.pointer_radius_divisor)
	}

	/// Squared distance below which two particles are linked.
	pub fn link_threshold_sq(&self, width: f64, height: f64) -> f64 {
		(width / self.link_divisor) * (height / self.link_divisor)
	}

	/// Stroke opacity of a link between particles `dist_sq` apart.
	///
	/// Monotonically decreasing in `dist_sq`, zero from `link_fade_distance_sq` on.
	pub fn link_opacity(&self, dist_sq: f64) -> f64 {
		(1.0 - dist_sq / self.link_fade_distance_sq).max(0.0) * self.link_max_alpha
	}
}
