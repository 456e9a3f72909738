//! Particle field state: the particle collection, surface size and pointer.
//!
//! A [`Field`] is created once when the canvas mounts and then mutated by the
//! animation loop (via [`Field::step`]) and by the window event handlers. It
//! never touches the DOM itself; drawing goes through a [`Surface`].

use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::FieldConfig;
use super::particles::{Bounds, Particle, Repulsor};
use super::render::Surface;
use super::theme::FieldStyle;

/// A proximity edge between two particles, identified by index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	/// Index of the first particle; always below `b`.
	pub a: usize,
	/// Index of the second particle.
	pub b: usize,
	/// Squared distance between the two particles.
	pub dist_sq: f64,
	/// Stroke alpha after the distance fade.
	pub opacity: f64,
}

/// Last known pointer position in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
	/// Horizontal offset from the surface's left edge.
	pub x: f64,
	/// Vertical offset from the surface's top edge.
	pub y: f64,
}

/// The simulated particle network.
pub struct Field {
	config: FieldConfig,
	/// Colors used by [`Field::step`].
	pub style: FieldStyle,
	particles: Vec<Particle>,
	width: f64,
	height: f64,
	pointer: Option<Pointer>,
	pointer_radius: f64,
	rng: SmallRng,
}

/// Number of particles a `width` x `height` surface is seeded with.
pub fn particle_count_for(config: &FieldConfig, width: f64, height: f64) -> usize {
	config.particle_count(width, height)
}

impl Field {
	/// Create a field seeded from the platform entropy source.
	pub fn new(config: FieldConfig, width: f64, height: f64) -> Self {
		Self::with_rng(config, width, height, SmallRng::from_entropy())
	}

	/// Create a field whose particle layout is reproducible from `seed`.
	pub fn with_seed(config: FieldConfig, width: f64, height: f64, seed: u64) -> Self {
		Self::with_rng(config, width, height, SmallRng::seed_from_u64(seed))
	}

	/// Create a field with an explicit particle layout instead of a random one.
	///
	/// Later resizes reseed from a fixed seed, so the whole run is reproducible.
	pub fn with_particles(
		config: FieldConfig,
		width: f64,
		height: f64,
		particles: Vec<Particle>,
	) -> Self {
		let mut field = Self::unseeded(config, width, height, SmallRng::seed_from_u64(0));
		field.particles = particles;
		field
	}

	fn with_rng(config: FieldConfig, width: f64, height: f64, rng: SmallRng) -> Self {
		let mut field = Self::unseeded(config, width, height, rng);
		field.initialize(width, height);
		field
	}

	/// A field with no particles yet. Unusable config values fall back to defaults.
	fn unseeded(config: FieldConfig, width: f64, height: f64, rng: SmallRng) -> Self {
		let config = config.validated();
		let pointer_radius = config.pointer_radius(width, height);
		Self {
			config,
			style: FieldStyle::default(),
			particles: Vec::new(),
			width,
			height,
			pointer: None,
			pointer_radius,
			rng,
		}
	}

	/// The validated configuration in use.
	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	/// Discard every particle and reseed for a `width` x `height` surface.
	///
	/// The pointer position survives; its repulsion radius is recomputed.
	pub fn initialize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.pointer_radius = self.config.pointer_radius(width, height);

		let bounds = self.bounds();
		let count = self.config.particle_count(width, height);
		self.particles.clear();
		self.particles.reserve(count);
		for _ in 0..count {
			let particle = Particle::spawn(&mut self.rng, &self.config, bounds);
			self.particles.push(particle);
		}
	}

	/// Resize handler: full reseed at the new size.
	pub fn on_resize(&mut self, width: f64, height: f64) {
		self.initialize(width, height);
		debug!(
			"particle-field: resized to {}x{}, {} particles",
			width,
			height,
			self.particles.len()
		);
	}

	/// Pointer moved to `(x, y)` in surface coordinates.
	pub fn on_pointer_move(&mut self, x: f64, y: f64) {
		self.pointer = Some(Pointer { x, y });
	}

	/// Pointer left the page; repulsion stops until it returns.
	pub fn on_pointer_leave(&mut self) {
		self.pointer = None;
	}

	/// Particles in drawing order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Surface width in pixels.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Surface height in pixels.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Current pointer, if it is over the page.
	pub fn pointer(&self) -> Option<Pointer> {
		self.pointer
	}

	/// Repulsion radius for the current surface size.
	pub fn pointer_radius(&self) -> f64 {
		self.pointer_radius
	}

	fn bounds(&self) -> Bounds {
		Bounds {
			width: self.width,
			height: self.height,
		}
	}

	fn repulsor(&self) -> Option<Repulsor> {
		self.pointer.map(|p| Repulsor {
			x: p.x,
			y: p.y,
			radius: self.pointer_radius,
		})
	}

	/// Advance every particle by one frame without drawing.
	pub fn advance(&mut self) {
		let (bounds, pointer) = (self.bounds(), self.repulsor());
		for p in &mut self.particles {
			p.update(&self.config, bounds, pointer);
		}
	}

	/// Every linked pair `a < b`, in collection order.
	///
	/// Two particles are linked when their squared distance is strictly below
	/// the size-dependent threshold.
	pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
		let threshold = self.config.link_threshold_sq(self.width, self.height);
		let particles = &self.particles;
		(0..particles.len()).flat_map(move |a| {
			(a + 1..particles.len()).filter_map(move |b| {
				let (pa, pb) = (&particles[a], &particles[b]);
				let dist_sq = (pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2);
				(dist_sq < threshold).then(|| Link {
					a,
					b,
					dist_sq,
					opacity: self.config.link_opacity(dist_sq),
				})
			})
		})
	}

	/// Render one frame: clear, update and draw each particle, then draw links.
	pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), S::Error> {
		surface.clear(self.width, self.height)?;

		let (bounds, pointer) = (self.bounds(), self.repulsor());
		let fill = self.style.particle;
		for p in &mut self.particles {
			p.update(&self.config, bounds, pointer);
			surface.fill_circle(p.x, p.y, p.radius(), fill)?;
		}

		self.draw_links(surface)
	}

	fn draw_links<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
		for link in self.links() {
			let (pa, pb) = (&self.particles[link.a], &self.particles[link.b]);
			surface.stroke_line(
				(pa.x, pa.y),
				(pb.x, pb.y),
				self.style.link.with_alpha(link.opacity),
				self.config.link_width,
			)?;
		}
		Ok(())
	}
}
