//! Integration tests for the particle field simulation.
//!
//! These drive [`Field`] through its public API and render into a recording
//! [`Surface`], so no browser is needed.

use std::convert::Infallible;

use particle_field::components::particle_field::{Color, Link, particle_count_for};
use particle_field::components::particle_field::config::MAX_PARTICLES;
use particle_field::{Field, FieldConfig, Particle, Surface, parse_field_config};

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Command {
	Clear(f64, f64),
	Circle { x: f64, y: f64, radius: f64, color: Color },
	Line { from: (f64, f64), to: (f64, f64), color: Color, width: f64 },
}

#[derive(Default)]
struct Recorder {
	commands: Vec<Command>,
}

impl Recorder {
	fn circles(&self) -> usize {
		self.commands.iter().filter(|c| matches!(c, Command::Circle { .. })).count()
	}

	fn lines(&self) -> Vec<&Command> {
		self.commands.iter().filter(|c| matches!(c, Command::Line { .. })).collect()
	}
}

impl Surface for Recorder {
	type Error = Infallible;

	fn clear(&mut self, width: f64, height: f64) -> Result<(), Infallible> {
		self.commands.push(Command::Clear(width, height));
		Ok(())
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<(), Infallible> {
		self.commands.push(Command::Circle { x, y, radius, color });
		Ok(())
	}

	fn stroke_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		color: Color,
		width: f64,
	) -> Result<(), Infallible> {
		self.commands.push(Command::Line { from, to, color, width });
		Ok(())
	}
}

/// Fails on the first circle it is asked to draw.
struct BrokenCanvas {
	cleared: bool,
}

impl Surface for BrokenCanvas {
	type Error = &'static str;

	fn clear(&mut self, _: f64, _: f64) -> Result<(), Self::Error> {
		self.cleared = true;
		Ok(())
	}

	fn fill_circle(&mut self, _: f64, _: f64, _: f64, _: Color) -> Result<(), Self::Error> {
		Err("context lost")
	}

	fn stroke_line(&mut self, _: (f64, f64), _: (f64, f64), _: Color, _: f64) -> Result<(), Self::Error> {
		Err("context lost")
	}
}

fn still(x: f64, y: f64) -> Particle {
	Particle::new(x, y, 0.0, 0.0, 1.0)
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_count_is_floor_of_area_over_9000() {
	let config = FieldConfig::default();
	for &(w, h) in &[
		(0.0, 0.0),
		(100.0, 89.0),
		(100.0, 90.0),
		(300.0, 300.0),
		(1024.0, 768.0),
		(1920.0, 1080.0),
		(2560.0, 1440.0),
	] {
		let expected = (w * h / 9000.0_f64).floor() as usize;
		let field = Field::with_seed(config.clone(), w, h, 11);
		assert_eq!(field.particles().len(), expected, "{}x{}", w, h);
		assert_eq!(particle_count_for(&config, w, h), expected);
	}
}

#[test]
fn test_initial_placement_keeps_particles_on_surface() {
	let field = Field::with_seed(FieldConfig::default(), 1920.0, 1080.0, 5);
	for p in field.particles() {
		let r = p.radius();
		assert!((0.5..=2.0).contains(&r));
		assert!(p.x >= 0.0 && p.x <= 1920.0 - 2.0 * r);
		assert!(p.y >= 0.0 && p.y <= 1080.0 - 2.0 * r);
		assert!(p.vx.abs() <= 0.2 && p.vy.abs() <= 0.2);
	}
}

#[test]
fn test_small_surface_scenario() {
	let field = Field::with_seed(FieldConfig::default(), 300.0, 300.0, 99);
	assert_eq!(field.particles().len(), 10);
	assert!((field.pointer_radius() - 6.25).abs() < 1e-12);
}

#[test]
fn test_reinitializing_same_size_gives_same_count() {
	let mut field = Field::with_seed(FieldConfig::default(), 800.0, 600.0, 2);
	let first: Vec<Particle> = field.particles().to_vec();
	field.on_resize(800.0, 600.0);
	assert_eq!(field.particles().len(), first.len());
	assert_ne!(field.particles(), first.as_slice());
	field.initialize(800.0, 600.0);
	assert_eq!(field.particles().len(), 53);
}

#[test]
fn test_same_seed_same_layout() {
	let a = Field::with_seed(FieldConfig::default(), 640.0, 480.0, 17);
	let b = Field::with_seed(FieldConfig::default(), 640.0, 480.0, 17);
	assert_eq!(a.particles(), b.particles());
}

#[test]
fn test_custom_density() {
	let config = FieldConfig {
		density_area: 4500.0,
		..FieldConfig::default()
	};
	let field = Field::with_seed(config, 300.0, 300.0, 1);
	assert_eq!(field.particles().len(), 20);
}

#[test]
fn test_page_config_with_degenerate_density_is_survivable() {
	let config = parse_field_config(r#"{ "density_area": 1e-300 }"#).unwrap();
	assert!(config.particle_count(1920.0, 1080.0) <= MAX_PARTICLES);

	let field = Field::with_seed(config.clone(), 1920.0, 1080.0, 1);
	assert_eq!(field.particles().len(), 230);
	assert_eq!(config.validated(), FieldConfig::default());
}

#[test]
fn test_negative_speed_from_page_config_keeps_symmetric_drift() {
	let config = parse_field_config(r#"{ "max_speed": -0.3 }"#).unwrap();
	let field = Field::with_seed(config, 1920.0, 1080.0, 6);
	assert!(field.particles().iter().all(|p| p.vx.abs() < 0.2 && p.vy.abs() < 0.2));
	assert!(field.particles().iter().any(|p| p.vx < 0.0));
	assert!(field.particles().iter().any(|p| p.vx > 0.0));
}

// ============================================================================
// Motion
// ============================================================================

#[test]
fn test_radius_never_changes() {
	let mut field = Field::with_seed(FieldConfig::default(), 400.0, 300.0, 8);
	let radii: Vec<f64> = field.particles().iter().map(Particle::radius).collect();
	field.on_pointer_move(200.0, 150.0);
	let mut surface = Recorder::default();
	for _ in 0..500 {
		let _ = field.step(&mut surface);
		surface.commands.clear();
	}
	let after: Vec<f64> = field.particles().iter().map(Particle::radius).collect();
	assert_eq!(radii, after);
}

#[test]
fn test_velocity_flips_past_right_margin() {
	let mut field = Field::with_particles(
		FieldConfig::default(),
		300.0,
		300.0,
		vec![Particle::new(310.0, 150.0, 0.1, 0.05, 1.0)],
	);
	field.advance();
	let p = &field.particles()[0];
	assert_eq!(p.vx, -0.1);
	assert_eq!(p.vy, 0.05);
}

#[test]
fn test_particles_stay_near_surface_over_time() {
	let mut field = Field::with_seed(FieldConfig::default(), 500.0, 400.0, 21);
	for _ in 0..5000 {
		field.advance();
	}
	// Worst case overshoot is the margin plus one frame of drift.
	for p in field.particles() {
		assert!(p.x > -5.5 && p.x < 505.5, "x = {}", p.x);
		assert!(p.y > -5.5 && p.y < 405.5, "y = {}", p.y);
	}
}

#[test]
fn test_pointer_repels_only_while_present() {
	let mut field = Field::with_particles(
		FieldConfig::default(),
		600.0,
		600.0,
		vec![still(300.0, 300.0)],
	);
	// pointer radius on 600x600 is 25
	field.on_pointer_move(290.0, 310.0);
	field.advance();
	assert_eq!((field.particles()[0].x, field.particles()[0].y), (303.0, 297.0));

	field.on_pointer_leave();
	field.advance();
	assert_eq!((field.particles()[0].x, field.particles()[0].y), (303.0, 297.0));
}

// ============================================================================
// Proximity graph
// ============================================================================

#[test]
fn test_link_at_exact_threshold_is_excluded() {
	// threshold on 700x700 is (700/7)^2 = 10000
	let field = Field::with_particles(
		FieldConfig::default(),
		700.0,
		700.0,
		vec![still(100.0, 100.0), still(200.0, 100.0)],
	);
	assert_eq!(field.links().count(), 0);

	let field = Field::with_particles(
		FieldConfig::default(),
		700.0,
		700.0,
		vec![still(100.0, 100.0), still(199.0, 100.0)],
	);
	let links: Vec<Link> = field.links().collect();
	assert_eq!(links.len(), 1);
	assert!((links[0].dist_sq - 9801.0).abs() < 1e-9);
	assert!((links[0].opacity - (1.0 - 9801.0 / 20000.0) * 0.2).abs() < 1e-12);
}

#[test]
fn test_links_are_symmetric() {
	let points = vec![
		still(10.0, 10.0),
		still(60.0, 40.0),
		still(300.0, 300.0),
		still(330.0, 280.0),
		still(90.0, 20.0),
	];
	let forward = Field::with_particles(FieldConfig::default(), 700.0, 700.0, points.clone());
	let mut reversed_points = points.clone();
	reversed_points.reverse();
	let reversed = Field::with_particles(FieldConfig::default(), 700.0, 700.0, reversed_points);

	let n = points.len();
	let mut a: Vec<(usize, usize)> = forward.links().map(|l| (l.a, l.b)).collect();
	let mut b: Vec<(usize, usize)> = reversed
		.links()
		.map(|l| {
			let (i, j) = (n - 1 - l.a, n - 1 - l.b);
			(i.min(j), i.max(j))
		})
		.collect();
	a.sort_unstable();
	b.sort_unstable();
	assert_eq!(a, b);
	assert_eq!(a, vec![(0, 1), (0, 4), (1, 4), (2, 3)]);
}

#[test]
fn test_far_links_inside_threshold_are_transparent() {
	// 2100x2100 raises the threshold to 90000, past the 20000 fade distance
	let field = Field::with_particles(
		FieldConfig::default(),
		2100.0,
		2100.0,
		vec![still(0.0, 0.0), still(200.0, 0.0)],
	);
	let links: Vec<Link> = field.links().collect();
	assert_eq!(links.len(), 1);
	assert_eq!(links[0].opacity, 0.0);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_step_draws_clear_then_particles_then_links() {
	let mut field = Field::with_particles(
		FieldConfig::default(),
		700.0,
		700.0,
		vec![still(100.0, 100.0), still(130.0, 140.0), still(600.0, 600.0)],
	);
	let mut surface = Recorder::default();
	let Ok(()) = field.step(&mut surface);

	assert_eq!(surface.commands[0], Command::Clear(700.0, 700.0));
	assert_eq!(surface.circles(), 3);
	assert_eq!(
		surface.commands[1],
		Command::Circle {
			x: 100.0,
			y: 100.0,
			radius: 1.0,
			color: Color::rgba(0, 170, 255, 0.6),
		}
	);

	let lines = surface.lines();
	assert_eq!(lines.len(), 1);
	assert_eq!(
		*lines[0],
		Command::Line {
			from: (100.0, 100.0),
			to: (130.0, 140.0),
			color: Color::rgba(0, 170, 255, (1.0 - 2500.0 / 20000.0) * 0.2),
			width: 1.0,
		}
	);
	assert!(matches!(surface.commands.last(), Some(Command::Line { .. })));
}

#[test]
fn test_step_propagates_surface_errors() {
	let mut field = Field::with_seed(FieldConfig::default(), 300.0, 300.0, 4);
	let mut surface = BrokenCanvas { cleared: false };
	assert_eq!(field.step(&mut surface), Err("context lost"));
	assert!(surface.cleared);
}

#[test]
fn test_empty_surface_only_clears() {
	let mut field = Field::with_seed(FieldConfig::default(), 0.0, 0.0, 4);
	let mut surface = Recorder::default();
	let Ok(()) = field.step(&mut surface);
	assert_eq!(surface.commands, vec![Command::Clear(0.0, 0.0)]);
}
