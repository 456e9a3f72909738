//! Animated particle-network background.
//!
//! Draws slowly drifting dots on a full-viewport canvas and links every pair
//! closer than a size-dependent threshold with a faint, distance-faded line:
//! - Area-proportional particle density, reseeded on every resize
//! - Edge reflection with a small off-screen overshoot
//! - Fixed-step repulsion away from the pointer
//! - A stoppable `requestAnimationFrame` loop
//!
//! # Example
//!
//! ```ignore
//! use particle_field::{FieldConfig, ParticleCanvas};
//!
//! view! { <ParticleCanvas config=FieldConfig { density_area: 6000.0, ..Default::default() } /> }
//! ```
//!
//! The simulation itself is DOM-free and can be stepped against any [`Surface`]:
//!
//! ```ignore
//! let mut field = Field::with_seed(FieldConfig::default(), 300.0, 300.0, 42);
//! field.on_pointer_move(150.0, 150.0);
//! field.step(&mut my_surface)?;
//! ```

mod animation;
mod component;
pub mod config;
mod particles;
mod render;
mod state;
pub mod theme;

pub use animation::{AnimationLoop, LoopControl, LoopState};
pub use component::{MountedField, ParticleCanvas};
pub use config::FieldConfig;
pub use particles::{Bounds, Particle, Repulsor};
pub use render::Surface;
pub use state::{Field, Link, Pointer, particle_count_for};
pub use theme::{Color, FieldStyle};
