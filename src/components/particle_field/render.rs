//! Drawing backend for the particle field.
//!
//! The simulation only needs a handful of immediate-mode primitives, so it
//! draws through the [`Surface`] trait rather than a canvas directly. The
//! browser implementation lives on [`CanvasRenderingContext2d`]; tests use a
//! recording double.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::theme::Color;

/// A 2D immediate-mode drawing target.
pub trait Surface {
	/// Error reported by the backend. Propagated out of [`Field::step`](super::Field::step).
	type Error;

	/// Erase the rectangle `(0, 0, width, height)`.
	fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;

	/// Fill a circle of `radius` centered on `(x, y)`.
	fn fill_circle(
		&mut self,
		x: f64,
		y: f64,
		radius: f64,
		color: Color,
	) -> Result<(), Self::Error>;

	/// Stroke a straight line from `from` to `to`.
	fn stroke_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		color: Color,
		width: f64,
	) -> Result<(), Self::Error>;
}

impl Surface for CanvasRenderingContext2d {
	type Error = JsValue;

	fn clear(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
		self.clear_rect(0.0, 0.0, width, height);
		Ok(())
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<(), JsValue> {
		self.begin_path();
		self.arc(x, y, radius, 0.0, PI * 2.0)?;
		self.set_fill_style_str(&color.to_css());
		self.fill();
		Ok(())
	}

	fn stroke_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		color: Color,
		width: f64,
	) -> Result<(), JsValue> {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
		Ok(())
	}
}
