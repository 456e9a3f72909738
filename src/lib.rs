//! particle-field: animated particle-network background for the dashboards.
//!
//! This crate provides a WASM canvas component that fills the viewport with
//! drifting particles, links nearby ones, and nudges them away from the
//! pointer.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlScriptElement, Window};

// Pulled in only to enable the `js` entropy backend used by `rand` on wasm32.
use getrandom as _;

pub mod components;

pub use components::particle_field::{
	AnimationLoop, Field, FieldConfig, LoopControl, LoopState, MountedField, Particle,
	ParticleCanvas, Surface,
};

/// Default id of the canvas the background is drawn on.
pub const CANVAS_ID: &str = "particle-canvas";

/// Id of the optional `<script type="application/json">` holding a [`FieldConfig`].
pub const CONFIG_ID: &str = "particle-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-field: logging initialized");
}

/// Parse a (possibly partial) JSON field configuration.
pub fn parse_field_config(json: &str) -> Result<FieldConfig, serde_json::Error> {
	serde_json::from_str(json)
}

/// Load field overrides from a script element with id="particle-config".
/// Missing or malformed configuration falls back to the defaults, as does
/// any individual value that is out of range.
pub fn load_field_config() -> FieldConfig {
	let Some(json_text) = config_script_text() else {
		return FieldConfig::default();
	};

	match parse_field_config(&json_text) {
		Ok(config) => {
			info!("particle-field: loaded configuration overrides");
			config.validated()
		}
		Err(e) => {
			warn!("particle-field: failed to parse configuration: {}", e);
			FieldConfig::default()
		}
	}
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Start the background on an existing `<canvas>` in the page.
///
/// Silently does nothing (returns `None`) when no canvas with `element_id`
/// exists, since the background is optional on every page. Keep the returned
/// handle alive for as long as the animation should run.
pub fn start_on_canvas(element_id: &str, config: FieldConfig) -> Option<MountedField> {
	let document = web_sys::window()?.document()?;
	let Some(element) = document.get_element_by_id(element_id) else {
		debug!("particle-field: no #{} element, background disabled", element_id);
		return None;
	};
	let Ok(canvas) = element.dyn_into::<HtmlCanvasElement>() else {
		debug!("particle-field: #{} is not a canvas, background disabled", element_id);
		return None;
	};
	MountedField::mount(canvas, config)
}

/// Main application component.
/// Reads configuration overrides from the DOM and renders the background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config();

	view! {
		<Title text="Learning Dashboard" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ParticleCanvas config=config />
	}
}
