//! Leptos component and window wiring for the particle background.
//!
//! [`MountedField`] attaches a [`Field`] to a canvas element: it sizes the
//! canvas to the viewport, starts the [`AnimationLoop`] and registers window
//! listeners for pointer movement, pointer leave and resize. The
//! [`ParticleCanvas`] component does the same for a canvas it renders itself
//! and tears everything down when it is unmounted.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::info;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::animation::{AnimationLoop, LoopState};
use super::config::FieldConfig;
use super::state::Field;

/// Current viewport size in CSS pixels.
fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Window event handlers feeding a shared [`Field`].
struct WindowListeners {
	window: Window,
	mousemove: Closure<dyn FnMut(MouseEvent)>,
	mouseout: Closure<dyn FnMut(MouseEvent)>,
	resize: Closure<dyn FnMut()>,
}

impl WindowListeners {
	fn attach(window: &Window, canvas: &HtmlCanvasElement, field: &Rc<RefCell<Field>>) -> Self {
		let (field_mm, canvas_mm) = (field.clone(), canvas.clone());
		let mousemove = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			let rect = canvas_mm.get_bounding_client_rect();
			field_mm.borrow_mut().on_pointer_move(
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			);
		});

		// `mouseout` also fires between elements; only a null related target
		// means the pointer left the page.
		let field_mo = field.clone();
		let mouseout = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			if ev.related_target().is_none() {
				field_mo.borrow_mut().on_pointer_leave();
			}
		});

		let (field_rs, canvas_rs) = (field.clone(), canvas.clone());
		let resize = Closure::<dyn FnMut()>::new(move || {
			let Some((w, h)) = web_sys::window().as_ref().and_then(viewport_size) else {
				return;
			};
			canvas_rs.set_width(w as u32);
			canvas_rs.set_height(h as u32);
			field_rs.borrow_mut().on_resize(w, h);
		});

		let listeners = Self {
			window: window.clone(),
			mousemove,
			mouseout,
			resize,
		};
		for (event, cb) in listeners.callbacks() {
			let _ = window.add_event_listener_with_callback(event, cb);
		}
		listeners
	}

	fn callbacks(&self) -> [(&'static str, &js_sys::Function); 3] {
		[
			("mousemove", self.mousemove.as_ref().unchecked_ref()),
			("mouseout", self.mouseout.as_ref().unchecked_ref()),
			("resize", self.resize.as_ref().unchecked_ref()),
		]
	}

	fn detach(&self) {
		for (event, cb) in self.callbacks() {
			let _ = self.window.remove_event_listener_with_callback(event, cb);
		}
	}
}

/// A particle field animating on a canvas element.
///
/// Dropping the handle stops the animation and detaches its listeners.
pub struct MountedField {
	field: Rc<RefCell<Field>>,
	animation: AnimationLoop,
	listeners: WindowListeners,
}

impl MountedField {
	/// Size `canvas` to the viewport and start animating a fresh field on it.
	///
	/// Returns `None` without side effects when the canvas has no 2D context
	/// or there is no window.
	pub fn mount(canvas: HtmlCanvasElement, config: FieldConfig) -> Option<Self> {
		let window = web_sys::window()?;
		let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
		let (w, h) = viewport_size(&window)?;

		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let field = Rc::new(RefCell::new(Field::new(config, w, h)));
		info!(
			"particle-field: {} particles on {}x{}",
			field.borrow().particles().len(),
			w,
			h
		);

		let animation = AnimationLoop::start(field.clone(), ctx)?;
		let listeners = WindowListeners::attach(&window, &canvas, &field);
		Some(Self {
			field,
			animation,
			listeners,
		})
	}

	/// The simulation being drawn, shared with the frame callback.
	pub fn field(&self) -> Rc<RefCell<Field>> {
		self.field.clone()
	}

	/// Lifecycle state of the underlying animation loop.
	pub fn state(&self) -> LoopState {
		self.animation.state()
	}

	/// Stop the animation and remove the window listeners.
	pub fn stop(&self) {
		self.animation.stop();
		self.listeners.detach();
	}
}

impl Drop for MountedField {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Full-viewport canvas with the animated particle network behind the page.
///
/// Pass `config` to override the stock density, speeds and link fade.
#[component]
pub fn ParticleCanvas(#[prop(optional)] config: Option<FieldConfig>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted = StoredValue::new_local(None::<MountedField>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let config = config.clone().unwrap_or_default();
		mounted.update_value(|slot| {
			if slot.is_none() {
				*slot = MountedField::mount(canvas, config);
			}
		});
	});

	on_cleanup(move || {
		mounted.try_update_value(|slot| drop(slot.take()));
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id={crate::CANVAS_ID}
			class="particle-canvas"
			style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: -1;"
		/>
	}
}
