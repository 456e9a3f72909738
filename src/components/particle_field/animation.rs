//! `requestAnimationFrame` driver for the particle field.
//!
//! The loop reschedules itself after every frame until its [`LoopControl`] is
//! stopped. Stopping is cooperative: a frame that is already queued sees the
//! stopped state and returns without drawing, and [`AnimationLoop::stop`] also
//! cancels the queued request outright.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Window};

use super::state::Field;

/// Lifecycle of a render loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	/// No surface has been attached yet.
	#[default]
	Uninitialized,
	/// Frames are being rendered and rescheduled.
	Running,
	/// Terminal. No further frames run.
	Stopped,
}

/// Shared handle to a loop's state; clones observe the same loop.
#[derive(Clone, Debug, Default)]
pub struct LoopControl {
	state: Rc<Cell<LoopState>>,
}

impl LoopControl {
	/// A fresh, `Uninitialized` control.
	pub fn new() -> Self {
		Self::default()
	}

	/// Move from `Uninitialized` to `Running`. Returns whether it did.
	pub fn start(&self) -> bool {
		if self.state.get() == LoopState::Uninitialized {
			self.state.set(LoopState::Running);
			true
		} else {
			false
		}
	}

	/// Move to `Stopped` from any state.
	pub fn stop(&self) {
		self.state.set(LoopState::Stopped);
	}

	/// Current lifecycle state.
	pub fn state(&self) -> LoopState {
		self.state.get()
	}

	/// Whether frames should still be rendered.
	pub fn is_running(&self) -> bool {
		self.state.get() == LoopState::Running
	}
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Record the outcome of a frame request.
///
/// A rejected request leaves nothing queued, so the loop is stopped rather
/// than left reporting `Running` forever.
fn track_request<E: Debug>(
	request: Result<i32, E>,
	pending: &Cell<Option<i32>>,
	control: &LoopControl,
) {
	match request {
		Ok(id) => pending.set(Some(id)),
		Err(e) => {
			warn!("particle-field: frame request rejected, stopping animation: {:?}", e);
			pending.set(None);
			control.stop();
		}
	}
}

/// A running animation over a shared [`Field`].
///
/// Dropping the handle does not stop the loop; call [`AnimationLoop::stop`].
pub struct AnimationLoop {
	control: LoopControl,
	window: Window,
	frame: FrameCallback,
	pending: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
	/// Start animating `field` onto `ctx`, one step per display refresh.
	///
	/// Returns `None` when there is no window to schedule frames on.
	pub fn start(field: Rc<RefCell<Field>>, mut ctx: CanvasRenderingContext2d) -> Option<Self> {
		let Some(window) = web_sys::window() else {
			debug!("particle-field: no window, animation not started");
			return None;
		};

		let control = LoopControl::new();
		let frame: FrameCallback = Rc::new(RefCell::new(None));
		let pending = Rc::new(Cell::new(None));

		let (control_f, frame_f, pending_f, window_f) = (
			control.clone(),
			frame.clone(),
			pending.clone(),
			window.clone(),
		);
		*frame.borrow_mut() = Some(Closure::new(move || {
			pending_f.set(None);
			if !control_f.is_running() {
				return;
			}
			if let Err(e) = field.borrow_mut().step(&mut ctx) {
				warn!("particle-field: frame failed, stopping animation: {:?}", e);
				control_f.stop();
				return;
			}
			if let Some(ref cb) = *frame_f.borrow() {
				track_request(
					window_f.request_animation_frame(cb.as_ref().unchecked_ref()),
					&pending_f,
					&control_f,
				);
			}
		}));

		control.start();
		let animation = Self {
			control,
			window,
			frame,
			pending,
		};
		animation.schedule();
		Some(animation)
	}

	fn schedule(&self) {
		if let Some(ref cb) = *self.frame.borrow() {
			track_request(
				self.window.request_animation_frame(cb.as_ref().unchecked_ref()),
				&self.pending,
				&self.control,
			);
		}
	}

	/// A handle observing (and able to stop) this loop.
	pub fn control(&self) -> LoopControl {
		self.control.clone()
	}

	/// Current lifecycle state.
	pub fn state(&self) -> LoopState {
		self.control.state()
	}

	/// Stop rendering and release the frame callback.
	pub fn stop(&self) {
		self.control.stop();
		if let Some(id) = self.pending.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		// Nothing is queued any more, so the callback can be dropped safely.
		self.frame.borrow_mut().take();
		debug!("particle-field: animation stopped");
	}
}
