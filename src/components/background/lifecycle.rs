//! Browser binding for the background renderer.
//!
//! [`Background`] attaches a [`BackgroundState`] to a canvas element and drives
//! it with `requestAnimationFrame`. Window resizes and fullscreen changes are
//! debounced into a single re-layout. Every JS callback holds only a weak
//! reference, and [`Background::destroy`] removes listeners, cancels the
//! pending frame and releases the closures.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, Window};

use super::canvas::CanvasSurface;
use super::error::BackgroundError;
use super::settings::Settings;
use super::state::{BackgroundState, Lifecycle};
use super::types::{Bounds, Point, Rgb};

/// Quiet period after the last resize event before re-layout.
const RESIZE_DEBOUNCE_MS: u32 = 250;

const FULLSCREEN_EVENTS: [&str; 4] = [
	"fullscreenchange",
	"webkitfullscreenchange",
	"mozfullscreenchange",
	"MSFullscreenChange",
];

/// Coalesces a burst of triggers into a single action. Each trigger issues a
/// ticket, and only the latest ticket fires, once.
#[derive(Debug, Default)]
struct Debouncer {
	latest: Cell<u64>,
	armed: Cell<bool>,
}

impl Debouncer {
	fn trigger(&self) -> u64 {
		let ticket = self.latest.get().wrapping_add(1);
		self.latest.set(ticket);
		self.armed.set(true);
		ticket
	}

	/// Whether the timer holding `ticket` should run the action.
	fn fire(&self, ticket: u64) -> bool {
		if self.armed.get() && ticket == self.latest.get() {
			self.armed.set(false);
			true
		} else {
			false
		}
	}

	fn cancel(&self) {
		self.armed.set(false);
	}
}

/// The outstanding animation-frame request, if any. Once closed, no new
/// request may be made.
#[derive(Debug, Default)]
struct FrameSlot {
	id: Cell<Option<i32>>,
	closed: Cell<bool>,
}

impl FrameSlot {
	fn may_request(&self) -> bool {
		!self.closed.get() && self.id.get().is_none()
	}

	fn requested(&self, id: i32) {
		self.id.set(Some(id));
	}

	/// Called when the requested frame runs.
	fn begin_frame(&self) {
		self.id.set(None);
	}

	/// Closes the slot and returns the request still pending, to be cancelled.
	fn close(&self) -> Option<i32> {
		self.closed.set(true);
		self.id.take()
	}
}

/// Registered DOM listeners, kept so they can be removed again.
#[derive(Default)]
struct Listeners {
	resize: Option<Closure<dyn FnMut()>>,
	pointer_move: Option<Closure<dyn FnMut(MouseEvent)>>,
	pointer_leave: Option<Closure<dyn FnMut(MouseEvent)>>,
}

struct Inner {
	state: RefCell<BackgroundState>,
	surface: RefCell<CanvasSurface>,
	canvas: HtmlCanvasElement,
	window: Window,
	document: Document,
	animate: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	frame: FrameSlot,
	resize_debounce: Debouncer,
	pending_resize: RefCell<Option<Timeout>>,
	listeners: RefCell<Listeners>,
}

impl Inner {
	fn viewport(&self) -> Bounds {
		let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		Bounds::new(
			dim(self.window.inner_width(), 800.0),
			dim(self.window.inner_height(), 600.0),
		)
	}

	/// Sizes the canvas to the viewport and returns the new bounds.
	fn fit_canvas(&self) -> Bounds {
		let bounds = self.viewport();
		self.canvas.set_width(bounds.width as u32);
		self.canvas.set_height(bounds.height as u32);
		bounds
	}

	fn request_frame(&self) {
		if !self.frame.may_request() {
			return;
		}
		if let Some(cb) = self.animate.borrow().as_ref() {
			if let Ok(id) = self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				self.frame.requested(id);
			}
		}
	}

	fn on_frame(&self, now: f64) {
		self.frame.begin_frame();
		let drawn = {
			let mut state = self.state.borrow_mut();
			let mut surface = self.surface.borrow_mut();
			state.frame(now, &mut *surface).is_some()
		};
		if drawn {
			self.request_frame();
		}
	}

	/// Restarts the debounce window; replacing the timeout cancels the old one.
	fn schedule_resize(self: &Rc<Self>) {
		let ticket = self.resize_debounce.trigger();
		let weak = Rc::downgrade(self);
		let timeout = Timeout::new(RESIZE_DEBOUNCE_MS, move || {
			if let Some(inner) = weak.upgrade() {
				if inner.resize_debounce.fire(ticket) {
					inner.apply_resize();
				}
			}
		});
		*self.pending_resize.borrow_mut() = Some(timeout);
	}

	fn apply_resize(&self) {
		if !self.state.borrow().is_running() {
			return;
		}
		let bounds = self.fit_canvas();
		debug!("starfield: applying debounced resize");
		self.state.borrow_mut().resize(bounds);
	}

	fn pointer_position(&self, ev: &MouseEvent) -> Point {
		let rect = self.canvas.get_bounding_client_rect();
		Point::new(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	}
}

/// A running (or not yet started) animated background bound to one canvas.
///
/// Dropping the handle tears the background down.
pub struct Background {
	inner: Rc<Inner>,
}

impl Background {
	/// Attaches to the canvas element with id `canvas_id`.
	///
	/// Fails if the element is missing or is not a canvas with a 2D context.
	pub fn new(
		canvas_id: &str,
		palette: Option<&[Rgb]>,
		settings: Settings,
	) -> Result<Self, BackgroundError> {
		let window = web_sys::window().ok_or(BackgroundError::NoWindow)?;
		let document = window.document().ok_or(BackgroundError::NoDocument)?;
		let element = document
			.get_element_by_id(canvas_id)
			.ok_or_else(|| BackgroundError::CanvasNotFound(canvas_id.to_string()))?;
		let canvas: HtmlCanvasElement = element
			.dyn_into()
			.map_err(|_| BackgroundError::NotACanvas(canvas_id.to_string()))?;
		Self::from_canvas(canvas, palette, settings)
	}

	/// Attaches to an existing canvas element.
	pub fn from_canvas(
		canvas: HtmlCanvasElement,
		palette: Option<&[Rgb]>,
		settings: Settings,
	) -> Result<Self, BackgroundError> {
		let window = web_sys::window().ok_or(BackgroundError::NoWindow)?;
		let document = window.document().ok_or(BackgroundError::NoDocument)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| BackgroundError::js(&e))?
			.ok_or_else(|| BackgroundError::ContextUnavailable(canvas.id()))?
			.dyn_into()
			.map_err(|_| BackgroundError::ContextUnavailable(canvas.id()))?;

		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let state = BackgroundState::new(settings, palette, fastrand::Rng::with_seed(seed));

		Ok(Self {
			inner: Rc::new(Inner {
				state: RefCell::new(state),
				surface: RefCell::new(CanvasSurface::new(ctx)),
				canvas,
				window,
				document,
				animate: RefCell::new(None),
				frame: FrameSlot::default(),
				resize_debounce: Debouncer::default(),
				pending_resize: RefCell::new(None),
				listeners: RefCell::new(Listeners::default()),
			}),
		})
	}

	/// Sizes the canvas, generates the field, registers listeners and starts
	/// the animation loop. Does nothing if already started or destroyed.
	pub fn start(&self) -> Result<(), BackgroundError> {
		if self.lifecycle() != Lifecycle::Uninitialized {
			return Ok(());
		}
		if let Err(e) = self.register_listeners() {
			self.destroy();
			return Err(e);
		}

		let bounds = self.inner.fit_canvas();
		self.inner.state.borrow_mut().start(bounds);

		let weak = Rc::downgrade(&self.inner);
		let animate = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
			if let Some(inner) = weak.upgrade() {
				inner.on_frame(now);
			}
		});
		*self.inner.animate.borrow_mut() = Some(animate);
		self.inner.request_frame();
		Ok(())
	}

	/// Closures are stored before they are attached, so a failed registration
	/// leaves nothing that `destroy` cannot detach.
	fn register_listeners(&self) -> Result<(), BackgroundError> {
		let inner = &self.inner;
		let mut listeners = inner.listeners.borrow_mut();

		let weak = Rc::downgrade(inner);
		let resize = listeners.resize.insert(Closure::<dyn FnMut()>::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.schedule_resize();
			}
		}));
		inner
			.window
			.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
			.map_err(|e| BackgroundError::js(&e))?;
		for event in FULLSCREEN_EVENTS {
			inner
				.document
				.add_event_listener_with_callback(event, resize.as_ref().unchecked_ref())
				.map_err(|e| BackgroundError::js(&e))?;
		}

		if !inner.state.borrow().settings.mouse_interaction.enabled {
			return Ok(());
		}
		let weak = Rc::downgrade(inner);
		let pointer_move = listeners.pointer_move.insert(Closure::<dyn FnMut(MouseEvent)>::new(
			move |ev: MouseEvent| {
				if let Some(inner) = weak.upgrade() {
					let p = inner.pointer_position(&ev);
					inner.state.borrow_mut().set_pointer(Some(p));
				}
			},
		));
		inner
			.canvas
			.add_event_listener_with_callback("mousemove", pointer_move.as_ref().unchecked_ref())
			.map_err(|e| BackgroundError::js(&e))?;

		let weak = Rc::downgrade(inner);
		let pointer_leave = listeners.pointer_leave.insert(Closure::<dyn FnMut(MouseEvent)>::new(
			move |_: MouseEvent| {
				if let Some(inner) = weak.upgrade() {
					inner.state.borrow_mut().set_pointer(None);
				}
			},
		));
		inner
			.canvas
			.add_event_listener_with_callback("mouseleave", pointer_leave.as_ref().unchecked_ref())
			.map_err(|e| BackgroundError::js(&e))?;
		Ok(())
	}

	pub fn lifecycle(&self) -> Lifecycle {
		self.inner.state.borrow().lifecycle()
	}

	/// Replaces the palette without restarting the animation. An empty palette
	/// is ignored. Returns whether the colors changed.
	pub fn update_colors(&self, palette: &[Rgb]) -> bool {
		self.inner.state.borrow_mut().update_colors(palette)
	}

	/// Stops the animation and releases every listener. Idempotent.
	pub fn destroy(&self) {
		let inner = &self.inner;
		if !inner.state.borrow_mut().destroy() {
			return;
		}
		if let Some(id) = inner.frame.close() {
			let _ = inner.window.cancel_animation_frame(id);
		}
		inner.resize_debounce.cancel();
		inner.pending_resize.borrow_mut().take();

		let listeners = std::mem::take(&mut *inner.listeners.borrow_mut());
		if let Some(cb) = &listeners.resize {
			let _ = inner
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			for event in FULLSCREEN_EVENTS {
				let _ = inner
					.document
					.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
			}
		}
		if let Some(cb) = &listeners.pointer_move {
			let _ = inner
				.canvas
				.remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}
		if let Some(cb) = &listeners.pointer_leave {
			let _ = inner
				.canvas
				.remove_event_listener_with_callback("mouseleave", cb.as_ref().unchecked_ref());
		}
		drop(listeners);
		inner.animate.borrow_mut().take();

		info!("starfield: animation stopped and resources released");
	}
}

impl Drop for Background {
	fn drop(&mut self) {
		self.destroy();
	}
}

#[cfg(test)]
mod tests {
	use super::super::surface::recording::RecordingSurface;
	use super::*;

	#[test]
	fn resize_burst_fires_once() {
		let debounce = Debouncer::default();
		let tickets: Vec<u64> = (0..6).map(|_| debounce.trigger()).collect();

		let fired: Vec<u64> = tickets.iter().copied().filter(|&t| debounce.fire(t)).collect();
		assert_eq!(fired, vec![tickets[5]]);
		assert!(!debounce.fire(tickets[5]));

		let next = debounce.trigger();
		assert!(debounce.fire(next));
	}

	#[test]
	fn resize_burst_regenerates_the_field_once() {
		let mut state = BackgroundState::new(Settings::default(), None, fastrand::Rng::with_seed(8));
		state.start(Bounds::new(800.0, 600.0));
		let debounce = Debouncer::default();

		let mut regenerations = 0;
		let tickets: Vec<u64> = (0..4).map(|_| debounce.trigger()).collect();
		for ticket in tickets {
			if debounce.fire(ticket) {
				state.resize(Bounds::new(1600.0, 900.0));
				regenerations += 1;
			}
		}
		assert_eq!(regenerations, 1);
		assert_eq!(state.bounds, Bounds::new(1600.0, 900.0));
	}

	#[test]
	fn cancelled_resize_never_fires() {
		let debounce = Debouncer::default();
		let ticket = debounce.trigger();
		debounce.cancel();
		assert!(!debounce.fire(ticket));
	}

	#[test]
	fn closing_the_frame_slot_hands_back_the_pending_request() {
		let frame = FrameSlot::default();
		assert!(frame.may_request());
		frame.requested(42);
		assert!(!frame.may_request());

		assert_eq!(frame.close(), Some(42));
		assert_eq!(frame.close(), None);
		assert!(!frame.may_request());
	}

	#[test]
	fn frame_after_close_requests_nothing() {
		let frame = FrameSlot::default();
		frame.requested(1);
		frame.begin_frame();
		assert!(frame.may_request());
		frame.requested(2);

		let mut state = BackgroundState::new(Settings::default(), None, fastrand::Rng::with_seed(3));
		state.start(Bounds::new(800.0, 600.0));
		assert_eq!(frame.close(), Some(2));
		assert!(state.destroy());
		assert!(!state.destroy());

		// A callback that was already queued still runs once.
		frame.begin_frame();
		let mut surface = RecordingSurface::default();
		assert!(state.frame(16.0, &mut surface).is_none());
		assert!(surface.ops.is_empty());
		assert!(!frame.may_request());
	}
}
