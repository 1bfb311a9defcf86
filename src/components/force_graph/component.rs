use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::ev;
use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::interaction::{Navigation, PointerSample};
use super::render::{CanvasRenderer, Frame, Renderer};
use super::state::{Sitemap, SitemapState};

type SharedState = Rc<RefCell<Option<SitemapState>>>;

fn navigate(navigation: Navigation) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(err) = window.location().set_href(&navigation.url) {
		warn!("navigation to {} failed: {:?}", navigation.url, err);
	}
}

/// Pointer position relative to the canvas.
fn canvas_sample(canvas: Option<HtmlCanvasElement>, ev: &MouseEvent) -> PointerSample {
	let Some(canvas) = canvas else {
		return PointerSample::default();
	};
	let rect = canvas.get_bounding_client_rect();
	PointerSample::at(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Advances and draws one frame. Returns false once `running` was cleared.
fn frame_step(state: &SharedState, renderer: &mut impl Renderer, running: &AtomicBool) -> bool {
	if !running.load(Ordering::Relaxed) {
		return false;
	}
	if let Some(ref mut s) = *state.borrow_mut() {
		if s.needs_frame() {
			s.advance(renderer);
		}
	}
	true
}

/// Reschedules itself every animation frame until `running` is cleared, after
/// which the renderer and the state handle are dropped.
fn run_frames(state: SharedState, mut renderer: CanvasRenderer, running: Arc<AtomicBool>) {
	if frame_step(&state, &mut renderer, &running) {
		request_animation_frame(move || run_frames(state, renderer, running));
	} else {
		debug!("sitemap animation loop stopped");
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Canvas widget showing a validated sitemap. Ticks the layout on animation
/// frames and stops when unmounted.
#[component]
pub fn SitemapGraph(
	#[prop(into)] sitemap: Signal<Sitemap>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let state_init = state.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("canvas 2d context unavailable");
				return;
			}
		};

		*state_init.borrow_mut() = Some(SitemapState::new(sitemap.get(), w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let listener = window_event_listener(ev::resize, move |_| {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
			on_cleanup(move || listener.remove());
		}

		// Stops the frame loop when the widget goes away or the sitemap changes.
		let running = Arc::new(AtomicBool::new(true));
		let running_cleanup = running.clone();
		on_cleanup(move || running_cleanup.store(false, Ordering::Relaxed));

		let renderer = CanvasRenderer::new(ctx);
		let state_anim = state_init.clone();
		request_animation_frame(move || run_frames(state_anim, renderer, running));
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let sample = canvas_sample(canvas_ref.get().map(Into::into), &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(sample);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let sample = canvas_sample(canvas_ref.get().map(Into::into), &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(sample);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let navigation = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(),
			None => None,
		};
		if let Some(navigation) = navigation {
			navigate(navigation);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let sample = canvas_sample(canvas_ref.get().map(Into::into), &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(Some(ev.delta_y()), sample);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="sitemap-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
