use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::render;
use super::state::{BOARD_HEIGHT, BoardView, PinPolicy};
use crate::model::{BoardGraph, NodeStatus};

#[component]
pub fn BoardCanvas(
	#[prop(into)] graph: Signal<Option<BoardGraph>>,
	#[prop(into)] stones: Signal<Vec<NodeStatus>>,
	on_select: impl Fn(usize) + 'static,
	#[prop(default = PinPolicy::Retain)] pin_policy: PinPolicy,
	#[prop(default = None)] width: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let view: Rc<RefCell<Option<BoardView>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_started = Rc::new(Cell::new(false));

	let (view_init, animate_init, raf_init) =
		(view.clone(), animate.clone(), raf_started.clone());
	Effect::new(move |_| {
		let next_graph = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let w = width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		});
		canvas.set_width(w as u32);
		canvas.set_height(BOARD_HEIGHT as u32);

		*view_init.borrow_mut() = next_graph.map(|g| {
			let mut built = BoardView::new(&g, w, pin_policy);
			// A replacement board picks the last pushed state straight back up.
			let held = stones.get_untracked();
			if !held.is_empty() {
				let _ = built.apply(&held);
			}
			built
		});

		if raf_init.get() {
			return;
		}
		raf_init.set(true);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let (view_anim, animate_inner, canvas_anim) =
			(view_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			match &mut *view_anim.borrow_mut() {
				Some(v) => {
					v.tick();
					render::render(v, &ctx);
				}
				None => {
					ctx.clear_rect(
						0.0,
						0.0,
						canvas_anim.width() as f64,
						canvas_anim.height() as f64,
					);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let view_apply = view.clone();
	Effect::new(move |_| {
		let state = stones.get();
		if state.is_empty() {
			return;
		}
		if let Some(ref mut v) = *view_apply.borrow_mut() {
			if let Err(e) = v.apply(&state) {
				log::error!("ignoring board state push: {e}");
			}
		}
	});

	let view_md = view.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut v) = *view_md.borrow_mut() {
			v.pointer_down(x, y);
		}
	};

	let view_mm = view.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut v) = *view_mm.borrow_mut() {
			v.pointer_move(x, y);
		}
	};

	let view_mu = view.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = match &mut *view_mu.borrow_mut() {
			Some(v) => v.pointer_up(),
			None => None,
		};
		if let Some(index) = clicked {
			on_select(index);
		}
	};

	let view_ml = view.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut v) = *view_ml.borrow_mut() {
			v.cancel_pointer();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="board-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: pointer;"
		/>
	}
}
