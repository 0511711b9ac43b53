use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::ev;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::interaction::Interaction;
use super::render::{self, ImageCache};
use super::state::TreeViewState;
use super::types::{Attributes, FamilyForest};
use crate::api::ApiClient;
use crate::components::debounce::Debouncer;
use crate::components::person_form::EditPersonOverlay;
use crate::config::EditSuccess;
use crate::dates;

/// What the hover card shows, copied out of the view state when the hover starts.
#[derive(Clone, Debug, PartialEq)]
struct NodeCard {
	idx: usize,
	id: String,
	width: f64,
	attrs: Attributes,
	/// Viewport position of the card's top-left corner.
	left: f64,
	top: f64,
}

impl NodeCard {
	fn from_state(state: &TreeViewState, idx: usize, canvas: &HtmlCanvasElement) -> Option<Self> {
		let slot = state.slots.get(idx)?;
		let attrs = slot.kind.attributes()?;
		let (x, y) = state.card_anchor(idx)?;
		let rect = canvas.get_bounding_client_rect();
		Some(Self {
			idx,
			id: slot.id.clone()?,
			width: slot.width,
			attrs: attrs.clone(),
			left: rect.left() + x,
			top: rect.top() + y,
		})
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// The canvas fills its container; a detached canvas falls back to 800x600.
fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn reload_page() {
	let reloaded = web_sys::window().map(|w| w.location().reload());
	if let Some(Err(e)) = reloaded {
		warn!("page reload failed: {e:?}");
	}
}

/// Pannable, zoomable family tree with hover cards and in-place editing.
///
/// `on_edited` runs after a successful edit when the configured
/// [`EditSuccess`] policy is `Refetch`; with `Reload` the page reloads instead.
#[component]
pub fn FamilyTreeCanvas(
	forest: FamilyForest,
	#[prop(into)] on_edited: Callback<()>,
) -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let role = client.session().role_untracked();
	let config = client.config();
	let edit_success = config.edit_success;
	let hide_delay = config.hover_hide_delay;

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<TreeViewState>>> = Rc::new(RefCell::new(None));
	let images: Rc<RefCell<ImageCache>> = Rc::new(RefCell::new(ImageCache::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let interaction = RwSignal::new(Interaction::<usize>::new());
	let card = RwSignal::new(None::<NodeCard>);
	let editing = RwSignal::new(None::<NodeCard>);
	let hide_timer = Debouncer::new(hide_delay);

	let (state_init, images_init, animate_init) = (state.clone(), images.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas has no 2d context, tree not drawn");
			return;
		};

		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		*state_init.borrow_mut() = Some(TreeViewState::new(&forest, w, h));
		debug!("family tree mounted at {w}x{h}");

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize = window_event_listener(ev::resize, move |_| {
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});

		// Shared with `on_cleanup`, which needs Send + Sync.
		let alive = Arc::new(AtomicBool::new(true));
		let today = dates::today();
		let (state_anim, images_anim, animate_inner, alive_anim) = (
			state_init.clone(),
			images_init.clone(),
			animate_init.clone(),
			alive.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.hovered = interaction
					.try_with_untracked(|i| i.hovered().copied())
					.flatten();
				render::render(s, &mut images_anim.borrow_mut(), &ctx, today);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		on_cleanup(move || {
			alive.store(false, Ordering::Relaxed);
			resize.remove();
		});
	});

	let pointer = move |ev: &MouseEvent| -> Option<(HtmlCanvasElement, f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		Some((canvas, x, y))
	};

	let hide_later = move || {
		if interaction.try_update(|i| i.leave()).unwrap_or(false) {
			hide_timer.schedule(move || {
				let ended = interaction.try_update(|i| i.expire()).unwrap_or(false);
				if ended {
					card.set(None);
				}
			});
		}
	};

	let show = move |s: &TreeViewState, idx: usize, canvas: &HtmlCanvasElement| {
		hide_timer.cancel();
		if interaction.try_update(|i| i.enter(idx)).unwrap_or(false) {
			card.set(NodeCard::from_state(s, idx, canvas));
		}
	};

	// Keeps an open card attached to its node after zooming or relayout.
	let follow = move |s: &TreeViewState, canvas: &HtmlCanvasElement| {
		card.update(|c| {
			if let Some(open) = c {
				if let Some(next) = NodeCard::from_state(s, open.idx, canvas) {
					*open = next;
				}
			}
		});
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((_, x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((canvas, x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.drag_to(x, y);
			let hit = if s.pan.moved {
				None
			} else {
				s.person_at_position(x, y)
			};
			match hit {
				Some(idx) => show(s, idx, &canvas),
				None => hide_later(),
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((canvas, _, _)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if let Some(idx) = s.end_press() {
				debug!("toggled subtree under slot {idx}");
				follow(s, &canvas);
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_press();
		}
		hide_later();
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((canvas, x, y)) = pointer(&*ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
			follow(s, &canvas);
		}
	};

	let close_editor = move || {
		interaction.update(|i| i.finish_edit());
		editing.set(None);
	};
	let on_saved = Callback::new(move |_: ()| {
		close_editor();
		match edit_success {
			EditSuccess::Reload => reload_page(),
			EditSuccess::Refetch => on_edited.run(()),
		}
	});
	let on_cancel = Callback::new(move |_: ()| close_editor());

	let on_card_enter = Callback::new(move |_: ()| {
		hide_timer.cancel();
		if let Some(open) = card.get_untracked() {
			interaction.update(|i| {
				i.enter(open.idx);
			});
		}
	});
	let on_card_leave = Callback::new(move |_: ()| hide_later());
	let on_edit = Callback::new(move |_: ()| {
		if interaction.try_update(|i| i.begin_edit(role)).flatten().is_some() {
			hide_timer.cancel();
			editing.set(card.get_untracked());
			card.set(None);
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="family-tree-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		{move || {
			card.get()
				.map(|open| {
					let show_edit = interaction.with_untracked(|i| i.can_offer_edit(role));
					view! {
						<HoverCard
							card=open
							show_edit=show_edit
							on_enter=on_card_enter
							on_leave=on_card_leave
							on_edit=on_edit
						/>
					}
				})
		}}
		{move || {
			editing.get()
				.map(|node| {
					view! {
						<EditPersonOverlay
							person_id=node.id
							on_saved=on_saved
							on_cancel=on_cancel
						/>
					}
				})
		}}
	}
}

#[component]
fn HoverCard(
	card: NodeCard,
	show_edit: bool,
	on_enter: Callback<()>,
	on_leave: Callback<()>,
	on_edit: Callback<()>,
) -> impl IntoView {
	let style = format!(
		"position: fixed; left: {}px; top: {}px; min-width: {}px; z-index: 9999;",
		card.left,
		card.top,
		card.width + 30.0,
	);
	let attrs = card.attrs;
	let short_address = attrs.short_address();
	let line = |label: &'static str, value: String| {
		(!value.is_empty()).then(|| view! { <div class="hover-card-line">{label}{value}</div> })
	};

	view! {
		<div
			class="hover-card"
			style=style
			on:mouseenter=move |_| on_enter.run(())
			on:mouseleave=move |_| on_leave.run(())
		>
			{line("Gender: ", attrs.gender)}
			{line("DOB: ", attrs.date_of_birth)}
			{line("Occupation: ", attrs.occupation)}
			{line("📞 ", attrs.contact_number)}
			{line("✉ ", attrs.email)}
			{line("📍 ", short_address)}
			{show_edit
				.then(|| {
					view! {
						<button class="hover-card-edit" on:click=move |_| on_edit.run(())>
							"Edit"
						</button>
					}
				})}
		</div>
	}
}
