use std::collections::HashMap;
use std::f64::consts::PI;

use chrono::NaiveDate;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::state::{NODE_HEIGHT, TreeSlot, TreeViewState};
use crate::dates::age_on;

const BACKGROUND: &str = "#f9fafb";
const NODE_FILL: &str = "#ffffff";
const TEXT: &str = "#000000";
const LINK: &str = "#9ca3af";
const AVATAR_FILL: &str = "#f3f4f6";
const AVATAR_STROKE: &str = "#d1d5db";
const MALE: &str = "#3B82F6";
const FEMALE: &str = "#EC4899";
const AVATAR_RADIUS: f64 = 18.0;

pub fn gender_color(gender: &str) -> &'static str {
	if gender == "Male" { MALE } else { FEMALE }
}

/// Photos keyed by URL. An image is drawn once the browser has decoded it.
#[derive(Default)]
pub struct ImageCache {
	images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
	fn ready(&mut self, url: &str) -> Option<&HtmlImageElement> {
		if !self.images.contains_key(url) {
			match HtmlImageElement::new() {
				Ok(img) => {
					img.set_src(url);
					self.images.insert(url.to_string(), img);
				}
				Err(e) => {
					log::warn!("could not create image for {url}: {e:?}");
					return None;
				}
			}
		}
		self.images
			.get(url)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}

pub fn render(
	state: &TreeViewState,
	images: &mut ImageCache,
	ctx: &CanvasRenderingContext2d,
	today: NaiveDate,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, images, ctx, today);
	ctx.restore();
}

/// Step connectors: down to the midline, across, then down to the child.
fn draw_links(state: &TreeViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(LINK);
	ctx.set_line_width(1.5);
	ctx.begin_path();
	for ((x1, y1), (x2, y2)) in state.edges() {
		let mid = (y1 + y2) / 2.0;
		ctx.move_to(x1, y1);
		ctx.line_to(x1, mid);
		ctx.line_to(x2, mid);
		ctx.line_to(x2, y2);
	}
	ctx.stroke();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(
	state: &TreeViewState,
	images: &mut ImageCache,
	ctx: &CanvasRenderingContext2d,
	today: NaiveDate,
) {
	for (idx, slot, (x, y)) in state.visible() {
		// Only people are painted. The root is a transparent hit target and couples are invisible.
		let Some(attrs) = slot.kind.attributes() else {
			continue;
		};
		let hovered = state.hovered == Some(idx);
		draw_person(ctx, images, slot, x, y, gender_color(&attrs.gender), hovered);
		let age = attrs
			.birth_date
			.map(|b| age_on(b, today).to_string())
			.unwrap_or_default();
		let left = x - slot.width / 2.0;
		ctx.set_fill_style_str(TEXT);
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text(&format!("Age: {age}"), left + 55.0, y + 8.0);
		// Collapsed subtrees get a marker under the box.
		if slot.collapsed {
			ctx.set_fill_style_str(gender_color(&attrs.gender));
			ctx.begin_path();
			let _ = ctx.arc(x, y + NODE_HEIGHT / 2.0, 4.0, 0.0, 2.0 * PI);
			ctx.fill();
		}
	}
}

fn draw_person(
	ctx: &CanvasRenderingContext2d,
	images: &mut ImageCache,
	slot: &TreeSlot,
	x: f64,
	y: f64,
	color: &str,
	hovered: bool,
) {
	let left = x - slot.width / 2.0;
	let top = y - NODE_HEIGHT / 2.0;

	ctx.save();
	ctx.set_shadow_color("rgba(0, 0, 0, 0.25)");
	ctx.set_shadow_blur(6.0);
	ctx.set_shadow_offset_x(2.0);
	ctx.set_shadow_offset_y(2.0);
	rounded_rect(ctx, left, top, slot.width, NODE_HEIGHT, 8.0);
	ctx.set_fill_style_str(NODE_FILL);
	ctx.fill();
	ctx.restore();

	rounded_rect(ctx, left, top, slot.width, NODE_HEIGHT, 8.0);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(if hovered { 2.0 } else { 1.0 });
	ctx.stroke();

	let (cx, cy) = (left + 28.0, y);
	match slot.photo.as_deref().and_then(|url| images.ready(url)) {
		Some(img) => {
			ctx.save();
			ctx.begin_path();
			let _ = ctx.arc(cx, cy, AVATAR_RADIUS, 0.0, 2.0 * PI);
			ctx.clip();
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
				img,
				cx - AVATAR_RADIUS,
				cy - AVATAR_RADIUS,
				AVATAR_RADIUS * 2.0,
				AVATAR_RADIUS * 2.0,
			);
			ctx.restore();
		}
		None => {
			ctx.begin_path();
			let _ = ctx.arc(cx, cy, AVATAR_RADIUS, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(AVATAR_FILL);
			ctx.fill();
			ctx.set_stroke_style_str(AVATAR_STROKE);
			ctx.set_line_width(1.0);
			ctx.stroke();
		}
	}

	ctx.set_fill_style_str(TEXT);
	ctx.set_font(super::transform::NAME_FONT);
	let _ = ctx.fill_text(&slot.name, left + 55.0, y - 5.0);
}
