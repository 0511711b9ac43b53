//! API person records to drawable [`DisplayNode`]s.
//!
//! Runs in two passes. [`measure`] walks the forest once, sizing every person
//! and spouse and tracking the widest. [`build`] then turns the measured tree
//! into display nodes. Nothing is mutated across the recursion.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::types::{Attributes, DisplayNode, FamilyForest, NodeKind, ROOT_ID, ROOT_NAME};
use crate::api::{PersonDetails, PersonNode};
use crate::dates::{format_birth_date, parse_birth_date};

pub const NAME_FONT: &str = "600 14px sans-serif";
pub const MIN_NODE_WIDTH: f64 = 140.0;
const AVATAR: f64 = 36.0;
const AVATAR_GAP: f64 = 10.0;
const TRAILING: f64 = 15.0 + 10.0;
const DEFAULT_COUNTRY_CODE: &str = "+91";

pub trait TextMeasure {
	/// Rendered width of `text` in pixels at [`NAME_FONT`].
	fn text_width(&self, text: &str) -> Option<f64>;
}

/// Measures with an offscreen canvas, the same way the renderer draws names.
pub struct CanvasTextMeasure {
	ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasTextMeasure {
	pub fn new() -> Self {
		let ctx = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.create_element("canvas").ok())
			.and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
			.and_then(|canvas| canvas.get_context("2d").ok().flatten())
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
		if let Some(ctx) = &ctx {
			ctx.set_font(NAME_FONT);
		} else {
			log::warn!("no 2d context for text measurement, using minimum node width");
		}
		Self { ctx }
	}
}

impl Default for CanvasTextMeasure {
	fn default() -> Self {
		Self::new()
	}
}

impl TextMeasure for CanvasTextMeasure {
	fn text_width(&self, text: &str) -> Option<f64> {
		let ctx = self.ctx.as_ref()?;
		ctx.measure_text(text).ok().map(|m| m.width())
	}
}

/// Box width for a name: avatar, gap, text and trailing space, never under the floor.
pub fn node_width(measure: &dyn TextMeasure, name: &str) -> f64 {
	match measure.text_width(name) {
		Some(text) => (AVATAR + AVATAR_GAP + text + TRAILING).max(MIN_NODE_WIDTH),
		None => MIN_NODE_WIDTH,
	}
}

/// First-pass result, mirroring the input tree.
pub struct Measured<'a> {
	person: &'a PersonNode,
	width: f64,
	spouse_width: Option<f64>,
	children: Vec<Measured<'a>>,
}

impl Measured<'_> {
	fn max_width(&self) -> f64 {
		self.children
			.iter()
			.map(Measured::max_width)
			.fold(self.width.max(self.spouse_width.unwrap_or(0.0)), f64::max)
	}
}

pub fn measure<'a>(person: &'a PersonNode, text: &dyn TextMeasure) -> Measured<'a> {
	Measured {
		person,
		width: node_width(text, &person.details.name),
		spouse_width: person
			.spouse
			.as_ref()
			.map(|s| node_width(text, &s.name)),
		children: person
			.children
			.iter()
			.map(|child| measure(child, text))
			.collect(),
	}
}

fn or_empty(value: &Option<String>) -> String {
	value.clone().unwrap_or_default()
}

fn attributes(details: &PersonDetails) -> Attributes {
	let birth_date = details.date_of_birth.as_deref().and_then(parse_birth_date);
	Attributes {
		gender: details.gender.clone(),
		date_of_birth: birth_date
			.map(format_birth_date)
			.unwrap_or_else(|| "Unknown".to_string()),
		birth_date,
		occupation: or_empty(&details.occupation),
		current_address: or_empty(&details.current_address),
		country_code: details
			.country_code
			.clone()
			.filter(|c| !c.is_empty())
			.unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
		contact_number: or_empty(&details.contact_number),
		email: or_empty(&details.email),
	}
}

fn person_node(details: &PersonDetails, width: f64, children: Vec<DisplayNode>) -> DisplayNode {
	DisplayNode {
		name: details.name.clone(),
		photo: details.photo.clone().filter(|p| !p.is_empty()),
		width,
		id: Some(details.id.clone()),
		kind: NodeKind::Person(attributes(details)),
		children,
	}
}

pub fn build(measured: &Measured<'_>) -> DisplayNode {
	let children = measured.children.iter().map(build).collect();
	let own = person_node(&measured.person.details, measured.width, children);

	match (&measured.person.spouse, measured.spouse_width) {
		(Some(spouse), Some(spouse_width)) => DisplayNode {
			name: String::new(),
			photo: None,
			width: 0.0,
			id: None,
			kind: NodeKind::Couple,
			children: vec![own, person_node(spouse, spouse_width, Vec::new())],
		},
		_ => own,
	}
}

/// Transforms every family and hangs them under the synthetic root.
pub fn transform_forest(roots: &[PersonNode], text: &dyn TextMeasure) -> FamilyForest {
	let measured: Vec<Measured<'_>> = roots.iter().map(|r| measure(r, text)).collect();
	let max_width = measured
		.iter()
		.map(Measured::max_width)
		.fold(MIN_NODE_WIDTH, f64::max);

	FamilyForest {
		root: DisplayNode {
			name: ROOT_NAME.to_string(),
			photo: None,
			width: 0.0,
			id: Some(ROOT_ID.to_string()),
			kind: NodeKind::Root,
			children: measured.iter().map(build).collect(),
		},
		max_width,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Fixed advance per character.
	struct Monospace(f64);

	impl TextMeasure for Monospace {
		fn text_width(&self, text: &str) -> Option<f64> {
			Some(text.chars().count() as f64 * self.0)
		}
	}

	struct NoContext;

	impl TextMeasure for NoContext {
		fn text_width(&self, _: &str) -> Option<f64> {
			None
		}
	}

	fn details(id: &str, name: &str) -> PersonDetails {
		PersonDetails {
			id: id.into(),
			name: name.into(),
			gender: "Male".into(),
			..Default::default()
		}
	}

	fn person(id: &str, name: &str, children: Vec<PersonNode>) -> PersonNode {
		PersonNode {
			details: details(id, name),
			spouse: None,
			children,
		}
	}

	#[test]
	fn width_has_a_floor() {
		assert_eq!(node_width(&Monospace(8.0), ""), MIN_NODE_WIDTH);
		assert_eq!(node_width(&Monospace(8.0), "Al"), MIN_NODE_WIDTH);
		assert_eq!(node_width(&NoContext, "A very long name indeed"), MIN_NODE_WIDTH);
	}

	#[test]
	fn width_pads_text_for_avatar_and_gaps() {
		// 20 chars * 8px = 160 text + 36 + 10 + 25
		assert_eq!(node_width(&Monospace(8.0), &"x".repeat(20)), 231.0);
	}

	#[test]
	fn width_never_shrinks_as_text_grows() {
		let measure = Monospace(7.5);
		let mut last = 0.0;
		for len in 0..60 {
			let w = node_width(&measure, &"m".repeat(len));
			assert!(w >= MIN_NODE_WIDTH);
			assert!(w >= last);
			last = w;
		}
	}

	#[test]
	fn families_root_wraps_every_tree() {
		let roots = vec![person("a", "A", vec![]), person("b", "B", vec![])];
		let forest = transform_forest(&roots, &Monospace(8.0));
		assert_eq!(forest.root.name, ROOT_NAME);
		assert_eq!(forest.root.id.as_deref(), Some(ROOT_ID));
		assert_eq!(forest.root.kind, NodeKind::Root);
		assert_eq!(forest.root.width, 0.0);
		let ids: Vec<_> = forest
			.root
			.children
			.iter()
			.map(|c| c.id.as_deref().unwrap())
			.collect();
		assert_eq!(ids, ["a", "b"]);
	}

	#[test]
	fn spouse_becomes_a_couple_node_with_two_leafless_partners() {
		let mut root = person("p1", "Ravi", vec![person("p3", "Kiran", vec![])]);
		root.spouse = Some(details("p2", "Meena"));
		let forest = transform_forest(&[root], &Monospace(8.0));

		let couple = &forest.root.children[0];
		assert_eq!(couple.kind, NodeKind::Couple);
		assert_eq!(couple.name, "");
		assert!(couple.id.is_none());
		assert_eq!(couple.children.len(), 2);

		let (own, spouse) = (&couple.children[0], &couple.children[1]);
		assert_eq!(own.id.as_deref(), Some("p1"));
		assert_eq!(spouse.id.as_deref(), Some("p2"));
		assert!(own.kind.attributes().is_some() && spouse.kind.attributes().is_some());
		// Children stay with the person; the spouse is always a leaf.
		assert_eq!(own.children.len(), 1);
		assert!(spouse.children.is_empty());
		assert!(own.children.iter().all(|c| c.kind != NodeKind::Couple));
	}

	#[test]
	fn nested_couples_still_pair_correctly() {
		let mut child = person("c", "Child", vec![]);
		child.spouse = Some(details("cs", "Partner"));
		let mut root = person("r", "Root", vec![child]);
		root.spouse = Some(details("rs", "Other"));
		let forest = transform_forest(&[root], &Monospace(8.0));

		let top = &forest.root.children[0];
		let inner = &top.children[0].children[0];
		assert_eq!(inner.kind, NodeKind::Couple);
		assert_eq!(inner.children[1].id.as_deref(), Some("cs"));
		assert!(inner.children.iter().all(|c| c.kind.attributes().is_some()));
	}

	#[test]
	fn max_width_covers_spouses_and_descendants() {
		let mut root = person("r", "Al", vec![person("c", &"x".repeat(30), vec![])]);
		root.spouse = Some(details("s", &"y".repeat(25)));
		let forest = transform_forest(&[root], &Monospace(8.0));
		assert_eq!(forest.max_width, 36.0 + 10.0 + 240.0 + 25.0);

		let empty = transform_forest(&[], &Monospace(8.0));
		assert_eq!(empty.max_width, MIN_NODE_WIDTH);
		assert!(empty.root.children.is_empty());
	}

	#[test]
	fn attributes_default_missing_fields() {
		let forest = transform_forest(&[person("a", "A", vec![])], &Monospace(8.0));
		let attrs = forest.root.children[0].kind.attributes().unwrap();
		assert_eq!(attrs.date_of_birth, "Unknown");
		assert_eq!(attrs.birth_date, None);
		assert_eq!(attrs.country_code, "+91");
		assert_eq!(attrs.occupation, "");
		assert_eq!(attrs.email, "");
	}

	#[test]
	fn attributes_carry_formatted_birth_date() {
		let mut p = person("a", "A", vec![]);
		p.details.date_of_birth = Some("1985-11-02T00:00:00.000Z".into());
		p.details.country_code = Some("+44".into());
		p.details.photo = Some(String::new());
		let forest = transform_forest(&[p], &Monospace(8.0));
		let node = &forest.root.children[0];
		let attrs = node.kind.attributes().unwrap();
		assert_eq!(attrs.date_of_birth, "2/11/1985");
		assert_eq!(attrs.country_code, "+44");
		assert!(node.photo.is_none());
	}

	#[test]
	fn synthetic_nodes_have_no_attributes() {
		let mut p = person("a", "A", vec![]);
		p.spouse = Some(details("b", "B"));
		let forest = transform_forest(&[p], &Monospace(8.0));
		assert!(forest.root.kind.attributes().is_none());
		assert!(forest.root.children[0].kind.attributes().is_none());
	}
}
