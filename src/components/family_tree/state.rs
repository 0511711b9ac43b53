use super::layout::{Spacing, tidy_layout};
use super::types::{DisplayNode, FamilyForest, NodeKind};

pub const NODE_HEIGHT: f64 = 50.0;
pub const ROOT_RADIUS: f64 = 15.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 2.0;
pub const INITIAL_ZOOM: f64 = 0.6;
pub const TOP_OFFSET: f64 = 100.0;
/// Pointer travel (px) after which a press counts as a pan rather than a click.
const CLICK_SLOP: f64 = 4.0;
const CARD_OFFSET: (f64, f64) = (30.0, 35.0);

#[derive(Clone, Debug)]
pub struct TreeSlot {
	pub name: String,
	pub photo: Option<String>,
	pub width: f64,
	pub id: Option<String>,
	pub kind: NodeKind,
	pub children: Vec<usize>,
	pub collapsed: bool,
}

impl TreeSlot {
	fn visible_children(&self) -> &[usize] {
		if self.collapsed { &[] } else { &self.children }
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub pressed: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct TreeViewState {
	pub slots: Vec<TreeSlot>,
	pub positions: Vec<Option<(f64, f64)>>,
	pub spacing: Spacing,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hovered: Option<usize>,
	pub width: f64,
	pub height: f64,
}

fn flatten(node: &DisplayNode, slots: &mut Vec<TreeSlot>) -> usize {
	let idx = slots.len();
	slots.push(TreeSlot {
		name: node.name.clone(),
		photo: node.photo.clone(),
		width: node.width,
		id: node.id.clone(),
		kind: node.kind.clone(),
		children: Vec::with_capacity(node.children.len()),
		collapsed: false,
	});
	for child in &node.children {
		let child_idx = flatten(child, slots);
		slots[idx].children.push(child_idx);
	}
	idx
}

impl TreeViewState {
	pub fn new(forest: &FamilyForest, width: f64, height: f64) -> Self {
		let mut slots = Vec::with_capacity(forest.root.count());
		flatten(&forest.root, &mut slots);

		let mut state = Self {
			positions: Vec::new(),
			slots,
			spacing: Spacing::for_max_width(forest.max_width),
			transform: ViewTransform {
				x: width / 2.0,
				y: TOP_OFFSET,
				k: INITIAL_ZOOM,
			},
			pan: PanState::default(),
			hovered: None,
			width,
			height,
		};
		state.relayout();
		state
	}

	pub fn relayout(&mut self) {
		let slots = &self.slots;
		self.positions = tidy_layout(
			0,
			slots.len(),
			move |i| slots[i].visible_children(),
			&self.spacing,
		);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	/// Visible slots with their positions, in draw order.
	pub fn visible(&self) -> impl Iterator<Item = (usize, &TreeSlot, (f64, f64))> {
		self.slots
			.iter()
			.enumerate()
			.filter_map(|(i, slot)| self.positions[i].map(|p| (i, slot, p)))
	}

	/// Parent-child pairs to connect. Links out of the synthetic root are skipped.
	pub fn edges(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
		self.visible()
			.filter(|(_, slot, _)| slot.kind != NodeKind::Root)
			.flat_map(move |(_, slot, from)| {
				slot.visible_children()
					.iter()
					.filter_map(move |&c| self.positions[c].map(|to| (from, to)))
			})
	}

	/// Topmost drawn node under a canvas point. Couple nodes are never hit.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (idx, slot, (x, y)) in self.visible() {
			let hit = match slot.kind {
				NodeKind::Person(_) => {
					(gx - x).abs() <= slot.width / 2.0 && (gy - y).abs() <= NODE_HEIGHT / 2.0
				}
				NodeKind::Root => {
					let (dx, dy) = (gx - x, gy - y);
					(dx * dx + dy * dy).sqrt() <= ROOT_RADIUS
				}
				NodeKind::Couple => false,
			};
			if hit {
				found = Some(idx);
			}
		}
		found
	}

	pub fn person_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		self.node_at_position(sx, sy)
			.filter(|&i| matches!(self.slots[i].kind, NodeKind::Person(_)))
	}

	/// Collapses or expands a node's subtree. Leaves are left alone.
	pub fn toggle_collapse(&mut self, idx: usize) -> bool {
		let Some(slot) = self.slots.get_mut(idx) else {
			return false;
		};
		if slot.children.is_empty() {
			return false;
		}
		slot.collapsed = !slot.collapsed;
		self.relayout();
		true
	}

	/// Screen point for a node's detail card, relative to the canvas.
	pub fn card_anchor(&self, idx: usize) -> Option<(f64, f64)> {
		let (x, y) = self.positions.get(idx).copied().flatten()?;
		let (sx, sy) = self.graph_to_screen(x, y);
		Some((sx + CARD_OFFSET.0, sy + CARD_OFFSET.1))
	}

	pub fn begin_press(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			pressed: self.node_at_position(x, y),
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn drag_to(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
			self.pan.moved = true;
		}
		if self.pan.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// Ends a press. A press that never moved on a node toggles that node.
	pub fn end_press(&mut self) -> Option<usize> {
		let pan = std::mem::take(&mut self.pan);
		if !pan.active || pan.moved {
			return None;
		}
		let idx = pan.pressed?;
		self.toggle_collapse(idx).then_some(idx)
	}

	pub fn cancel_press(&mut self) {
		self.pan = PanState::default();
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
