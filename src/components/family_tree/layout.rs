//! Tidy top-down tree layout.
//!
//! Each subtree is laid out on its own and described by its contour: the
//! leftmost and rightmost x at every depth, relative to the subtree root.
//! Siblings are pushed right until their contours clear each other by the
//! separation, and the parent is centered over its first and last child.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
	/// Horizontal unit; separations are multiples of it.
	pub node_width: f64,
	pub level_height: f64,
	pub siblings: f64,
	pub non_siblings: f64,
}

impl Spacing {
	/// Node size derived from the widest box in the forest.
	pub fn for_max_width(max_width: f64) -> Self {
		Self {
			node_width: max_width + 60.0,
			level_height: 120.0,
			siblings: 0.8,
			non_siblings: 1.2,
		}
	}

	fn gap(&self, depth_below_parent: usize) -> f64 {
		// Only the children themselves share a parent; deeper contour nodes come
		// from different subtrees.
		let factor = if depth_below_parent == 0 {
			self.siblings
		} else {
			self.non_siblings
		};
		factor * self.node_width
	}
}

type Contour = Vec<(f64, f64)>;

/// Computes `(x, y)` for every node reachable through `children`, rooted at `(0, 0)`.
/// Unreachable slots stay `None`.
pub fn tidy_layout<'a>(
	root: usize,
	len: usize,
	children: impl Fn(usize) -> &'a [usize],
	spacing: &Spacing,
) -> Vec<Option<(f64, f64)>> {
	let mut offsets = vec![0.0; len];
	let mut depths = vec![None; len];
	contour(root, 0, &children, spacing, &mut offsets, &mut depths);

	let mut positions = vec![None; len];
	let mut stack = vec![(root, 0.0)];
	while let Some((idx, x)) = stack.pop() {
		let Some(depth) = depths[idx] else {
			continue;
		};
		positions[idx] = Some((x, depth as f64 * spacing.level_height));
		for &child in children(idx) {
			stack.push((child, x + offsets[child]));
		}
	}
	positions
}

fn contour<'a>(
	idx: usize,
	depth: usize,
	children: &impl Fn(usize) -> &'a [usize],
	spacing: &Spacing,
	offsets: &mut [f64],
	depths: &mut [Option<usize>],
) -> Contour {
	depths[idx] = Some(depth);
	let kids = children(idx);
	if kids.is_empty() {
		return vec![(0.0, 0.0)];
	}

	let mut merged: Contour = Vec::new();
	let mut placed = Vec::with_capacity(kids.len());
	for &child in kids {
		let sub = contour(child, depth + 1, children, spacing, offsets, depths);
		let shift = if merged.is_empty() {
			0.0
		} else {
			merged
				.iter()
				.zip(&sub)
				.enumerate()
				.map(|(level, (&(_, right), &(left, _)))| right + spacing.gap(level) - left)
				.fold(f64::MIN, f64::max)
		};
		placed.push(shift);
		for (level, &(left, right)) in sub.iter().enumerate() {
			let (left, right) = (left + shift, right + shift);
			match merged.get_mut(level) {
				Some(bounds) => {
					bounds.0 = bounds.0.min(left);
					bounds.1 = bounds.1.max(right);
				}
				None => merged.push((left, right)),
			}
		}
	}

	let center = (placed[0] + placed[placed.len() - 1]) / 2.0;
	for (&child, &x) in kids.iter().zip(&placed) {
		offsets[child] = x - center;
	}

	let mut outline = Vec::with_capacity(merged.len() + 1);
	outline.push((0.0, 0.0));
	outline.extend(merged.into_iter().map(|(l, r)| (l - center, r - center)));
	outline
}
