//! Per-node pointer interaction: `Idle -> Hovered -> (Idle | Editing)`, `Editing -> Idle`.
//!
//! Hiding is debounced: leaving a node or its card only marks the hover as
//! leaving, and the hover ends when the hide timer fires through
//! [`Interaction::expire`] with no re-entry in between.

use crate::capability::Role;

#[derive(Clone, Debug, PartialEq)]
pub enum Phase<K> {
	Idle,
	Hovered { key: K, leaving: bool },
	Editing { key: K },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Interaction<K> {
	phase: Phase<K>,
}

impl<K> Default for Interaction<K> {
	fn default() -> Self {
		Self { phase: Phase::Idle }
	}
}

impl<K: Clone + PartialEq> Interaction<K> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn hovered(&self) -> Option<&K> {
		match &self.phase {
			Phase::Hovered { key, .. } => Some(key),
			_ => None,
		}
	}

	/// Pointer entered `key` or its card. Cancels a pending hide. Ignored while editing.
	/// Returns whether anything changed.
	pub fn enter(&mut self, key: K) -> bool {
		let next = Phase::Hovered { key, leaving: false };
		if matches!(self.phase, Phase::Editing { .. }) || self.phase == next {
			return false;
		}
		self.phase = next;
		true
	}

	/// Pointer left the hovered node or card. Returns true when a hide timer
	/// should be started; a hover that is already leaving keeps its timer.
	pub fn leave(&mut self) -> bool {
		match &mut self.phase {
			Phase::Hovered { leaving, .. } if !*leaving => {
				*leaving = true;
				true
			}
			_ => false,
		}
	}

	/// The hide timer fired. Ends a hover that is still leaving.
	pub fn expire(&mut self) -> bool {
		match self.phase {
			Phase::Hovered { leaving: true, .. } => {
				self.phase = Phase::Idle;
				true
			}
			_ => false,
		}
	}

	/// Whether the hovered card should offer editing.
	pub fn can_offer_edit(&self, role: Role) -> bool {
		role.can_edit() && self.hovered().is_some()
	}

	/// Opens the editor for the hovered node. Refused for roles that cannot edit.
	pub fn begin_edit(&mut self, role: Role) -> Option<K> {
		if !role.can_edit() {
			return None;
		}
		let key = self.hovered()?.clone();
		self.phase = Phase::Editing { key: key.clone() };
		Some(key)
	}

	/// Save or cancel.
	pub fn finish_edit(&mut self) {
		if matches!(self.phase, Phase::Editing { .. }) {
			self.phase = Phase::Idle;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fresh() -> Interaction<usize> {
		Interaction::new()
	}

	fn editing(i: &Interaction<usize>) -> Option<usize> {
		match i.phase {
			Phase::Editing { key } => Some(key),
			_ => None,
		}
	}

	#[test]
	fn enter_shows_immediately() {
		let mut i = fresh();
		assert_eq!(i.hovered(), None);
		i.enter(3);
		assert_eq!(i.hovered(), Some(&3));
	}

	#[test]
	fn leave_hides_when_the_timer_fires() {
		let mut i = fresh();
		i.enter(3);
		assert!(i.leave());
		assert_eq!(i.hovered(), Some(&3));
		assert!(i.expire());
		assert_eq!(i.phase, Phase::Idle);
	}

	#[test]
	fn reentering_before_the_timer_cancels_the_hide() {
		let mut i = fresh();
		i.enter(3);
		i.leave();
		// Pointer moved onto the card.
		assert!(i.enter(3));
		assert!(!i.expire());
		assert_eq!(i.hovered(), Some(&3));
	}

	#[test]
	fn later_leave_starts_a_new_timer() {
		let mut i = fresh();
		i.enter(3);
		i.leave();
		i.enter(3);
		assert!(i.leave());
		assert!(i.expire());
	}

	#[test]
	fn moving_around_outside_keeps_one_timer() {
		let mut i = fresh();
		i.enter(3);
		assert!(i.leave());
		assert!(!i.leave());
		assert!(!i.leave());
		assert!(i.expire());
	}

	#[test]
	fn hover_never_outlives_its_timer() {
		let mut i = fresh();
		i.enter(3);
		assert!(i.leave());
		// Further moves outside the node while the timer is pending.
		assert!(!i.leave());
		assert!(!i.leave());
		assert!(i.expire());
		assert_eq!(i.hovered(), None);
		// A fresh hover can be armed again afterwards.
		i.enter(3);
		assert!(i.leave());
	}

	#[test]
	fn entering_another_node_switches_hover() {
		let mut i = fresh();
		i.enter(3);
		i.leave();
		i.enter(4);
		assert!(!i.expire());
		assert_eq!(i.hovered(), Some(&4));
	}

	#[test]
	fn repeated_enter_is_not_a_change() {
		let mut i = fresh();
		assert!(i.enter(3));
		assert!(!i.enter(3));
		assert!(i.leave());
		assert!(i.enter(3));
	}

	#[test]
	fn expire_without_leave_does_nothing() {
		let mut i = fresh();
		assert!(!i.expire());
		i.enter(1);
		assert!(!i.expire());
		assert_eq!(i.hovered(), Some(&1));
	}

	#[test]
	fn viewers_never_get_to_edit() {
		let mut i = fresh();
		i.enter(3);
		assert!(!i.can_offer_edit(Role::Viewer));
		assert_eq!(i.begin_edit(Role::Viewer), None);
		assert_eq!(i.hovered(), Some(&3));
	}

	#[test]
	fn editors_go_hovered_to_editing_to_idle() {
		let mut i = fresh();
		i.enter(3);
		assert!(i.can_offer_edit(Role::SubAdmin));
		assert_eq!(i.begin_edit(Role::SubAdmin), Some(3));
		assert_eq!(editing(&i), Some(3));
		assert_eq!(i.hovered(), None);

		// Hover events are ignored while the editor is open.
		i.enter(5);
		assert!(!i.leave());
		assert!(!i.expire());
		assert_eq!(editing(&i), Some(3));

		i.finish_edit();
		assert_eq!(i.phase, Phase::Idle);
	}

	#[test]
	fn cannot_edit_without_hover() {
		let mut i = fresh();
		assert_eq!(i.begin_edit(Role::Admin), None);
		assert!(!i.can_offer_edit(Role::Admin));
	}
}
