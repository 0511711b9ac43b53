use chrono::NaiveDate;

pub const ROOT_NAME: &str = "Families";
pub const ROOT_ID: &str = "root";
const ADDRESS_PREVIEW: usize = 20;

/// Flat detail bag shown on a person's card and prefilled into the edit form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
	pub gender: String,
	/// Display form of the birth date, or "Unknown".
	pub date_of_birth: String,
	pub birth_date: Option<NaiveDate>,
	pub occupation: String,
	pub current_address: String,
	pub country_code: String,
	pub contact_number: String,
	pub email: String,
}

impl Attributes {
	/// Address cut to its first few characters for the hover card.
	pub fn short_address(&self) -> String {
		let mut chars = self.current_address.chars();
		let head: String = chars.by_ref().take(ADDRESS_PREVIEW).collect();
		if chars.next().is_some() {
			format!("{head}...")
		} else {
			head
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	/// The synthetic "Families" node above every family.
	Root,
	/// Invisible parent pairing a person with their spouse.
	Couple,
	Person(Attributes),
}

impl NodeKind {
	/// Only people carry attributes; the root and couple nodes are never hoverable.
	pub fn attributes(&self) -> Option<&Attributes> {
		match self {
			Self::Person(attrs) => Some(attrs),
			Self::Root | Self::Couple => None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNode {
	pub name: String,
	pub photo: Option<String>,
	pub width: f64,
	/// Backend id; `None` for couple nodes.
	pub id: Option<String>,
	pub kind: NodeKind,
	pub children: Vec<DisplayNode>,
}

impl DisplayNode {
	/// Nodes in pre-order, this one first.
	pub fn count(&self) -> usize {
		1 + self.children.iter().map(DisplayNode::count).sum::<usize>()
	}
}

/// Output of the transform: the synthetic root and the widest node seen.
#[derive(Clone, Debug, PartialEq)]
pub struct FamilyForest {
	pub root: DisplayNode,
	pub max_width: f64,
}
