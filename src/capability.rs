//! Role resolution. Every permission check in the UI goes through [`Role`].

use crate::session::AuthData;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
	#[default]
	Viewer,
	SubAdmin,
	Admin,
}

impl Role {
	/// Missing sessions and unknown role strings resolve to [`Role::Viewer`].
	pub fn resolve(auth: Option<&AuthData>) -> Self {
		auth.map(|a| Self::from_name(&a.role)).unwrap_or_default()
	}

	pub fn from_name(name: &str) -> Self {
		match name {
			"admin" => Self::Admin,
			"sub-admin" => Self::SubAdmin,
			_ => Self::Viewer,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Viewer => "viewer",
			Self::SubAdmin => "sub-admin",
			Self::Admin => "admin",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Viewer => "Viewer",
			Self::SubAdmin => "Sub-admin",
			Self::Admin => "Admin",
		}
	}

	pub fn can_edit(self) -> bool {
		matches!(self, Self::Admin | Self::SubAdmin)
	}

	pub fn can_manage_users(self) -> bool {
		self == Self::Admin
	}

	pub const ALL: [Role; 3] = [Role::Viewer, Role::SubAdmin, Role::Admin];
}
