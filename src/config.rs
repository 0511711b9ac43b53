//! Build-time configuration for the backend API and UI timings.

use std::str::FromStr;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// What the tree view does after a person was edited successfully.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditSuccess {
	/// Reload the whole page.
	#[default]
	Reload,
	/// Re-run the tree fetch and rebuild the tree in place.
	Refetch,
}

impl FromStr for EditSuccess {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"reload" => Ok(Self::Reload),
			"refetch" => Ok(Self::Refetch),
			other => Err(format!("unknown edit-success policy '{other}'")),
		}
	}
}

/// Backend location and client-side behavior knobs.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
	pub base_url: String,
	pub hover_hide_delay: Duration,
	pub occupation_debounce: Duration,
	pub edit_success: EditSuccess,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self::new(DEFAULT_API_URL)
	}
}

impl ApiConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			hover_hide_delay: Duration::from_millis(120),
			occupation_debounce: Duration::from_millis(300),
			edit_success: EditSuccess::default(),
		}
	}

	/// Reads `FAMILY_TREE_API_URL` and `FAMILY_TREE_EDIT_SUCCESS` as baked in at compile time.
	pub fn from_build_env() -> Self {
		let mut config = Self::new(option_env!("FAMILY_TREE_API_URL").unwrap_or(DEFAULT_API_URL));
		if let Some(raw) = option_env!("FAMILY_TREE_EDIT_SUCCESS") {
			match raw.parse() {
				Ok(policy) => config.edit_success = policy,
				Err(e) => log::warn!("ignoring FAMILY_TREE_EDIT_SUCCESS: {e}"),
			}
		}
		config
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	pub fn login(&self) -> String {
		self.url("api/auth/login")
	}

	pub fn change_password(&self) -> String {
		self.url("api/auth/change-password")
	}

	pub fn change_email(&self) -> String {
		self.url("api/auth/change-email")
	}

	pub fn family_tree(&self) -> String {
		self.url("api/persons/family-tree")
	}

	pub fn all_persons(&self) -> String {
		self.url("api/persons/all-persons")
	}

	pub fn person(&self, id: &str) -> String {
		self.url(&format!("api/persons/get-person/{id}"))
	}

	pub fn create_person(&self) -> String {
		self.url("api/persons/create-person")
	}

	pub fn update_person(&self, id: &str) -> String {
		self.url(&format!("api/persons/update-person/{id}"))
	}

	pub fn delete_person(&self, id: &str) -> String {
		self.url(&format!("api/persons/delete-person/{id}"))
	}

	pub fn eligible_spouses(&self) -> String {
		self.url("api/persons/eligible-spouses")
	}

	pub fn eligible_parents(&self) -> String {
		self.url("api/persons/eligible-parents")
	}

	pub fn occupations(&self, query: &str) -> String {
		let encoded = String::from(js_sys::encode_uri_component(query));
		self.url(&format!("api/persons/occupations?search={encoded}"))
	}

	pub fn family_members(&self) -> String {
		self.url("api/users/family-members")
	}

	pub fn user_role(&self, id: &str) -> String {
		self.url(&format!("api/users/{id}/role"))
	}

	pub fn user(&self, id: &str) -> String {
		self.url(&format!("api/users/{id}"))
	}

	pub fn upload_image(&self) -> String {
		self.url("api/upload/image")
	}

	/// Resolves a file URL returned by the upload endpoint. Absolute URLs pass through.
	pub fn resolve_asset(&self, file_url: &str) -> String {
		if file_url.starts_with("http://") || file_url.starts_with("https://") {
			file_url.to_string()
		} else {
			self.url(file_url)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_url_trailing_slash_is_dropped() {
		let config = ApiConfig::new("https://api.example.org/");
		assert_eq!(config.base_url, "https://api.example.org");
		assert_eq!(
			config.family_tree(),
			"https://api.example.org/api/persons/family-tree"
		);
	}

	#[test]
	fn id_endpoints_embed_the_id() {
		let config = ApiConfig::default();
		assert_eq!(
			config.update_person("abc"),
			"http://localhost:5000/api/persons/update-person/abc"
		);
		assert_eq!(config.user_role("u1"), "http://localhost:5000/api/users/u1/role");
		assert_eq!(config.user("u1"), "http://localhost:5000/api/users/u1");
	}

	#[test]
	fn account_endpoints_live_under_auth() {
		let config = ApiConfig::new("https://api.example.org");
		assert_eq!(
			config.change_password(),
			"https://api.example.org/api/auth/change-password"
		);
		assert_eq!(
			config.change_email(),
			"https://api.example.org/api/auth/change-email"
		);
	}

	#[test]
	fn relative_upload_urls_resolve_against_base() {
		let config = ApiConfig::default();
		assert_eq!(
			config.resolve_asset("/uploads/a.png"),
			"http://localhost:5000/uploads/a.png"
		);
		assert_eq!(
			config.resolve_asset("https://cdn.example.org/a.png"),
			"https://cdn.example.org/a.png"
		);
	}

	#[test]
	fn edit_success_parses_case_insensitively() {
		assert_eq!("Refetch".parse::<EditSuccess>(), Ok(EditSuccess::Refetch));
		assert_eq!(" reload ".parse::<EditSuccess>(), Ok(EditSuccess::Reload));
		assert!("patch".parse::<EditSuccess>().is_err());
	}

	#[test]
	fn default_timings() {
		let config = ApiConfig::default();
		assert_eq!(config.hover_hide_delay, Duration::from_millis(120));
		assert_eq!(config.occupation_debounce, Duration::from_millis(300));
		assert_eq!(config.edit_success, EditSuccess::Reload);
	}
}
