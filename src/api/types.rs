use serde::{Deserialize, Serialize};

/// Fields shared by a person and their spouse reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonDetails {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	pub gender: String,
	pub date_of_birth: Option<String>,
	pub photo: Option<String>,
	pub occupation: Option<String>,
	pub current_address: Option<String>,
	pub contact_number: Option<String>,
	pub email: Option<String>,
	pub country_code: Option<String>,
	pub place_of_birth: Option<String>,
}

/// A family-tree record. The spouse is flattened to [`PersonDetails`], so it
/// can never carry a spouse or children of its own.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonNode {
	#[serde(flatten)]
	pub details: PersonDetails,
	#[serde(default)]
	pub spouse: Option<PersonDetails>,
	#[serde(default)]
	pub children: Vec<PersonNode>,
}

/// `{ success, data }` wrapper used by most endpoints; only `data` is read.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
	pub data: T,
}

/// Error bodies carry a human-readable `message`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
	#[serde(default)]
	pub message: Option<String>,
}

/// A user account in the family.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	pub email: String,
	pub role: String,
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Candidate parent, with the spouse who becomes the second parent.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentCandidate {
	#[serde(rename = "_id")]
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub gender: String,
	#[serde(default, rename = "spouse_id")]
	pub spouse: Option<IdOrRef>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PersonRef {
	#[serde(rename = "_id")]
	pub id: String,
	#[serde(default)]
	pub name: String,
}

/// `spouse_id` / `parent_ids` come back either populated or as bare ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdOrRef {
	Id(String),
	Ref(PersonRef),
}

impl IdOrRef {
	pub fn id(&self) -> &str {
		match self {
			Self::Id(id) => id,
			Self::Ref(r) => &r.id,
		}
	}
}

/// A single person as returned by `get-person`, including relation ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PersonRecord {
	#[serde(flatten)]
	pub details: PersonDetails,
	#[serde(default)]
	pub spouse_id: Option<IdOrRef>,
	#[serde(default)]
	pub parent_ids: Vec<IdOrRef>,
}

impl ParentCandidate {
	/// The ids that become `parent_ids` when this candidate is picked.
	pub fn parent_ids(&self) -> Vec<String> {
		let mut ids = vec![self.id.clone()];
		if let Some(spouse) = &self.spouse {
			ids.push(spouse.id().to_string());
		}
		ids
	}
}

/// Body for create and update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
	pub name: String,
	pub gender: String,
	pub date_of_birth: String,
	pub place_of_birth: String,
	pub current_address: String,
	pub contact_number: String,
	pub country_code: String,
	pub email: String,
	pub occupation: String,
	pub photo: String,
	#[serde(rename = "spouse_id")]
	pub spouse_id: String,
	#[serde(rename = "parent_ids")]
	pub parent_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
	pub email: String,
	pub password: String,
}

/// Body for a password change. The server checks `previous_password`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
	pub previous_password: String,
	pub new_password: String,
	pub confirm_password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct EmailChange<'a> {
	pub email: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoleUpdate<'a> {
	pub role: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
	pub file_url: String,
}
