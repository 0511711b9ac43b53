//! Form state shared by the add-member page and the edit overlay.

use chrono::NaiveDate;

use crate::api::{IdOrRef, ParentCandidate, PersonPayload, PersonRecord, PersonRef};
use crate::dates::{is_adult_on, parse_birth_date};
use crate::error::FormError;

pub const MAX_PHOTO_BYTES: f64 = 5.0 * 1024.0 * 1024.0;
pub const CONTACT_DIGITS: usize = 10;
pub const DEFAULT_COUNTRY_CODE: &str = "+91";
const UNNAMED_SPOUSE: &str = "Current Spouse";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountryCode {
	pub name: &'static str,
	pub dial_code: &'static str,
}

pub const COUNTRY_CODES: [CountryCode; 5] = [
	CountryCode {
		name: "India",
		dial_code: "+91",
	},
	CountryCode {
		name: "United States",
		dial_code: "+1",
	},
	CountryCode {
		name: "United Kingdom",
		dial_code: "+44",
	},
	CountryCode {
		name: "Canada",
		dial_code: "+1",
	},
	CountryCode {
		name: "Australia",
		dial_code: "+61",
	},
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
	Create,
	Edit,
}

/// Text fields addressable by the generic inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
	Name,
	Gender,
	DateOfBirth,
	PlaceOfBirth,
	CurrentAddress,
	ContactNumber,
	CountryCode,
	Email,
	Occupation,
	SpouseId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PersonForm {
	pub name: String,
	pub gender: String,
	/// `YYYY-MM-DD`, as produced by a date input.
	pub date_of_birth: String,
	pub place_of_birth: String,
	pub current_address: String,
	pub contact_number: String,
	pub country_code: String,
	pub email: String,
	pub occupation: String,
	pub photo: String,
	pub spouse_id: String,
	pub parent_ids: Vec<String>,
}

impl Default for PersonForm {
	fn default() -> Self {
		Self {
			name: String::new(),
			gender: String::new(),
			date_of_birth: String::new(),
			place_of_birth: String::new(),
			current_address: String::new(),
			contact_number: String::new(),
			country_code: DEFAULT_COUNTRY_CODE.to_string(),
			email: String::new(),
			occupation: String::new(),
			photo: String::new(),
			spouse_id: String::new(),
			parent_ids: Vec::new(),
		}
	}
}

impl PersonForm {
	/// Prefills from a stored record. Missing strings become empty.
	pub fn from_record(record: &PersonRecord) -> Self {
		let d = &record.details;
		let text = |v: &Option<String>| v.clone().unwrap_or_default();
		Self {
			name: d.name.clone(),
			gender: d.gender.clone(),
			date_of_birth: d
				.date_of_birth
				.as_deref()
				.and_then(parse_birth_date)
				.map(|date| date.format("%Y-%m-%d").to_string())
				.unwrap_or_default(),
			place_of_birth: text(&d.place_of_birth),
			current_address: text(&d.current_address),
			contact_number: text(&d.contact_number),
			country_code: d
				.country_code
				.clone()
				.filter(|c| !c.is_empty())
				.unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
			email: text(&d.email),
			occupation: text(&d.occupation),
			photo: text(&d.photo),
			spouse_id: record
				.spouse_id
				.as_ref()
				.map(|s| s.id().to_string())
				.unwrap_or_default(),
			parent_ids: record.parent_ids.iter().map(|p| p.id().to_string()).collect(),
		}
	}

	pub fn get(&self, field: Field) -> &str {
		match field {
			Field::Name => &self.name,
			Field::Gender => &self.gender,
			Field::DateOfBirth => &self.date_of_birth,
			Field::PlaceOfBirth => &self.place_of_birth,
			Field::CurrentAddress => &self.current_address,
			Field::ContactNumber => &self.contact_number,
			Field::CountryCode => &self.country_code,
			Field::Email => &self.email,
			Field::Occupation => &self.occupation,
			Field::SpouseId => &self.spouse_id,
		}
	}

	pub fn set(&mut self, field: Field, value: String) {
		let slot = match field {
			Field::Name => &mut self.name,
			Field::Gender => &mut self.gender,
			Field::DateOfBirth => &mut self.date_of_birth,
			Field::PlaceOfBirth => &mut self.place_of_birth,
			Field::CurrentAddress => &mut self.current_address,
			Field::ContactNumber => &mut self.contact_number,
			Field::CountryCode => &mut self.country_code,
			Field::Email => &mut self.email,
			Field::Occupation => &mut self.occupation,
			Field::SpouseId => &mut self.spouse_id,
		};
		*slot = value;
	}

	pub fn birth_date(&self) -> Option<NaiveDate> {
		parse_birth_date(&self.date_of_birth)
	}

	/// Spouses can only be picked for adults. No birth date means no.
	pub fn can_have_spouse(&self, today: NaiveDate) -> bool {
		self.birth_date().is_some_and(|b| is_adult_on(b, today))
	}

	/// The 18+ spouse gate applies to new members only; editing keeps whatever is stored.
	pub fn offers_spouse(&self, mode: FormMode, today: NaiveDate) -> bool {
		mode == FormMode::Edit || self.can_have_spouse(today)
	}

	/// Parent choice expands to the candidate and their spouse; `None` clears it.
	pub fn select_parent(&mut self, candidate: Option<&ParentCandidate>) {
		self.parent_ids = candidate.map(ParentCandidate::parent_ids).unwrap_or_default();
	}

	pub fn validate(&self, mode: FormMode) -> Result<(), FormError> {
		let blank = |s: &str| s.trim().is_empty();
		if blank(&self.name)
			|| blank(&self.gender)
			|| blank(&self.date_of_birth)
			|| (mode == FormMode::Create && blank(&self.place_of_birth))
		{
			return Err(FormError::MissingRequired);
		}
		if !self.contact_number.is_empty() && self.contact_number.chars().count() != CONTACT_DIGITS {
			return Err(FormError::ContactLength);
		}
		Ok(())
	}

	/// Request body with free-text fields title-cased.
	pub fn to_payload(&self) -> PersonPayload {
		PersonPayload {
			name: title_case(&self.name),
			gender: self.gender.clone(),
			date_of_birth: self.date_of_birth.clone(),
			place_of_birth: title_case(&self.place_of_birth),
			current_address: title_case(&self.current_address),
			contact_number: self.contact_number.clone(),
			country_code: self.country_code.clone(),
			email: self.email.clone(),
			occupation: title_case(&self.occupation),
			photo: self.photo.clone(),
			spouse_id: self.spouse_id.clone(),
			parent_ids: self.parent_ids.clone(),
		}
	}
}

/// Upper-cases the first letter of every space-separated word and lower-cases the rest.
pub fn title_case(text: &str) -> String {
	text.split(' ')
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}

pub fn check_photo_size(bytes: f64) -> Result<(), FormError> {
	if bytes > MAX_PHOTO_BYTES {
		Err(FormError::PhotoTooLarge)
	} else {
		Ok(())
	}
}

/// Eligible spouses plus the current one, which the backend leaves out.
pub fn spouse_options(mut eligible: Vec<PersonRef>, current: Option<&IdOrRef>) -> Vec<PersonRef> {
	if let Some(current) = current {
		if !eligible.iter().any(|s| s.id == current.id()) {
			let person = match current {
				IdOrRef::Ref(person) => person.clone(),
				IdOrRef::Id(id) => PersonRef {
					id: id.clone(),
					name: UNNAMED_SPOUSE.to_string(),
				},
			};
			eligible.insert(0, person);
		}
	}
	eligible
}

/// "Ravi & Meena" for couples, "Ravi (Male)" otherwise.
pub fn parent_label(candidate: &ParentCandidate) -> String {
	match &candidate.spouse {
		Some(IdOrRef::Ref(spouse)) => format!("{} & {}", candidate.name, spouse.name),
		_ => format!("{} ({})", candidate.name, candidate.gender),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::PersonDetails;

	fn filled() -> PersonForm {
		PersonForm {
			name: "asha rao".into(),
			gender: "Female".into(),
			date_of_birth: "1990-04-02".into(),
			place_of_birth: "pune".into(),
			..Default::default()
		}
	}

	fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	#[test]
	fn new_form_defaults_to_india() {
		assert_eq!(PersonForm::default().country_code, "+91");
		assert_eq!(COUNTRY_CODES[0].dial_code, DEFAULT_COUNTRY_CODE);
	}

	#[test]
	fn required_fields_depend_on_mode() {
		assert_eq!(filled().validate(FormMode::Create), Ok(()));

		let mut no_place = filled();
		no_place.place_of_birth.clear();
		assert_eq!(
			no_place.validate(FormMode::Create),
			Err(FormError::MissingRequired)
		);
		assert_eq!(no_place.validate(FormMode::Edit), Ok(()));

		let mut no_name = filled();
		no_name.name = "   ".into();
		assert_eq!(no_name.validate(FormMode::Edit), Err(FormError::MissingRequired));
	}

	#[test]
	fn contact_number_must_be_ten_when_given() {
		let mut form = filled();
		form.contact_number = "98765".into();
		assert_eq!(form.validate(FormMode::Create), Err(FormError::ContactLength));
		form.contact_number = "9876543210".into();
		assert_eq!(form.validate(FormMode::Create), Ok(()));
		form.contact_number.clear();
		assert_eq!(form.validate(FormMode::Create), Ok(()));
	}

	#[test]
	fn title_case_each_word() {
		assert_eq!(title_case("mAIN street  north"), "Main Street  North");
		assert_eq!(title_case("software engineer"), "Software Engineer");
		assert_eq!(title_case(""), "");
	}

	#[test]
	fn payload_title_cases_free_text_only() {
		let mut form = filled();
		form.email = "Asha@Example.com".into();
		form.occupation = "graphic designer".into();
		let payload = form.to_payload();
		assert_eq!(payload.name, "Asha Rao");
		assert_eq!(payload.place_of_birth, "Pune");
		assert_eq!(payload.occupation, "Graphic Designer");
		assert_eq!(payload.email, "Asha@Example.com");
		assert_eq!(payload.country_code, "+91");
	}

	#[test]
	fn parent_pick_brings_the_spouse_along() {
		let candidate = ParentCandidate {
			id: "p1".into(),
			name: "Ravi".into(),
			gender: "Male".into(),
			spouse: Some(IdOrRef::Ref(PersonRef {
				id: "p2".into(),
				name: "Meena".into(),
			})),
		};
		let mut form = filled();
		form.select_parent(Some(&candidate));
		assert_eq!(form.parent_ids, vec!["p1", "p2"]);
		assert_eq!(parent_label(&candidate), "Ravi & Meena");

		form.select_parent(None);
		assert!(form.parent_ids.is_empty());
	}

	#[test]
	fn single_parent_label_shows_gender() {
		let candidate = ParentCandidate {
			id: "p1".into(),
			name: "Ravi".into(),
			gender: "Male".into(),
			spouse: None,
		};
		assert_eq!(parent_label(&candidate), "Ravi (Male)");
	}

	#[test]
	fn spouse_needs_an_adult_birth_date() {
		let today = ymd(2026, 10, 19);
		let mut form = filled();
		form.date_of_birth = "2008-10-19".into();
		assert!(form.can_have_spouse(today));
		form.date_of_birth = "2008-10-20".into();
		assert!(!form.can_have_spouse(today));
		form.date_of_birth.clear();
		assert!(!form.can_have_spouse(today));
	}

	#[test]
	fn current_spouse_is_kept_in_options() {
		let eligible = vec![PersonRef {
			id: "s2".into(),
			name: "Kiran".into(),
		}];
		let bare = IdOrRef::Id("s1".into());
		let options = spouse_options(eligible.clone(), Some(&bare));
		assert_eq!(options[0].id, "s1");
		assert_eq!(options[0].name, "Current Spouse");
		assert_eq!(options.len(), 2);

		let listed = IdOrRef::Id("s2".into());
		assert_eq!(spouse_options(eligible, Some(&listed)).len(), 1);
	}

	#[test]
	fn record_prefill_normalizes_ids_and_dates() {
		let record = PersonRecord {
			details: PersonDetails {
				id: "x".into(),
				name: "Asha".into(),
				gender: "Female".into(),
				date_of_birth: Some("1990-04-02T00:00:00.000Z".into()),
				..Default::default()
			},
			spouse_id: Some(IdOrRef::Ref(PersonRef {
				id: "s".into(),
				name: "Kiran".into(),
			})),
			parent_ids: vec![IdOrRef::Id("a".into()), IdOrRef::Id("b".into())],
		};
		let form = PersonForm::from_record(&record);
		assert_eq!(form.date_of_birth, "1990-04-02");
		assert_eq!(form.spouse_id, "s");
		assert_eq!(form.parent_ids, vec!["a", "b"]);
		assert_eq!(form.country_code, "+91");
	}

	#[test]
	fn editing_a_minor_keeps_the_stored_spouse() {
		let record = PersonRecord {
			details: PersonDetails {
				id: "m".into(),
				name: "Meena".into(),
				gender: "Female".into(),
				date_of_birth: Some("2012-06-01".into()),
				..Default::default()
			},
			spouse_id: Some(IdOrRef::Id("s".into())),
			parent_ids: Vec::new(),
		};
		let today = ymd(2026, 10, 19);
		let form = PersonForm::from_record(&record);
		assert!(form.offers_spouse(FormMode::Edit, today));
		assert!(!form.offers_spouse(FormMode::Create, today));
		assert_eq!(form.to_payload().spouse_id, "s");
	}

	#[test]
	fn photo_limit_is_five_megabytes() {
		assert_eq!(check_photo_size(5.0 * 1024.0 * 1024.0), Ok(()));
		assert_eq!(
			check_photo_size(5.0 * 1024.0 * 1024.0 + 1.0),
			Err(FormError::PhotoTooLarge)
		);
	}

	#[test]
	fn fields_read_back_what_was_set() {
		let mut form = PersonForm::default();
		form.set(Field::Occupation, "Teacher".into());
		form.set(Field::SpouseId, "s9".into());
		assert_eq!(form.get(Field::Occupation), "Teacher");
		assert_eq!(form.spouse_id, "s9");
	}
}
