use chrono::NaiveDate;
use leptos::prelude::*;
use log::warn;

use crate::api::{ApiClient, PersonDetails};
use crate::dates::{self, parse_birth_date, turning_age, upcoming_birthdays};
use crate::error::ApiError;

/// One card on the home page.
#[derive(Clone, Debug, PartialEq)]
pub struct BirthdayCard {
	pub name: String,
	/// e.g. "March 4"
	pub date: String,
	pub turns: i32,
}

fn birth_of(person: &PersonDetails) -> Option<NaiveDate> {
	person.date_of_birth.as_deref().and_then(parse_birth_date)
}

pub fn birthday_cards(people: &[PersonDetails], today: NaiveDate) -> Vec<BirthdayCard> {
	upcoming_birthdays(people.iter().map(|p| (p, birth_of(p))), today)
		.into_iter()
		.filter_map(|(person, next)| {
			Some(BirthdayCard {
				name: person.name.clone(),
				date: next.format("%B %-d").to_string(),
				turns: turning_age(birth_of(person)?, next),
			})
		})
		.collect()
}

/// What the home page shows for the members fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum HomeSummary {
	Loading,
	Failed,
	Ready {
		members: usize,
		birthdays: Vec<BirthdayCard>,
	},
}

impl HomeSummary {
	pub fn from_fetch(fetched: Option<Result<Vec<PersonDetails>, ApiError>>, today: NaiveDate) -> Self {
		match fetched {
			None => Self::Loading,
			Some(Err(e)) => {
				warn!("could not load members: {e}");
				Self::Failed
			}
			Some(Ok(people)) => Self::Ready {
				members: people.len(),
				birthdays: birthday_cards(&people, today),
			},
		}
	}
}

/// Member count and the next birthday(s).
#[component]
pub fn HomePage() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let persons = LocalResource::new(move || {
		let client = client.clone();
		async move { client.all_persons().await }
	});

	view! {
		<div class="home">
			<h1>"Welcome to Family Tree Dashboard"</h1>
			{move || match HomeSummary::from_fetch(persons.get(), dates::today()) {
				HomeSummary::Loading => view! {
					<div class="cards">
						<div class="card">
							<div class="card-title">"Total Family Members"</div>
							<div class="card-value">"..."</div>
						</div>
						<div class="card">
							<div class="card-title">"Upcoming Birthday"</div>
							<div class="card-value muted">"..."</div>
						</div>
					</div>
				}
					.into_any(),
				HomeSummary::Failed => {
					view! { <p class="page-error">"Error loading family members."</p> }.into_any()
				}
				HomeSummary::Ready { members, birthdays } => {
					let birthdays = if birthdays.is_empty() {
						view! {
							<div class="card">
								<div class="card-title">"Upcoming Birthday"</div>
								<div class="muted">"No upcoming birthdays"</div>
							</div>
						}
							.into_any()
					} else {
						birthdays
							.into_iter()
							.map(|card| {
								view! {
									<div class="card">
										<div class="card-title">"Upcoming Birthday 🥳"</div>
										<div class="card-value">{card.name}</div>
										<div class="muted">{card.date}</div>
										<div class="muted small">{format!("Turns {}", card.turns)}</div>
									</div>
								}
							})
							.collect_view()
							.into_any()
					};
					view! {
						<div class="cards">
							<div class="card">
								<div class="card-title">"Total Family Members"</div>
								<div class="card-value">{members}</div>
							</div>
							{birthdays}
						</div>
					}
						.into_any()
				}
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn person(name: &str, dob: Option<&str>) -> PersonDetails {
		PersonDetails {
			id: name.to_lowercase(),
			name: name.into(),
			date_of_birth: dob.map(String::from),
			..Default::default()
		}
	}

	#[test]
	fn nearest_birthdays_with_ties() {
		let people = vec![
			person("Asha", Some("1990-11-02T00:00:00.000Z")),
			person("Ravi", Some("1985-10-25")),
			person("Meena", Some("2001-10-25")),
			person("Kiran", None),
		];
		let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
		let cards = birthday_cards(&people, today);
		assert_eq!(
			cards,
			vec![
				BirthdayCard {
					name: "Ravi".into(),
					date: "October 25".into(),
					turns: 41,
				},
				BirthdayCard {
					name: "Meena".into(),
					date: "October 25".into(),
					turns: 25,
				},
			]
		);
	}

	#[test]
	fn birthday_today_counts_as_upcoming() {
		let people = vec![person("Asha", Some("2000-10-19"))];
		let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
		let cards = birthday_cards(&people, today);
		assert_eq!(cards[0].turns, 26);
		assert_eq!(cards[0].date, "October 19");
	}

	#[test]
	fn nobody_with_a_date_means_no_cards() {
		let people = vec![person("Kiran", None)];
		let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
		assert!(birthday_cards(&people, today).is_empty());
	}

	#[test]
	fn failed_fetch_is_an_error_not_an_empty_family() {
		let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
		let failed = HomeSummary::from_fetch(Some(Err(ApiError::Network("offline".into()))), today);
		assert_eq!(failed, HomeSummary::Failed);
		assert_eq!(HomeSummary::from_fetch(None, today), HomeSummary::Loading);
	}

	#[test]
	fn loaded_members_are_counted() {
		let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
		let people = vec![person("Ravi", Some("1985-10-25")), person("Kiran", None)];
		let summary = HomeSummary::from_fetch(Some(Ok(people)), today);
		let HomeSummary::Ready { members, birthdays } = summary else {
			panic!("expected a loaded summary");
		};
		assert_eq!(members, 2);
		assert_eq!(birthdays.len(), 1);
	}
}
