//! Birth-date parsing, age and birthday arithmetic.

use chrono::{DateTime, Datelike, Local, NaiveDate};

/// Parses the backend's date of birth, either a full ISO timestamp or a bare `YYYY-MM-DD`.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
	let raw = raw.trim();
	if raw.is_empty() {
		return None;
	}
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Some(dt.naive_utc().date());
	}
	raw.get(..10)
		.and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// Short display form, day first.
pub fn format_birth_date(date: NaiveDate) -> String {
	date.format("%-d/%-m/%Y").to_string()
}

/// Whole years elapsed; one less while this year's birthday is still ahead.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
	let mut age = today.year() - birth.year();
	if (today.month(), today.day()) < (birth.month(), birth.day()) {
		age -= 1;
	}
	age
}

pub fn is_adult_on(birth: NaiveDate, today: NaiveDate) -> bool {
	age_on(birth, today) >= 18
}

pub fn today() -> NaiveDate {
	Local::now().date_naive()
}

/// The birthday in `year`. Feb 29 falls on Mar 1 outside leap years.
fn birthday_in(birth: NaiveDate, year: i32) -> Option<NaiveDate> {
	NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
		.or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// The next birthday on or after `today`.
pub fn next_birthday(birth: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
	let this_year = birthday_in(birth, today.year())?;
	if this_year >= today {
		Some(this_year)
	} else {
		birthday_in(birth, today.year() + 1)
	}
}

/// The age reached on `birthday`.
pub fn turning_age(birth: NaiveDate, birthday: NaiveDate) -> i32 {
	birthday.year() - birth.year()
}

/// Everyone sharing the nearest upcoming birthday, in input order.
pub fn upcoming_birthdays<'a, T>(
	people: impl IntoIterator<Item = (&'a T, Option<NaiveDate>)>,
	today: NaiveDate,
) -> Vec<(&'a T, NaiveDate)>
where
	T: 'a,
{
	let mut soonest: Option<NaiveDate> = None;
	let mut found = Vec::new();
	for (person, birth) in people {
		let Some(next) = birth.and_then(|b| next_birthday(b, today)) else {
			continue;
		};
		match soonest {
			Some(s) if next > s => {}
			Some(s) if next == s => found.push((person, next)),
			_ => {
				soonest = Some(next);
				found.clear();
				found.push((person, next));
			}
		}
	}
	found
}

#[cfg(test)]
mod tests {
	use super::*;

	fn d(y: i32, m: u32, day: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, day).unwrap()
	}

	#[test]
	fn parses_timestamps_and_plain_dates() {
		assert_eq!(
			parse_birth_date("1990-05-14T00:00:00.000Z"),
			Some(d(1990, 5, 14))
		);
		assert_eq!(parse_birth_date("1990-05-14"), Some(d(1990, 5, 14)));
		assert_eq!(parse_birth_date("1990-05-14T10:00:00"), Some(d(1990, 5, 14)));
		assert_eq!(parse_birth_date(""), None);
		assert_eq!(parse_birth_date("yesterday"), None);
	}

	#[test]
	fn formats_day_first() {
		assert_eq!(format_birth_date(d(1990, 5, 4)), "4/5/1990");
	}

	#[test]
	fn age_drops_by_one_before_the_birthday() {
		let birth = d(2000, 6, 15);
		assert_eq!(age_on(birth, d(2020, 6, 14)), 19);
		assert_eq!(age_on(birth, d(2020, 6, 15)), 20);
		assert_eq!(age_on(birth, d(2020, 7, 1)), 20);
		assert_eq!(age_on(birth, d(2020, 5, 30)), 19);
	}

	#[test]
	fn one_year_old_boundary() {
		let today = d(2026, 10, 19);
		assert_eq!(age_on(d(2025, 10, 19), today), 1);
		assert_eq!(age_on(d(2025, 10, 20), today), 0);
		assert_eq!(age_on(today, today), 0);
	}

	#[test]
	fn turns_counts_the_coming_birthday() {
		let birth = d(1990, 12, 1);
		let today = d(2026, 10, 19);
		let next = next_birthday(birth, today).unwrap();
		assert_eq!(turning_age(birth, next), 36);

		let past = d(1990, 1, 5);
		let next = next_birthday(past, today).unwrap();
		assert_eq!(next, d(2027, 1, 5));
		assert_eq!(turning_age(past, next), 37);
	}

	#[test]
	fn adulthood_starts_on_the_eighteenth_birthday() {
		let birth = d(2008, 3, 10);
		assert!(!is_adult_on(birth, d(2026, 3, 9)));
		assert!(is_adult_on(birth, d(2026, 3, 10)));
	}

	#[test]
	fn next_birthday_rolls_over() {
		let today = d(2026, 10, 19);
		assert_eq!(next_birthday(d(1980, 10, 19), today), Some(d(2026, 10, 19)));
		assert_eq!(next_birthday(d(1980, 10, 18), today), Some(d(2027, 10, 18)));
		assert_eq!(next_birthday(d(1980, 12, 1), today), Some(d(2026, 12, 1)));
	}

	#[test]
	fn leap_day_birthdays_move_to_march() {
		assert_eq!(
			next_birthday(d(2000, 2, 29), d(2026, 1, 1)),
			Some(d(2026, 3, 1))
		);
		assert_eq!(
			next_birthday(d(2000, 2, 29), d(2028, 1, 1)),
			Some(d(2028, 2, 29))
		);
	}

	#[test]
	fn upcoming_keeps_ties_and_skips_unknown() {
		let people = ["a", "b", "c", "d"];
		let births = [
			Some(d(1990, 12, 25)),
			Some(d(1985, 11, 2)),
			None,
			Some(d(2001, 11, 2)),
		];
		let found = upcoming_birthdays(people.iter().zip(births), d(2026, 10, 19));
		let names: Vec<_> = found.iter().map(|(p, _)| **p).collect();
		assert_eq!(names, ["b", "d"]);
		assert!(found.iter().all(|(_, day)| *day == d(2026, 11, 2)));
	}

	#[test]
	fn upcoming_is_empty_without_dates() {
		let people = ["a"];
		assert!(upcoming_birthdays(people.iter().zip([None]), d(2026, 1, 1)).is_empty());
	}
}
