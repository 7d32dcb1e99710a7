// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field names, numeric domains and calendar tables.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CronError, Result};

/// One component of a cron schedule.
///
/// Declaration order runs from the finest unit to the coarsest, with
/// day-of-week placed after month the way the Quartz layout lists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
	Second,
	Minute,
	Hour,
	DayOfMonth,
	Month,
	DayOfWeek,
	Year,
}

impl FieldName {
	pub const ALL: [FieldName; 7] = [
		FieldName::Second,
		FieldName::Minute,
		FieldName::Hour,
		FieldName::DayOfMonth,
		FieldName::Month,
		FieldName::DayOfWeek,
		FieldName::Year,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			FieldName::Second => "second",
			FieldName::Minute => "minute",
			FieldName::Hour => "hour",
			FieldName::DayOfMonth => "day_of_month",
			FieldName::Month => "month",
			FieldName::DayOfWeek => "day_of_week",
			FieldName::Year => "year",
		}
	}
}

impl fmt::Display for FieldName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Inclusive numeric bounds for a field, plus its wrap policy.
///
/// A wrapping domain accepts `Between` ranges whose end precedes their start,
/// e.g. hours `22-2` meaning 22, 23, 0, 1, 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDomain {
	pub field: FieldName,
	pub min: u32,
	pub max: u32,
	#[serde(default)]
	pub wraps: bool,
}

impl FieldDomain {
	pub const fn new(field: FieldName, min: u32, max: u32) -> Self {
		Self {
			field,
			min,
			max,
			wraps: false,
		}
	}

	pub const fn with_wrapping(self, wraps: bool) -> Self {
		Self { wraps, ..self }
	}

	/// Standard bounds for a field, before any dialect adjustments.
	pub const fn standard(field: FieldName) -> Self {
		match field {
			FieldName::Second => Self::new(field, 0, 59),
			FieldName::Minute => Self::new(field, 0, 59),
			FieldName::Hour => Self::new(field, 0, 23),
			FieldName::DayOfMonth => Self::new(field, 1, 31),
			FieldName::Month => Self::new(field, 1, 12),
			FieldName::DayOfWeek => Self::new(field, 0, 6),
			FieldName::Year => Self::new(field, 1970, 2099),
		}
	}

	pub fn contains(&self, value: u32) -> bool {
		value >= self.min && value <= self.max
	}

	/// Reject a literal outside the domain.
	pub fn validate(&self, value: u32) -> Result<u32> {
		if self.contains(value) {
			Ok(value)
		} else {
			Err(CronError::InvalidLiteral {
				field: self.field,
				value,
				min: self.min,
				max: self.max,
			})
		}
	}

	/// The same domain with a lower upper bound, used for day-of-month in
	/// months shorter than 31 days.
	pub fn narrowed(&self, max: u32) -> Self {
		Self {
			max: self.max.min(max),
			..*self
		}
	}
}

const WEEK: [Weekday; 7] = [
	Weekday::Mon,
	Weekday::Tue,
	Weekday::Wed,
	Weekday::Thu,
	Weekday::Fri,
	Weekday::Sat,
	Weekday::Sun,
];

/// How day-of-week digits map onto calendar weekdays.
///
/// Digit `v` denotes `first + (v - first_value) mod 7`. UNIX cron uses
/// Sunday = 0 (and 7), Quartz uses Sunday = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayMapping {
	pub first: Weekday,
	pub first_value: u32,
}

impl WeekdayMapping {
	pub const fn new(first: Weekday, first_value: u32) -> Self {
		Self { first, first_value }
	}

	pub const fn sunday_zero() -> Self {
		Self::new(Weekday::Sun, 0)
	}

	pub const fn sunday_one() -> Self {
		Self::new(Weekday::Sun, 1)
	}

	/// Calendar weekday named by a field value.
	pub fn weekday(&self, value: u32) -> Weekday {
		let offset = (i64::from(value) - i64::from(self.first_value)).rem_euclid(7) as u32;
		WEEK[((self.first.num_days_from_monday() + offset) % 7) as usize]
	}

	/// All values of `domain` that denote `weekday`.
	pub fn values_for(&self, weekday: Weekday, domain: &FieldDomain) -> impl Iterator<Item = u32> {
		let mapping = *self;
		(domain.min..=domain.max).filter(move |v| mapping.weekday(*v) == weekday)
	}
}

impl Default for WeekdayMapping {
	fn default() -> Self {
		Self::sunday_zero()
	}
}

/// Latest year `chrono` can represent as a date.
pub const MAX_YEAR: u32 = 262_142;

pub fn is_leap_year(year: i32) -> bool {
	(year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in the given month of the proleptic Gregorian calendar.
pub fn days_in_month(year: i32, month: u32) -> u32 {
	match month {
		1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
		4 | 6 | 9 | 11 => 30,
		2 if is_leap_year(year) => 29,
		2 => 28,
		_ => 0,
	}
}
