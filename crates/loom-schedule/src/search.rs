// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Carry-propagating search over wall-clock calendar values.
//!
//! Fields are matched coarse to fine against a [`Cursor`]. When a field has
//! no value left in its range the cursor carries (or borrows) into the next
//! coarser unit, which resets every finer unit, and the walk restarts.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use loom_schedule_core::{
	days_in_month, Cron, CronField, FieldDomain, FieldExpression, FieldName, WeekdayMapping,
};
use tracing::trace;

use crate::cursor::{Cursor, Unit};

/// Every calendar field of a cron, with absent fields filled in.
///
/// Absent time fields are pinned to their minimum (a UNIX cron fires at
/// second 0); absent date fields match everything; an absent year is not
/// checked at all.
#[derive(Debug, Clone)]
pub(crate) struct CalendarFields {
	second: CronField,
	minute: CronField,
	hour: CronField,
	day_of_month: CronField,
	month: CronField,
	day_of_week: CronField,
	year: Option<CronField>,
	weekday: WeekdayMapping,
	unit: Unit,
}

fn resolve(cron: &Cron, name: FieldName, absent: FieldExpression) -> CronField {
	cron.field(name).cloned().unwrap_or_else(|| CronField {
		expression: absent,
		domain: FieldDomain::standard(name),
	})
}

impl CalendarFields {
	pub fn new(cron: &Cron) -> Self {
		let pinned = |name: FieldName| {
			let domain = FieldDomain::standard(name);
			resolve(cron, name, FieldExpression::On(domain.min))
		};
		let unit = if cron.has_field(FieldName::Second) {
			Unit::Second
		} else if cron.has_field(FieldName::Minute) {
			Unit::Minute
		} else if cron.has_field(FieldName::Hour) {
			Unit::Hour
		} else {
			Unit::Day
		};

		Self {
			second: pinned(FieldName::Second),
			minute: pinned(FieldName::Minute),
			hour: pinned(FieldName::Hour),
			day_of_month: resolve(cron, FieldName::DayOfMonth, FieldExpression::Always),
			month: resolve(cron, FieldName::Month, FieldExpression::Always),
			day_of_week: resolve(cron, FieldName::DayOfWeek, FieldExpression::Always),
			year: cron.field(FieldName::Year).cloned(),
			weekday: cron.weekday_mapping(),
			unit,
		}
	}

	pub fn unit(&self) -> Unit {
		self.unit
	}

	fn weekday_matches(&self, weekday: Weekday) -> bool {
		let field = &self.day_of_week;
		self.weekday
			.values_for(weekday, &field.domain)
			.any(|v| field.matches(v))
	}

	fn year_matches(&self, year: i32) -> bool {
		match &self.year {
			Some(field) => u32::try_from(year).is_ok_and(|y| field.matches(y)),
			None => true,
		}
	}

	/// Day-of-month and day-of-week combine with OR when both are
	/// restricted; otherwise whichever is restricted decides.
	fn day_rule(&self) -> (bool, bool) {
		let dom = !self.day_of_month.expression.is_unrestricted();
		let dow = !self.day_of_week.expression.is_unrestricted();
		match (dom, dow) {
			(false, false) => (true, false),
			other => other,
		}
	}

	pub fn day_matches(&self, date: NaiveDate) -> bool {
		let domain = self
			.day_of_month
			.domain
			.narrowed(days_in_month(date.year(), date.month()));
		let by_dom = self.day_of_month.expression.matches(date.day(), &domain);
		let by_dow = self.weekday_matches(date.weekday());
		match self.day_rule() {
			(true, true) => by_dom || by_dow,
			(true, false) => by_dom,
			(false, _) => by_dow,
		}
	}

	pub fn matches(&self, at: NaiveDateTime) -> bool {
		self.year_matches(at.year())
			&& self.month.matches(at.month())
			&& self.day_matches(at.date())
			&& self.hour.matches(at.hour())
			&& self.minute.matches(at.minute())
			&& self.second.matches(at.second())
	}

	fn next_weekday_day(&self, year: i32, month: u32, from: u32, last: u32) -> Option<u32> {
		let mut weekday = NaiveDate::from_ymd_opt(year, month, from)?.weekday();
		for day in from..=last.min(from + 6) {
			if self.weekday_matches(weekday) {
				return Some(day);
			}
			weekday = weekday.succ();
		}
		None
	}

	fn previous_weekday_day(&self, year: i32, month: u32, from: u32) -> Option<u32> {
		let mut weekday = NaiveDate::from_ymd_opt(year, month, from)?.weekday();
		for day in (from.saturating_sub(6).max(1)..=from).rev() {
			if self.weekday_matches(weekday) {
				return Some(day);
			}
			weekday = weekday.pred();
		}
		None
	}

	/// First day `>= from` in (year, month) that the day rule accepts.
	fn next_day(&self, year: i32, month: u32, from: u32) -> Option<u32> {
		let last = days_in_month(year, month);
		if from > last {
			return None;
		}
		let domain = self.day_of_month.domain.narrowed(last);
		let by_dom = || self.day_of_month.expression.next_match(from, &domain);
		let by_dow = || self.next_weekday_day(year, month, from, last);
		match self.day_rule() {
			(true, true) => by_dom().into_iter().chain(by_dow()).min(),
			(true, false) => by_dom(),
			(false, _) => by_dow(),
		}
	}

	/// Last day `<= from` in (year, month) that the day rule accepts.
	fn previous_day(&self, year: i32, month: u32, from: u32) -> Option<u32> {
		let last = days_in_month(year, month);
		let from = from.min(last);
		if from == 0 {
			return None;
		}
		let domain = self.day_of_month.domain.narrowed(last);
		let by_dom = || self.day_of_month.expression.previous_match(from, &domain);
		let by_dow = || self.previous_weekday_day(year, month, from);
		match self.day_rule() {
			(true, true) => by_dom().into_iter().chain(by_dow()).max(),
			(true, false) => by_dom(),
			(false, _) => by_dow(),
		}
	}

	/// Earliest wall time `>= start` matching every field, searching no
	/// later than `last_year`.
	pub fn next_from(&self, start: NaiveDateTime, last_year: i32) -> Option<NaiveDateTime> {
		let mut c = Cursor::new(start);
		loop {
			if c.year > last_year {
				trace!(year = c.year, last_year, "forward search left its window");
				return None;
			}

			if let Some(year) = &self.year {
				let from = u32::try_from(c.year).unwrap_or(0);
				match year.expression.next_match(from, &year.domain) {
					None => return None,
					Some(y) if y != from => {
						c.set_year_forward(i32::try_from(y).ok()?);
						continue;
					}
					Some(_) => {}
				}
			}

			match self.month.expression.next_match(c.month, &self.month.domain) {
				None => {
					trace!(year = c.year, "carry into year");
					c.carry_year();
					continue;
				}
				Some(m) if m != c.month => c.set_month_forward(m),
				Some(_) => {}
			}

			match self.next_day(c.year, c.month, c.day) {
				None => {
					trace!(year = c.year, month = c.month, "carry into month");
					c.carry_month();
					continue;
				}
				Some(d) if d != c.day => c.set_day_forward(d),
				Some(_) => {}
			}

			match self.hour.expression.next_match(c.hour, &self.hour.domain) {
				None => {
					c.carry_day();
					continue;
				}
				Some(h) if h != c.hour => c.set_hour_forward(h),
				Some(_) => {}
			}

			match self.minute.expression.next_match(c.minute, &self.minute.domain) {
				None => {
					c.carry_hour();
					continue;
				}
				Some(m) if m != c.minute => c.set_minute_forward(m),
				Some(_) => {}
			}

			match self.second.expression.next_match(c.second, &self.second.domain) {
				None => {
					c.carry_minute();
					continue;
				}
				Some(s) => c.second = s,
			}

			return c.to_naive();
		}
	}

	/// Latest wall time `<= start` matching every field, searching no
	/// earlier than `first_year`.
	pub fn previous_from(&self, start: NaiveDateTime, first_year: i32) -> Option<NaiveDateTime> {
		let mut c = Cursor::new(start);
		loop {
			if c.year < first_year {
				trace!(year = c.year, first_year, "backward search left its window");
				return None;
			}

			if let Some(year) = &self.year {
				let Ok(from) = u32::try_from(c.year) else {
					return None;
				};
				match year.expression.previous_match(from, &year.domain) {
					None => return None,
					Some(y) if y != from => {
						c.set_year_backward(i32::try_from(y).ok()?);
						continue;
					}
					Some(_) => {}
				}
			}

			match self.month.expression.previous_match(c.month, &self.month.domain) {
				None => {
					trace!(year = c.year, "borrow from year");
					c.borrow_year();
					continue;
				}
				Some(m) if m != c.month => c.set_month_backward(m),
				Some(_) => {}
			}

			match self.previous_day(c.year, c.month, c.day) {
				None => {
					trace!(year = c.year, month = c.month, "borrow from month");
					c.borrow_month();
					continue;
				}
				Some(d) if d != c.day => c.set_day_backward(d),
				Some(_) => {}
			}

			match self.hour.expression.previous_match(c.hour, &self.hour.domain) {
				None => {
					c.borrow_day();
					continue;
				}
				Some(h) if h != c.hour => c.set_hour_backward(h),
				Some(_) => {}
			}

			match self.minute.expression.previous_match(c.minute, &self.minute.domain) {
				None => {
					c.borrow_hour();
					continue;
				}
				Some(m) if m != c.minute => c.set_minute_backward(m),
				Some(_) => {}
			}

			match self.second.expression.previous_match(c.second, &self.second.domain) {
				None => {
					c.borrow_minute();
					continue;
				}
				Some(s) => c.second = s,
			}

			return c.to_naive();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use loom_schedule_core::{CronDefinition, FieldDefinition, MAX_YEAR};

	fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(y, mo, d)
			.unwrap()
			.and_hms_opt(h, mi, 0)
			.unwrap()
	}

	fn unix(
		minute: FieldExpression,
		hour: FieldExpression,
		dom: FieldExpression,
		month: FieldExpression,
		dow: FieldExpression,
	) -> CalendarFields {
		let cron = Cron::builder(CronDefinition::unix())
			.field(FieldName::Minute, minute)
			.field(FieldName::Hour, hour)
			.field(FieldName::DayOfMonth, dom)
			.field(FieldName::Month, month)
			.field(FieldName::DayOfWeek, dow)
			.build()
			.unwrap();
		CalendarFields::new(&cron)
	}

	#[test]
	fn test_unix_cron_resolves_to_minutes() {
		let fields = unix(
			FieldExpression::Always,
			FieldExpression::Always,
			FieldExpression::Always,
			FieldExpression::Always,
			FieldExpression::Always,
		);
		assert_eq!(fields.unit(), Unit::Minute);
		assert!(fields.matches(at(2015, 9, 5, 13, 43)));
		let with_seconds = at(2015, 9, 5, 13, 43).with_second(5).unwrap();
		assert!(!fields.matches(with_seconds));
	}

	#[test]
	fn test_day_rule_or_semantics() {
		// 13th of the month or any Friday.
		let fields = unix(
			FieldExpression::On(0),
			FieldExpression::On(0),
			FieldExpression::On(13),
			FieldExpression::Always,
			FieldExpression::On(5),
		);
		// Tuesday 13 October 2015.
		assert!(fields.day_matches(NaiveDate::from_ymd_opt(2015, 10, 13).unwrap()));
		// Friday 16 October 2015.
		assert!(fields.day_matches(NaiveDate::from_ymd_opt(2015, 10, 16).unwrap()));
		assert!(!fields.day_matches(NaiveDate::from_ymd_opt(2015, 10, 14).unwrap()));
		assert_eq!(fields.next_day(2015, 10, 14), Some(16));
		assert_eq!(fields.previous_day(2015, 10, 15), Some(13));
	}

	#[test]
	fn test_only_restricted_day_field_decides() {
		let dom_only = unix(
			FieldExpression::On(0),
			FieldExpression::On(0),
			FieldExpression::On(31),
			FieldExpression::Always,
			FieldExpression::Always,
		);
		assert_eq!(dom_only.next_day(2015, 9, 1), None);
		assert_eq!(dom_only.next_day(2015, 10, 1), Some(31));

		let dow_only = unix(
			FieldExpression::On(0),
			FieldExpression::On(0),
			FieldExpression::Always,
			FieldExpression::Always,
			FieldExpression::On(1),
		);
		// First Monday of November 2015 is the 2nd.
		assert_eq!(dow_only.next_day(2015, 11, 1), Some(2));
		assert_eq!(dow_only.previous_day(2015, 11, 1), None);
		assert_eq!(dow_only.previous_day(2015, 10, 31), Some(26));
	}

	#[test]
	fn test_next_from_carries_through_year_end() {
		let fields = unix(
			FieldExpression::On(0),
			FieldExpression::On(0),
			FieldExpression::On(1),
			FieldExpression::On(1),
			FieldExpression::Always,
		);
		assert_eq!(
			fields.next_from(at(2015, 12, 31, 23, 59), 2100),
			Some(at(2016, 1, 1, 0, 0))
		);
		assert_eq!(
			fields.previous_from(at(2015, 12, 31, 23, 59), 1900),
			Some(at(2015, 1, 1, 0, 0))
		);
	}

	#[test]
	fn test_impossible_date_exhausts_window() {
		let fields = unix(
			FieldExpression::Always,
			FieldExpression::Always,
			FieldExpression::On(30),
			FieldExpression::On(2),
			FieldExpression::Always,
		);
		assert_eq!(fields.next_from(at(2015, 1, 1, 0, 0), 2115), None);
		assert_eq!(fields.previous_from(at(2015, 1, 1, 0, 0), 1915), None);
	}

	#[test]
	fn test_leap_day_found_years_ahead() {
		let fields = unix(
			FieldExpression::On(0),
			FieldExpression::On(0),
			FieldExpression::On(29),
			FieldExpression::On(2),
			FieldExpression::Always,
		);
		assert_eq!(
			fields.next_from(at(2097, 1, 1, 0, 0), 2200),
			Some(at(2104, 2, 29, 0, 0))
		);
		assert_eq!(
			fields.previous_from(at(2015, 1, 1, 0, 0), 1900),
			Some(at(2012, 2, 29, 0, 0))
		);
	}

	#[test]
	fn test_far_year_outside_window_gives_up() {
		let definition = CronDefinition::new(
			vec![
				FieldDefinition::required(FieldDomain::standard(FieldName::Minute)),
				FieldDefinition::required(FieldDomain::new(FieldName::Year, 1970, MAX_YEAR)),
			],
			WeekdayMapping::default(),
		)
		.unwrap();
		let cron = Cron::builder(definition)
			.field(FieldName::Minute, FieldExpression::On(0))
			.field(FieldName::Year, FieldExpression::On(200_000))
			.build()
			.unwrap();
		let fields = CalendarFields::new(&cron);

		assert_eq!(fields.next_from(at(2015, 1, 1, 0, 0), 2115), None);
		assert_eq!(fields.previous_from(at(250_000, 1, 1, 0, 0), 249_900), None);
		assert_eq!(
			fields.next_from(at(199_950, 1, 1, 0, 0), 200_050),
			Some(at(200_000, 1, 1, 0, 0))
		);
	}
}
