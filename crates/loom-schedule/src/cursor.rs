// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Calendar cursor with carry and borrow between units.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use loom_schedule_core::days_in_month;

/// Broken-down wall-clock position walked by the search.
///
/// `day` may run past the end of the month after a carry, or reach zero after
/// a borrow; the day matcher treats both as "no day left" and moves the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
	pub year: i32,
	pub month: u32,
	pub day: u32,
	pub hour: u32,
	pub minute: u32,
	pub second: u32,
}

impl Cursor {
	pub fn new(at: NaiveDateTime) -> Self {
		Self {
			year: at.year(),
			month: at.month(),
			day: at.day(),
			hour: at.hour(),
			minute: at.minute(),
			second: at.second(),
		}
	}

	pub fn to_naive(self) -> Option<NaiveDateTime> {
		NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
			self.hour,
			self.minute,
			self.second,
		)
	}

	pub fn days_in_month(&self) -> u32 {
		days_in_month(self.year, self.month)
	}

	fn time_to_start(&mut self) {
		self.hour = 0;
		self.minute = 0;
		self.second = 0;
	}

	fn time_to_end(&mut self) {
		self.hour = 23;
		self.minute = 59;
		self.second = 59;
	}

	/// Move to `month` (already matched) and restart the finer units.
	pub fn set_month_forward(&mut self, month: u32) {
		self.month = month;
		self.day = 1;
		self.time_to_start();
	}

	pub fn set_day_forward(&mut self, day: u32) {
		self.day = day;
		self.time_to_start();
	}

	pub fn set_hour_forward(&mut self, hour: u32) {
		self.hour = hour;
		self.minute = 0;
		self.second = 0;
	}

	pub fn set_minute_forward(&mut self, minute: u32) {
		self.minute = minute;
		self.second = 0;
	}

	pub fn set_year_forward(&mut self, year: i32) {
		self.year = year;
		self.set_month_forward(1);
	}

	pub fn carry_year(&mut self) {
		self.set_year_forward(self.year + 1);
	}

	pub fn carry_month(&mut self) {
		if self.month >= 12 {
			self.carry_year();
		} else {
			self.set_month_forward(self.month + 1);
		}
	}

	pub fn carry_day(&mut self) {
		self.set_day_forward(self.day + 1);
	}

	pub fn carry_hour(&mut self) {
		self.set_hour_forward(self.hour + 1);
	}

	pub fn carry_minute(&mut self) {
		self.set_minute_forward(self.minute + 1);
	}

	/// Move to `month` (already matched) and park the finer units at their
	/// maximum. The day is clamped to the month length by the day matcher.
	pub fn set_month_backward(&mut self, month: u32) {
		self.month = month;
		self.day = days_in_month(self.year, month);
		self.time_to_end();
	}

	pub fn set_day_backward(&mut self, day: u32) {
		self.day = day;
		self.time_to_end();
	}

	pub fn set_hour_backward(&mut self, hour: u32) {
		self.hour = hour;
		self.minute = 59;
		self.second = 59;
	}

	pub fn set_minute_backward(&mut self, minute: u32) {
		self.minute = minute;
		self.second = 59;
	}

	pub fn set_year_backward(&mut self, year: i32) {
		self.year = year;
		self.set_month_backward(12);
	}

	pub fn borrow_year(&mut self) {
		self.set_year_backward(self.year - 1);
	}

	pub fn borrow_month(&mut self) {
		if self.month <= 1 {
			self.borrow_year();
		} else {
			self.set_month_backward(self.month - 1);
		}
	}

	pub fn borrow_day(&mut self) {
		self.set_day_backward(self.day.saturating_sub(1));
	}

	pub fn borrow_hour(&mut self) {
		if self.hour == 0 {
			self.borrow_day();
		} else {
			self.set_hour_backward(self.hour - 1);
		}
	}

	pub fn borrow_minute(&mut self) {
		if self.minute == 0 {
			self.borrow_hour();
		} else {
			self.set_minute_backward(self.minute - 1);
		}
	}
}

/// Finest unit a cron resolves to; queries step and truncate by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
	Second,
	Minute,
	Hour,
	Day,
}

impl Unit {
	pub fn step(&self) -> TimeDelta {
		match self {
			Unit::Second => TimeDelta::seconds(1),
			Unit::Minute => TimeDelta::minutes(1),
			Unit::Hour => TimeDelta::hours(1),
			Unit::Day => TimeDelta::days(1),
		}
	}

	/// Drop everything below this unit.
	pub fn truncate(&self, at: NaiveDateTime) -> NaiveDateTime {
		let date = at.date();
		let (hour, minute, second) = match self {
			Unit::Second => (at.hour(), at.minute(), at.second()),
			Unit::Minute => (at.hour(), at.minute(), 0),
			Unit::Hour => (at.hour(), 0, 0),
			Unit::Day => (0, 0, 0),
		};
		date.and_hms_opt(hour, minute, second).unwrap_or(at)
	}
}
