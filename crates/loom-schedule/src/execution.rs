// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Next and previous execution times for a [`Cron`].

use chrono::{
	DateTime, Datelike, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Timelike,
};
use loom_schedule_core::Cron;
use std::sync::Arc;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::{Direction, ExecutionError, Result};
use crate::iter::{Preceding, Upcoming};
use crate::cursor::Unit;
use crate::search::CalendarFields;

/// Stateless query engine bound to one schedule.
///
/// Queries take the reference instant's own time zone and return results in
/// that zone; nothing reads the system clock or a default zone. An
/// `ExecutionTime` is `Send + Sync` and can be shared freely.
#[derive(Debug, Clone)]
pub struct ExecutionTime {
	cron: Arc<Cron>,
	fields: CalendarFields,
	config: SearchConfig,
}

impl ExecutionTime {
	pub fn for_cron(cron: impl Into<Arc<Cron>>) -> Self {
		Self::with_config(cron, SearchConfig::default())
	}

	pub fn with_config(cron: impl Into<Arc<Cron>>, config: SearchConfig) -> Self {
		let cron = cron.into();
		let fields = CalendarFields::new(&cron);
		Self {
			cron,
			fields,
			config,
		}
	}

	pub fn cron(&self) -> &Cron {
		&self.cron
	}

	pub fn config(&self) -> &SearchConfig {
		&self.config
	}

	fn no_match<Tz: TimeZone>(&self, direction: Direction, reference: &DateTime<Tz>) -> ExecutionError {
		ExecutionError::NoMatchFound {
			direction,
			reference: reference.naive_local().to_string(),
			horizon_years: self.config.max_search_years(),
		}
	}

	fn window(&self, reference: NaiveDateTime) -> (i32, i32) {
		let years = i32::try_from(self.config.max_search_years()).unwrap_or(i32::MAX);
		(
			reference.year().saturating_sub(years),
			reference.year().saturating_add(years),
		)
	}

	/// First execution strictly after `reference`.
	pub fn next_execution<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Result<DateTime<Tz>> {
		let local = reference.naive_local();
		let unit = self.fields.unit();
		let (_, last_year) = self.window(local);

		let mut found = forward_start(unit, local)
			.and_then(|start| self.walk_forward(reference, start, last_year));

		// Still in the first pass of a repeated hour: the second pass is ahead.
		if let Some((Pass::First, shift)) = fold_pass(reference) {
			let repeated = local
				.checked_sub_signed(shift)
				.and_then(|from| forward_start(unit, from))
				.and_then(|start| self.second_pass_after(reference, start, local));
			found = match (found, repeated) {
				(Some(walked), Some(repeated)) => Some(walked.min(repeated)),
				(walked, repeated) => walked.or(repeated),
			};
		}

		let next = found.ok_or_else(|| self.no_match(Direction::Forward, reference))?;
		debug!(cron = %self.cron, reference = %local, next = %next.naive_local(), "next execution");
		Ok(next)
	}

	/// Last execution strictly before `reference`.
	pub fn last_execution<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Result<DateTime<Tz>> {
		let local = reference.naive_local();
		let unit = self.fields.unit();
		let (first_year, _) = self.window(local);

		let mut found = backward_start(unit, local)
			.and_then(|start| self.walk_backward(reference, start, first_year));

		// In the second pass of a repeated hour: the rest of the first pass is behind.
		if let Some((Pass::Second, shift)) = fold_pass(reference) {
			let repeated = local
				.checked_add_signed(shift)
				.and_then(|from| backward_start(unit, from))
				.and_then(|start| self.first_pass_before(reference, start, local));
			found = match (found, repeated) {
				(Some(walked), Some(repeated)) => Some(walked.max(repeated)),
				(walked, repeated) => walked.or(repeated),
			};
		}

		let last = found.ok_or_else(|| self.no_match(Direction::Backward, reference))?;
		debug!(cron = %self.cron, reference = %local, last = %last.naive_local(), "last execution");
		Ok(last)
	}

	fn walk_forward<Tz: TimeZone>(
		&self,
		reference: &DateTime<Tz>,
		mut start: NaiveDateTime,
		last_year: i32,
	) -> Option<DateTime<Tz>> {
		let tz = reference.timezone();
		let step = self.fields.unit().step();
		loop {
			let candidate = self.fields.next_from(start, last_year)?;

			// Wall times inside a DST gap do not exist and are skipped.
			let resolved = match tz.from_local_datetime(&candidate) {
				LocalResult::Single(at) => (at > *reference).then_some(at),
				LocalResult::Ambiguous(earliest, latest) => {
					if earliest > *reference {
						Some(earliest)
					} else {
						(latest > *reference).then_some(latest)
					}
				}
				LocalResult::None => None,
			};
			if resolved.is_some() {
				return resolved;
			}
			start = candidate.checked_add_signed(step)?;
		}
	}

	fn walk_backward<Tz: TimeZone>(
		&self,
		reference: &DateTime<Tz>,
		mut start: NaiveDateTime,
		first_year: i32,
	) -> Option<DateTime<Tz>> {
		let tz = reference.timezone();
		let step = self.fields.unit().step();
		loop {
			let candidate = self.fields.previous_from(start, first_year)?;

			let resolved = match tz.from_local_datetime(&candidate) {
				LocalResult::Single(at) => (at < *reference).then_some(at),
				LocalResult::Ambiguous(earliest, latest) => {
					if latest < *reference {
						Some(latest)
					} else {
						(earliest < *reference).then_some(earliest)
					}
				}
				LocalResult::None => None,
			};
			if resolved.is_some() {
				return resolved;
			}
			start = candidate.checked_sub_signed(step)?;
		}
	}

	/// Earliest second-pass execution of a repeated hour, for a reference in
	/// its first pass. Wall times after `until` are left to the regular walk.
	fn second_pass_after<Tz: TimeZone>(
		&self,
		reference: &DateTime<Tz>,
		mut start: NaiveDateTime,
		until: NaiveDateTime,
	) -> Option<DateTime<Tz>> {
		let tz = reference.timezone();
		let step = self.fields.unit().step();
		loop {
			let candidate = self.fields.next_from(start, until.year())?;
			if candidate > until {
				return None;
			}
			if let LocalResult::Ambiguous(_, latest) = tz.from_local_datetime(&candidate) {
				if latest > *reference {
					return Some(latest);
				}
			}
			start = candidate.checked_add_signed(step)?;
		}
	}

	/// Latest first-pass execution of a repeated hour, for a reference in its
	/// second pass. Wall times before `until` are left to the regular walk.
	fn first_pass_before<Tz: TimeZone>(
		&self,
		reference: &DateTime<Tz>,
		mut start: NaiveDateTime,
		until: NaiveDateTime,
	) -> Option<DateTime<Tz>> {
		let tz = reference.timezone();
		let step = self.fields.unit().step();
		loop {
			let candidate = self.fields.previous_from(start, until.year())?;
			if candidate < until {
				return None;
			}
			if let LocalResult::Ambiguous(earliest, _) = tz.from_local_datetime(&candidate) {
				if earliest < *reference {
					return Some(earliest);
				}
			}
			start = candidate.checked_sub_signed(step)?;
		}
	}

	/// Does the schedule fire exactly at `at`?
	pub fn is_match<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
		let local = at.naive_local();
		local.nanosecond() == 0 && self.fields.matches(local)
	}

	/// Time from `reference` until the next execution.
	pub fn time_to_next_execution<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Result<TimeDelta> {
		let next = self.next_execution(reference)?;
		Ok(next.signed_duration_since(reference.clone()))
	}

	/// Time elapsed since the last execution before `reference`.
	pub fn time_from_last_execution<Tz: TimeZone>(
		&self,
		reference: &DateTime<Tz>,
	) -> Result<TimeDelta> {
		let last = self.last_execution(reference)?;
		Ok(reference.clone().signed_duration_since(last))
	}

	/// Executions after `reference`, earliest first.
	pub fn upcoming<Tz: TimeZone>(&self, reference: DateTime<Tz>) -> Upcoming<'_, Tz> {
		Upcoming::new(self, reference)
	}

	/// Executions before `reference`, latest first.
	pub fn preceding<Tz: TimeZone>(&self, reference: DateTime<Tz>) -> Preceding<'_, Tz> {
		Preceding::new(self, reference)
	}
}

impl From<Cron> for ExecutionTime {
	fn from(cron: Cron) -> Self {
		Self::for_cron(cron)
	}
}

impl From<Arc<Cron>> for ExecutionTime {
	fn from(cron: Arc<Cron>) -> Self {
		Self::for_cron(cron)
	}
}

/// Which occurrence of a repeated wall time an instant is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
	First,
	Second,
}

/// The pass `at` falls in when its wall time repeats, and how far the
/// offset drops between the two passes.
fn fold_pass<Tz: TimeZone>(at: &DateTime<Tz>) -> Option<(Pass, TimeDelta)> {
	match at.timezone().from_local_datetime(&at.naive_local()) {
		LocalResult::Ambiguous(earliest, latest) => {
			let shift = earliest.offset().fix().local_minus_utc()
				- latest.offset().fix().local_minus_utc();
			let pass = if earliest == *at {
				Pass::First
			} else {
				Pass::Second
			};
			Some((pass, TimeDelta::seconds(i64::from(shift))))
		}
		_ => None,
	}
}

/// First wall time a forward search may return: strictly after `local`.
fn forward_start(unit: Unit, local: NaiveDateTime) -> Option<NaiveDateTime> {
	unit.truncate(local).checked_add_signed(unit.step())
}

/// First wall time a backward search may return: strictly before `local`.
fn backward_start(unit: Unit, local: NaiveDateTime) -> Option<NaiveDateTime> {
	let truncated = unit.truncate(local);
	if truncated == local {
		truncated.checked_sub_signed(unit.step())
	} else {
		Some(truncated)
	}
}
