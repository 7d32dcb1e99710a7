// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Iterators over successive executions.

use chrono::{DateTime, TimeZone};
use std::iter::FusedIterator;

use crate::execution::ExecutionTime;

/// Executions after a reference instant, earliest first. Ends when the
/// search window is exhausted.
#[derive(Debug, Clone)]
pub struct Upcoming<'a, Tz: TimeZone> {
	execution: &'a ExecutionTime,
	cursor: Option<DateTime<Tz>>,
}

impl<'a, Tz: TimeZone> Upcoming<'a, Tz> {
	pub(crate) fn new(execution: &'a ExecutionTime, reference: DateTime<Tz>) -> Self {
		Self {
			execution,
			cursor: Some(reference),
		}
	}
}

impl<Tz: TimeZone> Iterator for Upcoming<'_, Tz> {
	type Item = DateTime<Tz>;

	fn next(&mut self) -> Option<Self::Item> {
		let reference = self.cursor.take()?;
		let next = self.execution.next_execution(&reference).ok()?;
		self.cursor = Some(next.clone());
		Some(next)
	}
}

impl<Tz: TimeZone> FusedIterator for Upcoming<'_, Tz> {}

/// Executions before a reference instant, latest first.
#[derive(Debug, Clone)]
pub struct Preceding<'a, Tz: TimeZone> {
	execution: &'a ExecutionTime,
	cursor: Option<DateTime<Tz>>,
}

impl<'a, Tz: TimeZone> Preceding<'a, Tz> {
	pub(crate) fn new(execution: &'a ExecutionTime, reference: DateTime<Tz>) -> Self {
		Self {
			execution,
			cursor: Some(reference),
		}
	}
}

impl<Tz: TimeZone> Iterator for Preceding<'_, Tz> {
	type Item = DateTime<Tz>;

	fn next(&mut self) -> Option<Self::Item> {
		let reference = self.cursor.take()?;
		let last = self.execution.last_execution(&reference).ok()?;
		self.cursor = Some(last.clone());
		Some(last)
	}
}

impl<Tz: TimeZone> FusedIterator for Preceding<'_, Tz> {}
