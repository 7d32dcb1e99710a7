// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field expressions and the matchers that drive the execution-time search.
//!
//! A [`FieldExpression`] describes the allowed values of a single cron field.
//! Matchers are pure functions of the expression and a [`FieldDomain`]; the
//! domain is passed per call because day-of-month bounds depend on the month
//! being searched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::FieldDomain;
use crate::error::{CronError, Result};

/// Allowed values for one cron field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldExpression {
	/// `*`
	Always,
	/// `5`
	On(u32),
	/// `1-5`, or `22-2` on a wrapping domain.
	Between { from: u32, to: u32 },
	/// `*/10`, `0-30/5`, `5/15`.
	Every {
		base: Box<FieldExpression>,
		step: u32,
	},
	/// `1,2-3`
	Union(Vec<FieldExpression>),
}

/// Inclusive run of values a stepped expression walks over. `end < start`
/// means the run wraps past the domain maximum.
#[derive(Debug, Clone, Copy)]
struct Span {
	start: u32,
	end: u32,
}

impl Span {
	fn wraps(&self) -> bool {
		self.end < self.start
	}

	fn contains(&self, value: u32) -> bool {
		if self.wraps() {
			value >= self.start || value <= self.end
		} else {
			value >= self.start && value <= self.end
		}
	}

	/// Distance from `start` to `value`, walking forward through the domain.
	fn offset(&self, value: u32, domain: &FieldDomain) -> u32 {
		if value >= self.start {
			value - self.start
		} else {
			(domain.max + 1).saturating_sub(self.start) + (value - domain.min)
		}
	}
}

impl FieldExpression {
	pub fn always() -> Self {
		FieldExpression::Always
	}

	pub fn on(value: u32, domain: &FieldDomain) -> Result<Self> {
		Ok(FieldExpression::On(domain.validate(value)?))
	}

	pub fn between(from: u32, to: u32, domain: &FieldDomain) -> Result<Self> {
		let expr = FieldExpression::Between { from, to };
		expr.validate(domain)?;
		Ok(expr)
	}

	pub fn every(base: FieldExpression, step: u32, domain: &FieldDomain) -> Result<Self> {
		let expr = FieldExpression::Every {
			base: Box::new(base),
			step,
		};
		expr.validate(domain)?;
		Ok(expr)
	}

	pub fn union(members: Vec<FieldExpression>, domain: &FieldDomain) -> Result<Self> {
		let expr = FieldExpression::Union(members);
		expr.validate(domain)?;
		Ok(expr)
	}

	/// Check every literal of the expression against `domain`.
	pub fn validate(&self, domain: &FieldDomain) -> Result<()> {
		match self {
			FieldExpression::Always => Ok(()),
			FieldExpression::On(value) => domain.validate(*value).map(|_| ()),
			FieldExpression::Between { from, to } => {
				domain.validate(*from)?;
				domain.validate(*to)?;
				if to < from && !domain.wraps {
					return Err(CronError::InvalidRange {
						field: domain.field,
						from: *from,
						to: *to,
					});
				}
				Ok(())
			}
			FieldExpression::Every { base, step } => {
				if *step == 0 {
					return Err(CronError::InvalidStep {
						field: domain.field,
						step: *step,
					});
				}
				match base.as_ref() {
					FieldExpression::Always
					| FieldExpression::On(_)
					| FieldExpression::Between { .. } => base.validate(domain),
					_ => Err(CronError::InvalidEveryBase {
						field: domain.field,
					}),
				}
			}
			FieldExpression::Union(members) => {
				if members.is_empty() {
					return Err(CronError::EmptyUnion {
						field: domain.field,
					});
				}
				members.iter().try_for_each(|m| m.validate(domain))
			}
		}
	}

	/// True when the expression admits every value of any domain.
	///
	/// `*/1` and lists containing `*` count as unrestricted, which is what
	/// decides whether day-of-month and day-of-week combine with OR.
	pub fn is_unrestricted(&self) -> bool {
		match self {
			FieldExpression::Always => true,
			FieldExpression::Every { base, step } => *step == 1 && base.is_unrestricted(),
			FieldExpression::Union(members) => members.iter().any(|m| m.is_unrestricted()),
			FieldExpression::On(_) | FieldExpression::Between { .. } => false,
		}
	}

	/// Run of values a stepped expression starts from; `None` when a `v/step`
	/// start lies beyond a narrowed domain.
	fn span(&self, domain: &FieldDomain) -> Option<Span> {
		match self {
			FieldExpression::Between { from, to } => Some(Span {
				start: *from,
				end: *to,
			}),
			FieldExpression::On(value) => (*value <= domain.max).then_some(Span {
				start: *value,
				end: domain.max,
			}),
			_ => Some(Span {
				start: domain.min,
				end: domain.max,
			}),
		}
	}

	/// Does `value` satisfy the expression within `domain`?
	pub fn matches(&self, value: u32, domain: &FieldDomain) -> bool {
		if !domain.contains(value) {
			return false;
		}
		match self {
			FieldExpression::Always => true,
			FieldExpression::On(expected) => value == *expected,
			FieldExpression::Between { from, to } => Span {
				start: *from,
				end: *to,
			}
			.contains(value),
			FieldExpression::Every { base, step } => base
				.span(domain)
				.is_some_and(|span| span.contains(value) && span.offset(value, domain) % step == 0),
			FieldExpression::Union(members) => members.iter().any(|m| m.matches(value, domain)),
		}
	}

	/// Smallest value `>= from` within `domain` that matches.
	///
	/// `None` means the field is exhausted and the caller must carry into the
	/// next coarser unit.
	pub fn next_match(&self, from: u32, domain: &FieldDomain) -> Option<u32> {
		if from > domain.max {
			return None;
		}
		let from = from.max(domain.min);
		let found = match self {
			FieldExpression::Always => Some(from),
			FieldExpression::On(value) => (*value >= from).then_some(*value),
			FieldExpression::Between { from: start, to: end } => {
				if start <= end {
					(from <= *end).then(|| from.max(*start))
				} else if from <= *end || from >= *start {
					Some(from)
				} else {
					Some(*start)
				}
			}
			FieldExpression::Every { base, step } => {
				let span = base.span(domain)?;
				if span.wraps() {
					(from..=domain.max).find(|v| self.matches(*v, domain))
				} else if from <= span.start {
					Some(span.start)
				} else {
					let steps = (from - span.start).div_ceil(*step);
					span.start
						.checked_add(steps * step)
						.filter(|v| *v <= span.end)
				}
			}
			FieldExpression::Union(members) => members
				.iter()
				.filter_map(|m| m.next_match(from, domain))
				.min(),
		};
		found.filter(|v| domain.contains(*v))
	}

	/// Largest value `<= from` within `domain` that matches.
	///
	/// `None` means the field is exhausted and the caller must borrow from the
	/// next coarser unit.
	pub fn previous_match(&self, from: u32, domain: &FieldDomain) -> Option<u32> {
		if from < domain.min {
			return None;
		}
		let from = from.min(domain.max);
		let found = match self {
			FieldExpression::Always => Some(from),
			FieldExpression::On(value) => (*value <= from).then_some(*value),
			FieldExpression::Between { from: start, to: end } => {
				if start <= end {
					(from >= *start).then(|| from.min(*end))
				} else if from >= *start || from <= *end {
					Some(from)
				} else {
					Some(*end)
				}
			}
			FieldExpression::Every { base, step } => {
				let span = base.span(domain)?;
				if span.wraps() {
					(domain.min..=from).rev().find(|v| self.matches(*v, domain))
				} else if from < span.start {
					None
				} else {
					let top = from.min(span.end);
					Some(span.start + (top - span.start) / step * step)
				}
			}
			FieldExpression::Union(members) => members
				.iter()
				.filter_map(|m| m.previous_match(from, domain))
				.max(),
		};
		found.filter(|v| domain.contains(*v))
	}
}

impl Default for FieldExpression {
	fn default() -> Self {
		FieldExpression::Always
	}
}

impl fmt::Display for FieldExpression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldExpression::Always => f.write_str("*"),
			FieldExpression::On(value) => write!(f, "{value}"),
			FieldExpression::Between { from, to } => write!(f, "{from}-{to}"),
			FieldExpression::Every { base, step } => write!(f, "{base}/{step}"),
			FieldExpression::Union(members) => {
				for (i, member) in members.iter().enumerate() {
					if i > 0 {
						f.write_str(",")?;
					}
					write!(f, "{member}")?;
				}
				Ok(())
			}
		}
	}
}
