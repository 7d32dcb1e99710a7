// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field tables for the supported cron dialects.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{FieldDomain, FieldName, WeekdayMapping, MAX_YEAR};
use crate::error::{CronError, Result};

/// One field of a dialect, in textual position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
	pub domain: FieldDomain,
	/// Optional fields may be left out of a cron; they then match every value.
	#[serde(default)]
	pub optional: bool,
}

impl FieldDefinition {
	pub const fn required(domain: FieldDomain) -> Self {
		Self {
			domain,
			optional: false,
		}
	}

	pub const fn optional(domain: FieldDomain) -> Self {
		Self {
			domain,
			optional: true,
		}
	}

	pub fn name(&self) -> FieldName {
		self.domain.field
	}
}

/// Which fields a dialect has, their bounds and how weekday digits read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronDefinition {
	fields: Vec<FieldDefinition>,
	weekday: WeekdayMapping,
}

impl CronDefinition {
	/// Build a custom definition. Field order is the textual order.
	pub fn new(fields: Vec<FieldDefinition>, weekday: WeekdayMapping) -> Result<Self> {
		let mut seen = HashSet::new();
		for field in &fields {
			if !seen.insert(field.name()) {
				return Err(CronError::DuplicateField(field.name()));
			}
			check_calendar_bounds(&field.domain)?;
		}
		if fields.is_empty() {
			return Err(CronError::InvalidDefinition("no fields defined".to_string()));
		}
		Ok(Self { fields, weekday })
	}

	/// `minute hour day-of-month month day-of-week`, Sunday = 0 or 7.
	pub fn unix() -> Self {
		Self {
			fields: vec![
				FieldDefinition::required(FieldDomain::standard(FieldName::Minute)),
				FieldDefinition::required(FieldDomain::standard(FieldName::Hour)),
				FieldDefinition::required(FieldDomain::standard(FieldName::DayOfMonth)),
				FieldDefinition::required(FieldDomain::standard(FieldName::Month)),
				FieldDefinition::required(FieldDomain::new(FieldName::DayOfWeek, 0, 7)),
			],
			weekday: WeekdayMapping::sunday_zero(),
		}
	}

	/// UNIX layout with a leading seconds field.
	pub fn unix_with_seconds() -> Self {
		let mut definition = Self::unix();
		definition.fields.insert(
			0,
			FieldDefinition::required(FieldDomain::standard(FieldName::Second)),
		);
		definition
	}

	/// `second minute hour day-of-month month day-of-week [year]`, Sunday = 1.
	pub fn quartz() -> Self {
		Self {
			fields: vec![
				FieldDefinition::required(FieldDomain::standard(FieldName::Second)),
				FieldDefinition::required(FieldDomain::standard(FieldName::Minute)),
				FieldDefinition::required(FieldDomain::standard(FieldName::Hour)),
				FieldDefinition::required(FieldDomain::standard(FieldName::DayOfMonth)),
				FieldDefinition::required(FieldDomain::standard(FieldName::Month)),
				FieldDefinition::required(FieldDomain::new(FieldName::DayOfWeek, 1, 7)),
				FieldDefinition::optional(FieldDomain::standard(FieldName::Year)),
			],
			weekday: WeekdayMapping::sunday_one(),
		}
	}

	pub fn fields(&self) -> &[FieldDefinition] {
		&self.fields
	}

	pub fn field(&self, name: FieldName) -> Option<&FieldDefinition> {
		self.fields.iter().find(|f| f.name() == name)
	}

	pub fn domain(&self, name: FieldName) -> Option<&FieldDomain> {
		self.field(name).map(|f| &f.domain)
	}

	pub fn weekday_mapping(&self) -> WeekdayMapping {
		self.weekday
	}
}

/// Calendar fields cannot extend past what a real date can hold.
fn check_calendar_bounds(domain: &FieldDomain) -> Result<()> {
	let limit = match domain.field {
		FieldName::Second | FieldName::Minute => Some((0, 59)),
		FieldName::Hour => Some((0, 23)),
		FieldName::DayOfMonth => Some((1, 31)),
		FieldName::Month => Some((1, 12)),
		FieldName::DayOfWeek => Some((0, 7)),
		FieldName::Year => Some((0, MAX_YEAR)),
	};
	if domain.min > domain.max {
		return Err(CronError::InvalidDefinition(format!(
			"{} has min {} above max {}",
			domain.field, domain.min, domain.max
		)));
	}
	if let Some((lo, hi)) = limit {
		if domain.min < lo || domain.max > hi {
			return Err(CronError::InvalidDefinition(format!(
				"{} bounds [{}, {}] exceed [{lo}, {hi}]",
				domain.field, domain.min, domain.max
			)));
		}
	}
	Ok(())
}
