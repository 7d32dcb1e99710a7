// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The immutable [`Cron`] schedule and its builder.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::definition::CronDefinition;
use crate::domain::{FieldDomain, FieldName, WeekdayMapping};
use crate::error::{CronError, Result};
use crate::expression::FieldExpression;

/// A field expression paired with the domain it was validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronField {
	pub expression: FieldExpression,
	pub domain: FieldDomain,
}

impl CronField {
	pub fn matches(&self, value: u32) -> bool {
		self.expression.matches(value, &self.domain)
	}
}

/// A validated cron schedule.
///
/// Holds one [`CronField`] for every field of its [`CronDefinition`]. There is
/// no way to mutate a `Cron` after [`CronBuilder::build`] returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cron {
	definition: CronDefinition,
	fields: BTreeMap<FieldName, CronField>,
}

impl Cron {
	pub fn builder(definition: CronDefinition) -> CronBuilder {
		CronBuilder::new(definition)
	}

	pub fn definition(&self) -> &CronDefinition {
		&self.definition
	}

	pub fn field(&self, name: FieldName) -> Option<&CronField> {
		self.fields.get(&name)
	}

	pub fn expression(&self, name: FieldName) -> Option<&FieldExpression> {
		self.fields.get(&name).map(|f| &f.expression)
	}

	pub fn has_field(&self, name: FieldName) -> bool {
		self.fields.contains_key(&name)
	}

	/// Fields in [`FieldName`] order.
	pub fn fields(&self) -> impl Iterator<Item = (FieldName, &CronField)> {
		self.fields.iter().map(|(name, field)| (*name, field))
	}

	pub fn weekday_mapping(&self) -> WeekdayMapping {
		self.definition.weekday_mapping()
	}
}

impl fmt::Display for Cron {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for definition in self.definition.fields() {
			let Some(field) = self.fields.get(&definition.name()) else {
				continue;
			};
			if !first {
				f.write_str(" ")?;
			}
			first = false;
			write!(f, "{}", field.expression)?;
		}
		Ok(())
	}
}

/// Collects field expressions and validates them into a [`Cron`].
#[derive(Debug, Clone)]
pub struct CronBuilder {
	definition: CronDefinition,
	fields: Vec<(FieldName, FieldExpression)>,
}

impl CronBuilder {
	pub fn new(definition: CronDefinition) -> Self {
		Self {
			definition,
			fields: Vec::new(),
		}
	}

	pub fn field(mut self, name: FieldName, expression: FieldExpression) -> Self {
		self.fields.push((name, expression));
		self
	}

	/// Domain the builder will validate `name` against, for constructing
	/// expressions with the checked constructors.
	pub fn domain(&self, name: FieldName) -> Result<FieldDomain> {
		self.definition
			.domain(name)
			.copied()
			.ok_or(CronError::UnsupportedField(name))
	}

	pub fn build(self) -> Result<Cron> {
		let mut fields = BTreeMap::new();
		for (name, expression) in self.fields {
			let domain = self
				.definition
				.domain(name)
				.copied()
				.ok_or(CronError::UnsupportedField(name))?;
			expression.validate(&domain)?;
			if fields
				.insert(name, CronField { expression, domain })
				.is_some()
			{
				return Err(CronError::DuplicateField(name));
			}
		}

		for definition in self.definition.fields() {
			if fields.contains_key(&definition.name()) {
				continue;
			}
			if !definition.optional {
				return Err(CronError::MissingField(definition.name()));
			}
			fields.insert(
				definition.name(),
				CronField {
					expression: FieldExpression::Always,
					domain: definition.domain,
				},
			);
		}

		Ok(Cron {
			definition: self.definition,
			fields,
		})
	}
}
