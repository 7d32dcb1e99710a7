// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for building cron schedules.

use thiserror::Error;

use crate::FieldName;

/// Result type for schedule construction.
pub type Result<T> = std::result::Result<T, CronError>;

/// Errors raised while constructing field expressions or crons.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
	#[error("value {value} is out of range [{min}, {max}] for {field}")]
	InvalidLiteral {
		field: FieldName,
		value: u32,
		min: u32,
		max: u32,
	},

	#[error("invalid range {from}-{to} for {field}: field does not wrap")]
	InvalidRange { field: FieldName, from: u32, to: u32 },

	#[error("invalid step {step} for {field}")]
	InvalidStep { field: FieldName, step: u32 },

	#[error("invalid base for stepped expression in {field}")]
	InvalidEveryBase { field: FieldName },

	#[error("empty list expression for {field}")]
	EmptyUnion { field: FieldName },

	#[error("field {0} is not part of this cron definition")]
	UnsupportedField(FieldName),

	#[error("missing expression for required field {0}")]
	MissingField(FieldName),

	#[error("field {0} declared more than once")]
	DuplicateField(FieldName),

	#[error("invalid cron definition: {0}")]
	InvalidDefinition(String),
}
