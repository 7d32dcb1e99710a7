// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for execution-time queries and configuration loading.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for execution-time queries.
pub type Result<T> = std::result::Result<T, ExecutionError>;

/// Which way a search walks from its reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	Forward,
	Backward,
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Direction::Forward => f.write_str("next"),
			Direction::Backward => f.write_str("previous"),
		}
	}
}

/// Errors returned by [`crate::ExecutionTime`] queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
	#[error("no {direction} execution within {horizon_years} years of {reference}")]
	NoMatchFound {
		direction: Direction,
		reference: String,
		horizon_years: u32,
	},
}

/// Errors raised while loading search configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}
