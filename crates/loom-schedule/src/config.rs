// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered search configuration.
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`LOOM_SCHEDULE_*`)
//! 2. Config file (`/etc/loom/schedule.toml`, `[search]` table)
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, trace};

use crate::error::ConfigError;

/// Default look-ahead/look-behind window. Large enough for a leap-day
/// schedule across a skipped century leap year (2096 -> 2104).
pub const DEFAULT_MAX_SEARCH_YEARS: u32 = 100;

/// Largest accepted window.
pub const MAX_SEARCH_YEARS_LIMIT: u32 = 1000;

pub const ENV_MAX_SEARCH_YEARS: &str = "LOOM_SCHEDULE_MAX_SEARCH_YEARS";

/// Resolved bounds for execution-time searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchConfig {
	max_search_years: u32,
}

impl SearchConfig {
	/// `max_search_years` must lie in `1..=MAX_SEARCH_YEARS_LIMIT`.
	pub fn new(max_search_years: u32) -> Result<Self, ConfigError> {
		if !(1..=MAX_SEARCH_YEARS_LIMIT).contains(&max_search_years) {
			return Err(ConfigError::InvalidValue {
				key: "max_search_years".to_string(),
				message: format!(
					"{max_search_years} is outside 1..={MAX_SEARCH_YEARS_LIMIT}"
				),
			});
		}
		Ok(Self { max_search_years })
	}

	/// Years a query may move away from its reference instant before it
	/// reports that no execution exists.
	pub fn max_search_years(&self) -> u32 {
		self.max_search_years
	}
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			max_search_years: DEFAULT_MAX_SEARCH_YEARS,
		}
	}
}

/// Partial configuration from a single source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchConfigLayer {
	pub max_search_years: Option<u32>,
}

impl SearchConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_search_years.is_some() {
			self.max_search_years = other.max_search_years;
		}
	}

	pub fn finalize(self) -> Result<SearchConfig, ConfigError> {
		SearchConfig::new(self.max_search_years.unwrap_or(DEFAULT_MAX_SEARCH_YEARS))
	}
}

/// Shape of the TOML config file.
#[derive(Debug, Default, Deserialize)]
struct FileLayer {
	#[serde(default)]
	search: Option<SearchConfigLayer>,
}

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SearchConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SearchConfigLayer, ConfigError> {
		Ok(SearchConfigLayer {
			max_search_years: Some(DEFAULT_MAX_SEARCH_YEARS),
		})
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/loom/schedule.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SearchConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SearchConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let file: FileLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed search config from TOML");
		Ok(file.search.unwrap_or_default())
	}
}

/// Environment variable source.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SearchConfigLayer, ConfigError> {
		Ok(SearchConfigLayer {
			max_search_years: env_u32(ENV_MAX_SEARCH_YEARS)?,
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_u32(name: &str) -> Result<Option<u32>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u32 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_from(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<SearchConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SearchConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	merged.finalize()
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<SearchConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<SearchConfig, ConfigError> {
	load_from(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<SearchConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

#[cfg(test)]
mod tests {
	use super::*;
	use serial_test::serial;
	use std::io::Write;

	#[test]
	fn test_default_values() {
		assert_eq!(SearchConfig::default().max_search_years(), 100);
		assert_eq!(
			SearchConfigLayer::default().finalize().unwrap(),
			SearchConfig::default()
		);
	}

	#[test]
	fn test_merge_prefers_later_layer() {
		let mut base = SearchConfigLayer {
			max_search_years: Some(10),
		};
		base.merge(SearchConfigLayer::default());
		assert_eq!(base.max_search_years, Some(10));
		base.merge(SearchConfigLayer {
			max_search_years: Some(30),
		});
		assert_eq!(base.max_search_years, Some(30));
	}

	#[test]
	fn test_zero_years_rejected() {
		let layer = SearchConfigLayer {
			max_search_years: Some(0),
		};
		assert!(matches!(
			layer.finalize(),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_window_upper_bound() {
		assert!(matches!(
			SearchConfig::new(u32::MAX),
			Err(ConfigError::InvalidValue { .. })
		));
		assert!(matches!(
			SearchConfigLayer {
				max_search_years: Some(MAX_SEARCH_YEARS_LIMIT + 1),
			}
			.finalize(),
			Err(ConfigError::InvalidValue { .. })
		));
		assert_eq!(
			SearchConfig::new(MAX_SEARCH_YEARS_LIMIT)
				.unwrap()
				.max_search_years(),
			MAX_SEARCH_YEARS_LIMIT
		);
	}

	#[test]
	fn test_toml_source_reads_search_table() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[search]\nmax_search_years = 25").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.max_search_years, Some(25));
	}

	#[test]
	fn test_toml_source_missing_file_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		let layer = TomlSource::new(dir.path().join("absent.toml")).load().unwrap();
		assert_eq!(layer, SearchConfigLayer::default());
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[search]\nmax_search_years = \"many\"").unwrap();

		assert!(matches!(
			TomlSource::new(file.path()).load(),
			Err(ConfigError::TomlParse { .. })
		));
	}

	#[test]
	fn test_file_overrides_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[search]\nmax_search_years = 12").unwrap();

		let config = load_from(vec![
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		])
		.unwrap();
		assert_eq!(config.max_search_years(), 12);
	}

	#[test]
	#[serial]
	fn test_env_overrides_file_and_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[search]\nmax_search_years = 12").unwrap();

		std::env::set_var(ENV_MAX_SEARCH_YEARS, "40");
		let from_env = load_config_from_env();
		let with_file = load_config_with_file(file.path());
		let standard = load_config();
		std::env::remove_var(ENV_MAX_SEARCH_YEARS);

		assert_eq!(from_env.unwrap().max_search_years(), 40);
		assert_eq!(with_file.unwrap().max_search_years(), 40);
		assert_eq!(standard.unwrap().max_search_years(), 40);
	}

	#[test]
	#[serial]
	fn test_env_invalid_values_rejected() {
		std::env::set_var(ENV_MAX_SEARCH_YEARS, "soon");
		let not_a_number = load_config_from_env();
		std::env::set_var(ENV_MAX_SEARCH_YEARS, "5000");
		let too_large = load_config_from_env();
		std::env::remove_var(ENV_MAX_SEARCH_YEARS);

		assert!(matches!(
			not_a_number,
			Err(ConfigError::InvalidValue { key, .. }) if key == ENV_MAX_SEARCH_YEARS
		));
		assert!(matches!(too_large, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	#[serial]
	fn test_empty_env_value_is_ignored() {
		std::env::set_var(ENV_MAX_SEARCH_YEARS, "");
		let config = load_config_from_env();
		std::env::remove_var(ENV_MAX_SEARCH_YEARS);

		assert_eq!(config.unwrap(), SearchConfig::default());
	}
}
