// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Execution-time search for Loom cron schedules.
//!
//! Given a [`Cron`] built with `loom-schedule-core`, [`ExecutionTime`] finds
//! the nearest execution after or before a reference instant, and checks
//! whether an instant is itself an execution. Results keep the reference
//! instant's time zone.
//!
//! # Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use loom_schedule::ExecutionTime;
//! use loom_schedule_core::{Cron, CronDefinition, FieldExpression, FieldName};
//!
//! // 0 3 * * 3: 03:00 every Wednesday.
//! let cron = Cron::builder(CronDefinition::unix())
//!     .field(FieldName::Minute, FieldExpression::On(0))
//!     .field(FieldName::Hour, FieldExpression::On(3))
//!     .field(FieldName::DayOfMonth, FieldExpression::Always)
//!     .field(FieldName::Month, FieldExpression::Always)
//!     .field(FieldName::DayOfWeek, FieldExpression::On(3))
//!     .build()
//!     .unwrap();
//!
//! let execution = ExecutionTime::for_cron(cron);
//! let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
//! let reference = pdt.with_ymd_and_hms(2015, 9, 17, 0, 0, 0).unwrap();
//!
//! let next = execution.next_execution(&reference).unwrap();
//! assert_eq!(next, pdt.with_ymd_and_hms(2015, 9, 23, 3, 0, 0).unwrap());
//! ```
//!
//! [`Cron`]: loom_schedule_core::Cron

pub mod config;
mod cursor;
pub mod error;
pub mod execution;
pub mod iter;
mod search;

pub use config::{
	load_config, load_config_from_env, load_config_with_file, SearchConfig, SearchConfigLayer,
	DEFAULT_MAX_SEARCH_YEARS, MAX_SEARCH_YEARS_LIMIT,
};
pub use error::{ConfigError, Direction, ExecutionError, Result};
pub use execution::ExecutionTime;
pub use iter::{Preceding, Upcoming};
