// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Loom cron schedules.
//!
//! This crate holds the value types shared by everything that reasons about
//! cron schedules: per-field numeric domains, the closed [`FieldExpression`]
//! variant with its matchers, dialect field tables, and the immutable
//! [`Cron`] built from them. The execution-time search lives in
//! `loom-schedule`.
//!
//! # Example
//!
//! ```
//! use loom_schedule_core::{Cron, CronDefinition, FieldExpression, FieldName};
//!
//! let builder = Cron::builder(CronDefinition::unix());
//! let minute = builder.domain(FieldName::Minute).unwrap();
//! let every_ten = FieldExpression::every(FieldExpression::Always, 10, &minute).unwrap();
//!
//! let cron = builder
//!     .field(FieldName::Minute, every_ten)
//!     .field(FieldName::Hour, FieldExpression::Always)
//!     .field(FieldName::DayOfMonth, FieldExpression::Always)
//!     .field(FieldName::Month, FieldExpression::Always)
//!     .field(FieldName::DayOfWeek, FieldExpression::Always)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(cron.to_string(), "*/10 * * * *");
//! ```

pub mod cron;
pub mod definition;
pub mod domain;
pub mod error;
pub mod expression;

pub use cron::{Cron, CronBuilder, CronField};
pub use definition::{CronDefinition, FieldDefinition};
pub use domain::{
	days_in_month, is_leap_year, FieldDomain, FieldName, WeekdayMapping, MAX_YEAR,
};
pub use error::{CronError, Result};
pub use expression::FieldExpression;
