// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared helpers for execution-time integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use loom_schedule::ExecutionTime;
use loom_schedule_core::{Cron, CronDefinition, FieldExpression, FieldName};

pub fn every(step: u32) -> FieldExpression {
	FieldExpression::Every {
		base: Box::new(FieldExpression::Always),
		step,
	}
}

pub fn range(from: u32, to: u32) -> FieldExpression {
	FieldExpression::Between { from, to }
}

/// `minute hour day-of-month month day-of-week`
pub fn unix(
	minute: FieldExpression,
	hour: FieldExpression,
	day_of_month: FieldExpression,
	month: FieldExpression,
	day_of_week: FieldExpression,
) -> ExecutionTime {
	let cron = Cron::builder(CronDefinition::unix())
		.field(FieldName::Minute, minute)
		.field(FieldName::Hour, hour)
		.field(FieldName::DayOfMonth, day_of_month)
		.field(FieldName::Month, month)
		.field(FieldName::DayOfWeek, day_of_week)
		.build()
		.expect("valid unix cron");
	ExecutionTime::for_cron(cron)
}

pub fn parse(s: &str) -> DateTime<FixedOffset> {
	DateTime::parse_from_rfc3339(s).expect("valid RFC 3339 timestamp")
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}
