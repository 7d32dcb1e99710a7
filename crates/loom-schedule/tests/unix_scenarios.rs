// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Regression scenarios for minute-level UNIX schedules.

mod support;

use chrono::{TimeDelta, TimeZone, Utc};
use loom_schedule_core::FieldExpression::{Always, On, Union};

use support::{every, init_tracing, parse, range, unix};

#[test]
fn every_ten_minutes_next_is_not_in_the_past() {
	init_tracing();
	let execution = unix(every(10), Always, Always, Always, Always);
	let reference = parse("2015-09-05T13:43:00-07:00");

	assert_eq!(
		execution.next_execution(&reference).unwrap(),
		parse("2015-09-05T13:50:00-07:00")
	);
}

#[test]
fn every_two_minutes_rolls_over_the_hour() {
	let execution = unix(every(2), Always, Always, Always, Always);
	let reference = parse("2015-09-05T13:56:00-07:00");

	let next = execution.next_execution(&reference).unwrap();
	let following = execution.next_execution(&next).unwrap();

	assert_eq!(next, parse("2015-09-05T13:58:00-07:00"));
	assert_eq!(following, next + TimeDelta::minutes(2));
	assert_eq!(following, parse("2015-09-05T14:00:00-07:00"));
}

#[test]
fn wednesday_at_three_next_execution() {
	let execution = unix(On(0), On(3), Always, Always, On(3));
	let reference = parse("2015-09-17T00:00:00-07:00");

	assert_eq!(
		execution.next_execution(&reference).unwrap(),
		parse("2015-09-23T03:00:00-07:00")
	);
}

#[test]
fn wednesday_at_three_last_execution() {
	let execution = unix(On(0), On(3), Always, Always, On(3));
	let reference = parse("2015-09-17T00:00:00-07:00");

	assert_eq!(
		execution.last_execution(&reference).unwrap(),
		parse("2015-09-16T03:00:00-07:00")
	);
}

#[test]
fn monday_last_execution_keeps_the_reference_offset() {
	let execution = unix(Always, Always, Always, Always, On(1));
	let reference = parse("2015-10-13T17:26:54.468-07:00");

	let last = execution.last_execution(&reference).unwrap();
	assert_eq!(last, parse("2015-10-12T23:59:00-07:00"));
	assert_eq!(last.offset(), reference.offset());
}

#[test]
fn monday_next_execution_keeps_the_reference_offset() {
	let execution = unix(Always, Always, Always, Always, On(1));
	let reference = parse("2015-10-13T17:26:54.468-07:00");

	let next = execution.next_execution(&reference).unwrap();
	assert_eq!(next, parse("2015-10-19T00:00:00-07:00"));
	assert_eq!(next.offset(), reference.offset());
}

#[test]
fn day_of_week_last_execution_crosses_month_boundary() {
	let execution = unix(On(0), On(11), Always, Always, On(1));
	let reference = Utc.with_ymd_and_hms(2015, 11, 2, 0, 10, 0).unwrap();

	assert_eq!(
		execution.last_execution(&reference).unwrap(),
		Utc.with_ymd_and_hms(2015, 10, 26, 11, 0, 0).unwrap()
	);
}

#[test]
fn weekday_list_is_read_as_days_of_week() {
	let execution = unix(Always, Always, Always, Always, Union(vec![On(1), On(2)]));
	let reference = parse("2015-11-10T17:01:00Z");

	assert_eq!(
		execution.last_execution(&reference).unwrap(),
		parse("2015-11-10T17:00:00Z")
	);
}

#[test]
fn weekday_list_mixing_single_values_and_ranges() {
	let execution = unix(
		Always,
		Always,
		Always,
		Always,
		Union(vec![On(1), range(2, 3)]),
	);
	let reference = parse("2015-11-10T17:01:00Z");

	assert_eq!(
		execution.last_execution(&reference).unwrap(),
		parse("2015-11-10T17:00:00Z")
	);
	// Thursday 12 November is outside Mon-Wed.
	assert!(!execution.is_match(&parse("2015-11-12T10:00:00Z")));
	assert_eq!(
		execution
			.next_execution(&parse("2015-11-11T23:59:00Z"))
			.unwrap(),
		parse("2015-11-16T00:00:00Z")
	);
}

#[test]
fn stepped_month_and_day_fields_use_calendar_numbering() {
	// * * */3 */4 */5: days 1,4,..,31 or Sun/Fri, in Jan, May and Sep.
	let execution = unix(Always, Always, every(3), every(4), every(5));
	let reference = parse("2015-12-10T16:32:56.586-08:00");

	let next = execution.next_execution(&reference).unwrap();
	assert_eq!(next, parse("2016-01-01T00:00:00-08:00"));
	assert!(execution.is_match(&next));

	let last = execution.last_execution(&reference).unwrap();
	assert_eq!(last, parse("2015-09-28T23:59:00-08:00"));
	assert!(execution.is_match(&last));
}

#[test]
fn sunday_is_both_zero_and_seven() {
	let zero = unix(On(0), On(12), Always, Always, On(0));
	let seven = unix(On(0), On(12), Always, Always, On(7));
	// Monday 12 October 2015.
	let reference = parse("2015-10-12T00:00:00Z");

	let expected = parse("2015-10-18T12:00:00Z");
	assert_eq!(zero.next_execution(&reference).unwrap(), expected);
	assert_eq!(seven.next_execution(&reference).unwrap(), expected);
}

#[test]
fn day_of_month_or_day_of_week() {
	// 0 0 13 * 5: the 13th of every month and every Friday.
	let execution = unix(On(0), On(0), On(13), Always, On(5));
	let reference = parse("2015-11-01T00:00:00Z");

	let upcoming: Vec<_> = execution.upcoming(reference).take(4).collect();
	assert_eq!(
		upcoming,
		vec![
			parse("2015-11-06T00:00:00Z"),
			parse("2015-11-13T00:00:00Z"),
			parse("2015-11-20T00:00:00Z"),
			parse("2015-11-27T00:00:00Z"),
		]
	);

	// Sunday 13 December is accepted through day-of-month alone.
	assert!(execution.is_match(&parse("2015-12-13T00:00:00Z")));
}

#[test]
fn thirty_first_skips_short_months() {
	let execution = unix(On(0), On(0), On(31), Always, Always);

	assert_eq!(
		execution
			.next_execution(&parse("2015-09-01T00:00:00Z"))
			.unwrap(),
		parse("2015-10-31T00:00:00Z")
	);
	assert_eq!(
		execution
			.last_execution(&parse("2015-07-15T00:00:00Z"))
			.unwrap(),
		parse("2015-05-31T00:00:00Z")
	);
}

#[test]
fn leap_day_backward_search_lands_on_february_29() {
	let execution = unix(On(0), On(0), Always, On(2), Always);

	assert_eq!(
		execution
			.last_execution(&parse("2016-03-01T00:00:00Z"))
			.unwrap(),
		parse("2016-02-29T00:00:00Z")
	);
	assert_eq!(
		execution
			.last_execution(&parse("2015-03-01T00:00:00Z"))
			.unwrap(),
		parse("2015-02-28T00:00:00Z")
	);
}

#[test]
fn impossible_schedule_reports_no_match() {
	// 0 0 31 4,6 *: April and June have no 31st.
	let execution = unix(On(0), On(0), On(31), Union(vec![On(4), On(6)]), Always);
	let reference = parse("2015-01-01T00:00:00Z");

	assert!(execution.next_execution(&reference).is_err());
	assert!(execution.last_execution(&reference).is_err());
	assert!(execution.upcoming(reference).next().is_none());
}
