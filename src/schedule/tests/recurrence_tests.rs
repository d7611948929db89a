//! Recurrence stepping and weekend shifting.

use crate::schedule::domain::{next_occurrence, shift_off_weekend};
use crate::task::domain::{Recurrence, RecurrenceUnit};
use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use rstest::rstest;

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[rstest]
#[case(Recurrence::new(1, RecurrenceUnit::Hourly), at(2026, 3, 2), "2026-03-02T13:00:00Z")]
#[case(Recurrence::new(3, RecurrenceUnit::Daily), at(2026, 3, 2), "2026-03-05T12:00:00Z")]
#[case(Recurrence::new(2, RecurrenceUnit::Weekly), at(2026, 3, 2), "2026-03-16T12:00:00Z")]
#[case(Recurrence::new(1, RecurrenceUnit::Monthly), at(2026, 1, 31), "2026-02-28T12:00:00Z")]
#[case(Recurrence::new(1, RecurrenceUnit::Quarterly), at(2026, 1, 15), "2026-04-15T12:00:00Z")]
#[case(Recurrence::new(1, RecurrenceUnit::Yearly), at(2026, 5, 1), "2027-05-01T12:00:00Z")]
fn next_occurrence_steps_by_calendar_units(
    #[case] recurrence: Result<Recurrence, crate::task::domain::TaskDomainError>,
    #[case] anchor: DateTime<Utc>,
    #[case] expected: &str,
) {
    let recurrence = recurrence.expect("recurrence should validate");
    let next = next_occurrence(anchor, recurrence).expect("occurrence should exist");
    let expected: DateTime<Utc> = expected.parse().expect("valid expected timestamp");
    assert_eq!(next, expected);
}

#[rstest]
fn saturday_shifts_to_monday() {
    // 2026-03-07 is a Saturday.
    let shifted = shift_off_weekend(at(2026, 3, 7));
    assert_eq!(shifted.weekday(), Weekday::Mon);
    assert_eq!(shifted.day(), 9);
}

#[rstest]
fn sunday_shifts_to_monday() {
    let shifted = shift_off_weekend(at(2026, 3, 8));
    assert_eq!(shifted.weekday(), Weekday::Mon);
    assert_eq!(shifted.day(), 9);
}

#[rstest]
fn weekdays_are_left_alone() {
    let wednesday = at(2026, 3, 4);
    assert_eq!(shift_off_weekend(wednesday), wednesday);
}
