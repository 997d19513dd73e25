//! Lunch/dinner pool detection.
//!
//! Lunch runs from 06:00 up to 17:00; everything else is dinner. Shifts are
//! split at every pool boundary they cross and each piece is credited to the
//! pool its start falls in.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Pool;

use super::TimestampParser;

/// Hour of day at which the lunch pool opens.
pub const LUNCH_START_HOUR: u32 = 6;

/// Hour of day at which the dinner pool opens.
pub const DINNER_START_HOUR: u32 = 17;

const SECONDS_PER_HOUR: i64 = 3600;

/// Classifies a single instant into its pool.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::classify_instant;
/// use tip_pool_engine::models::Pool;
/// use chrono::NaiveDateTime;
///
/// let noon = NaiveDateTime::parse_from_str("2024-01-10 12:00", "%Y-%m-%d %H:%M").unwrap();
/// let late = NaiveDateTime::parse_from_str("2024-01-10 17:00", "%Y-%m-%d %H:%M").unwrap();
/// assert_eq!(classify_instant(noon), Pool::Lunch);
/// assert_eq!(classify_instant(late), Pool::Dinner);
/// ```
pub fn classify_instant(instant: NaiveDateTime) -> Pool {
    if (LUNCH_START_HOUR..DINNER_START_HOUR).contains(&instant.hour()) {
        Pool::Lunch
    } else {
        Pool::Dinner
    }
}

/// Hours of one shift credited to each pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolHoursSplit {
    /// Hours worked in the lunch pool.
    pub lunch_hours: Decimal,
    /// Hours worked in the dinner pool.
    pub dinner_hours: Decimal,
}

impl PoolHoursSplit {
    /// Lunch plus dinner hours.
    pub fn total(&self) -> Decimal {
        self.lunch_hours + self.dinner_hours
    }

    /// Hours credited to a pool.
    pub fn for_pool(&self, pool: Pool) -> Decimal {
        match pool {
            Pool::Lunch => self.lunch_hours,
            Pool::Dinner => self.dinner_hours,
        }
    }
}

/// Splits the interval between two instants into lunch and dinner hours.
///
/// An `end` before `start` is read as a shift that ran past midnight and is
/// moved forward one day. If it is still before `start` the interval is
/// rejected with `ShiftOutOfOrder`.
pub fn split_interval(start: NaiveDateTime, end: NaiveDateTime) -> EngineResult<PoolHoursSplit> {
    let end = roll_over_midnight(start, end).ok_or_else(|| EngineError::ShiftOutOfOrder {
        clock_in: start.to_string(),
        clock_out: end.to_string(),
    })?;
    Ok(split_ordered(start, end))
}

/// Parses a clock-in and clock-out and splits the shift between pools.
///
/// # Example
///
/// ```
/// use tip_pool_engine::calculation::{split_hours, TimestampParser};
/// use rust_decimal::Decimal;
///
/// let parser = TimestampParser::default();
/// let split = split_hours("01/10/2024 15:00", "01/10/2024 19:00", &parser).unwrap();
/// assert_eq!(split.lunch_hours, Decimal::from(2));
/// assert_eq!(split.dinner_hours, Decimal::from(2));
/// ```
pub fn split_hours(
    in_text: &str,
    out_text: &str,
    parser: &TimestampParser,
) -> EngineResult<PoolHoursSplit> {
    let start = parser.parse(in_text)?;
    let end = parser.parse(out_text)?;
    let end = roll_over_midnight(start, end).ok_or_else(|| EngineError::ShiftOutOfOrder {
        clock_in: in_text.trim().to_string(),
        clock_out: out_text.trim().to_string(),
    })?;
    Ok(split_ordered(start, end))
}

fn roll_over_midnight(start: NaiveDateTime, end: NaiveDateTime) -> Option<NaiveDateTime> {
    if end >= start {
        return Some(end);
    }
    let rolled = end.checked_add_signed(Duration::hours(24))?;
    (rolled >= start).then_some(rolled)
}

/// Requires `start <= end`.
///
/// Each piece between boundaries goes to the pool its start falls in, and
/// the caller credits the whole split to the clock-in date. A 17:00 to
/// 08:00 shift on day D therefore puts 06:00-08:00 of D+1 in day D's Lunch
/// bucket, paid from day D's lunch tips, and 04:00-06:00 of D+1 in day D's
/// Dinner bucket.
fn split_ordered(start: NaiveDateTime, end: NaiveDateTime) -> PoolHoursSplit {
    let mut lunch_seconds = 0i64;
    let mut dinner_seconds = 0i64;
    let mut cursor = start;

    while cursor < end {
        let piece_end = next_boundary(cursor).map_or(end, |boundary| boundary.min(end));
        let seconds = (piece_end - cursor).num_seconds();
        match classify_instant(cursor) {
            Pool::Lunch => lunch_seconds += seconds,
            Pool::Dinner => dinner_seconds += seconds,
        }
        cursor = piece_end;
    }

    PoolHoursSplit {
        lunch_hours: seconds_to_hours(lunch_seconds),
        dinner_hours: seconds_to_hours(dinner_seconds),
    }
}

/// The first pool boundary strictly after `instant`, or `None` past the
/// last representable date.
fn next_boundary(instant: NaiveDateTime) -> Option<NaiveDateTime> {
    let midnight = instant.date().and_time(NaiveTime::MIN);
    [
        i64::from(LUNCH_START_HOUR),
        i64::from(DINNER_START_HOUR),
        i64::from(LUNCH_START_HOUR) + 24,
    ]
    .into_iter()
    .filter_map(|hour| midnight.checked_add_signed(Duration::hours(hour)))
    .find(|boundary| *boundary > instant)
}

fn seconds_to_hours(seconds: i64) -> Decimal {
    Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn split(in_text: &str, out_text: &str) -> PoolHoursSplit {
        split_hours(in_text, out_text, &TimestampParser::default()).unwrap()
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_instant(make_datetime("2024-01-10 05:59")), Pool::Dinner);
        assert_eq!(classify_instant(make_datetime("2024-01-10 06:00")), Pool::Lunch);
        assert_eq!(classify_instant(make_datetime("2024-01-10 16:59")), Pool::Lunch);
        assert_eq!(classify_instant(make_datetime("2024-01-10 17:00")), Pool::Dinner);
        assert_eq!(classify_instant(make_datetime("2024-01-10 00:00")), Pool::Dinner);
    }

    #[test]
    fn test_lunch_only_shift() {
        let result = split("01/10/2024 11:00", "01/10/2024 15:00");
        assert_eq!(result.lunch_hours, dec("4"));
        assert_eq!(result.dinner_hours, Decimal::ZERO);
    }

    #[test]
    fn test_shift_straddling_dinner_start() {
        let result = split("01/10/2024 16:30", "01/10/2024 22:00");
        assert_eq!(result.lunch_hours, dec("0.5"));
        assert_eq!(result.dinner_hours, dec("5"));
    }

    #[test]
    fn test_midnight_rollover_is_dinner() {
        let result = split("01/10/24 11:00 PM", "01/10/24 01:00 AM");
        assert_eq!(result.lunch_hours, Decimal::ZERO);
        assert_eq!(result.dinner_hours, dec("2"));
    }

    #[test]
    fn test_explicit_next_day_clock_out() {
        let result = split("01/10/2024 22:00", "01/11/2024 02:30");
        assert_eq!(result.dinner_hours, dec("4.5"));
        assert_eq!(result.total(), dec("4.5"));
    }

    #[test]
    fn test_overnight_into_next_lunch() {
        // 17:00 day one through 08:00 day two: 13h dinner, 2h lunch, all
        // credited to day one's buckets.
        let result = split("01/10/2024 17:00", "01/11/2024 08:00");
        assert_eq!(result.dinner_hours, dec("13"));
        assert_eq!(result.lunch_hours, dec("2"));
    }

    #[test]
    fn test_early_morning_piece_is_dinner() {
        let result = split("01/10/2024 04:00", "01/10/2024 10:00");
        assert_eq!(result.dinner_hours, dec("2"));
        assert_eq!(result.lunch_hours, dec("4"));
    }

    #[test]
    fn test_zero_length_shift() {
        let result = split("01/10/2024 12:00", "01/10/2024 12:00");
        assert_eq!(result.total(), Decimal::ZERO);
    }

    #[test]
    fn test_fractional_minutes() {
        let result = split("01/10/2024 12:00", "01/10/2024 12:20");
        assert_eq!(result.lunch_hours, Decimal::from(1200) / Decimal::from(3600));
    }

    #[test]
    fn test_clock_out_days_before_clock_in_is_error() {
        match split_hours(
            "01/12/2024 09:00",
            "01/10/2024 17:00",
            &TimestampParser::default(),
        ) {
            Err(EngineError::ShiftOutOfOrder { clock_in, clock_out }) => {
                assert_eq!(clock_in, "01/12/2024 09:00");
                assert_eq!(clock_out, "01/10/2024 17:00");
            }
            other => panic!("Expected ShiftOutOfOrder, got {:?}", other),
        }
    }

    #[test]
    fn test_rollover_past_last_date_is_error_not_panic() {
        let last = chrono::NaiveDate::MAX;
        let start = last.and_hms_opt(23, 0, 0).unwrap();
        let end = last.and_hms_opt(22, 0, 0).unwrap();
        assert!(matches!(
            split_interval(start, end),
            Err(EngineError::ShiftOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_evening_shift_on_last_date_splits() {
        let last = chrono::NaiveDate::MAX;
        let start = last.and_hms_opt(16, 0, 0).unwrap();
        let end = last.and_hms_opt(23, 0, 0).unwrap();
        let result = split_interval(start, end).unwrap();
        assert_eq!(result.lunch_hours, dec("1"));
        assert_eq!(result.dinner_hours, dec("6"));
    }

    #[test]
    fn test_unparseable_clock_in_is_date_format_error() {
        match split_hours("soon", "01/10/2024 17:00", &TimestampParser::default()) {
            Err(EngineError::DateFormat { text }) => assert_eq!(text, "soon"),
            other => panic!("Expected DateFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_split_interval_rolls_over() {
        let result = split_interval(
            make_datetime("2024-01-10 23:00"),
            make_datetime("2024-01-10 01:00"),
        )
        .unwrap();
        assert_eq!(result.dinner_hours, dec("2"));
        assert_eq!(result.for_pool(Pool::Dinner), dec("2"));
        assert_eq!(result.for_pool(Pool::Lunch), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_every_hour_has_exactly_one_pool(hour in 0u32..24, minute in 0u32..60) {
            let instant = make_datetime("2024-01-10 00:00")
                + Duration::minutes(i64::from(hour * 60 + minute));
            let expected = if (6..17).contains(&hour) { Pool::Lunch } else { Pool::Dinner };
            prop_assert_eq!(classify_instant(instant), expected);
        }

        #[test]
        fn prop_split_sums_to_elapsed(start_minute in 0i64..(24 * 60), length in 0i64..(30 * 60)) {
            let start = make_datetime("2024-01-10 00:00") + Duration::minutes(start_minute);
            let end = start + Duration::minutes(length);
            let result = split_interval(start, end).unwrap();
            let elapsed = Decimal::from(length) / Decimal::from(60);
            let difference = (result.total() - elapsed).abs();
            prop_assert!(difference < dec("0.000000001"));
            prop_assert!(result.lunch_hours >= Decimal::ZERO);
            prop_assert!(result.dinner_hours >= Decimal::ZERO);
        }
    }
}
