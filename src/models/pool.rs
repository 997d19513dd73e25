//! Meal-period pools and the day/pool aggregation key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The meal period a tip or a worked hour belongs to.
///
/// Lunch covers 06:00 up to (not including) 17:00; every other minute of the
/// day is Dinner.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::Pool;
///
/// assert_eq!(Pool::Lunch.to_string(), "Lunch");
/// assert!(Pool::Lunch < Pool::Dinner);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    /// 06:00 to 17:00.
    Lunch,
    /// 17:00 to 06:00 the next morning.
    Dinner,
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pool::Lunch => write!(f, "Lunch"),
            Pool::Dinner => write!(f, "Dinner"),
        }
    }
}

/// Aggregation key: a calendar date and a pool.
///
/// The date always comes from the start of the record (the order's opened
/// time or the shift's clock-in), never the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayPoolKey {
    /// Calendar date of the bucket.
    pub date: NaiveDate,
    /// Pool of the bucket.
    pub pool: Pool,
}

impl DayPoolKey {
    /// Creates a key.
    pub fn new(date: NaiveDate, pool: Pool) -> Self {
        Self { date, pool }
    }
}

impl std::fmt::Display for DayPoolKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date, self.pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_order_by_date_then_lunch_first() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let mut keys = vec![
            DayPoolKey::new(d2, Pool::Lunch),
            DayPoolKey::new(d1, Pool::Dinner),
            DayPoolKey::new(d1, Pool::Lunch),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                DayPoolKey::new(d1, Pool::Lunch),
                DayPoolKey::new(d1, Pool::Dinner),
                DayPoolKey::new(d2, Pool::Lunch),
            ]
        );
    }

    #[test]
    fn test_pool_serialization() {
        assert_eq!(serde_json::to_string(&Pool::Lunch).unwrap(), "\"lunch\"");
        assert_eq!(serde_json::to_string(&Pool::Dinner).unwrap(), "\"dinner\"");
    }

    #[test]
    fn test_key_display() {
        let key = DayPoolKey::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Pool::Dinner);
        assert_eq!(key.to_string(), "2024-01-10 Dinner");
    }
}
