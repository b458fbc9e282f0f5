//! Recurrence cadences and next-deadline computation.

use super::ParseRecurrenceError;
use chrono::{DateTime, Days, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTHS_PER_YEAR: u32 = 12;

/// Cadence a task repeats on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Non-repeating task; expiry is terminal.
    Once,
    /// Repeats every day at the configured reset time.
    Daily,
    /// Repeats every seven days.
    Weekly,
    /// Repeats every calendar month, clamped on overflow.
    Monthly,
    /// Repeats every calendar year, leap-day safe.
    Yearly,
}

impl Recurrence {
    /// Every cadence, repeating and non-repeating alike.
    pub const ALL: [Self; 5] = [
        Self::Once,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
    ];

    /// The repeating cadences eligible for recurrence resets.
    pub const RECURRING: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Last second of the day; the deadline time for weekly, monthly, and
    /// yearly cycles and the default daily reset time.
    pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
        Some(time) => time,
        None => panic!("23:59:59 is a valid time of day"),
    };

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Returns `true` when the cadence repeats.
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::Once)
    }

    /// Computes the deadline for the next cycle, strictly after `now`.
    ///
    /// Daily cycles land on the following day at `daily_reset_time`; weekly
    /// cycles add seven days, monthly cycles one calendar month (overflow
    /// clamped, so 31 January moves to 28 or 29 February), and yearly cycles
    /// one calendar year (29 February moves to 28 February off leap years),
    /// each pinned to [`Self::END_OF_DAY`]. A candidate at or before `now`
    /// rolls forward by whole periods, so a deadline several periods stale
    /// advances to the next future slot in a single call.
    ///
    /// Returns `None` for [`Recurrence::Once`] and when the calendar
    /// arithmetic cannot be represented.
    #[must_use]
    pub fn next_deadline(
        self,
        current: DateTime<Utc>,
        now: DateTime<Utc>,
        daily_reset_time: NaiveTime,
    ) -> Option<DateTime<Utc>> {
        let mut candidate = self.advance(current, daily_reset_time)?;
        while candidate <= now {
            candidate = self.advance(candidate, daily_reset_time)?;
        }
        Some(candidate)
    }

    /// Advances a deadline by exactly one period.
    fn advance(self, from: DateTime<Utc>, daily_reset_time: NaiveTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Once => None,
            Self::Daily => from
                .checked_add_days(Days::new(1))
                .map(|next| at_time(next, daily_reset_time)),
            Self::Weekly => from
                .checked_add_days(Days::new(7))
                .map(|next| at_time(next, Self::END_OF_DAY)),
            Self::Monthly => from
                .checked_add_months(Months::new(1))
                .map(|next| at_time(next, Self::END_OF_DAY)),
            Self::Yearly => from
                .checked_add_months(Months::new(MONTHS_PER_YEAR))
                .map(|next| at_time(next, Self::END_OF_DAY)),
        }
    }
}

impl TryFrom<&str> for Recurrence {
    type Error = ParseRecurrenceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(ParseRecurrenceError(value.to_owned())),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pins a timestamp to the given time of day in UTC.
fn at_time(timestamp: DateTime<Utc>, time: NaiveTime) -> DateTime<Utc> {
    timestamp.date_naive().and_time(time).and_utc()
}
