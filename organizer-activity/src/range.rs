use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Half-open calendar span `[start, end)`. Never empty once constructed
/// through [`ActivityRange::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Number of days covered.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }

    /// Every day in the span, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d < self.end)
    }
}

/// What a caller asks to chart: an explicit range or a "last N" shorthand
/// relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityRange {
    /// `[start, end)`.
    Between { start: NaiveDate, end: NaiveDate },
    /// The last `n` days, today included.
    LastDays(i64),
    /// From the same calendar day `n` months ago through today.
    LastMonths(i64),
}

impl ActivityRange {
    /// `days` consecutive days starting at `start`.
    pub fn days_from(start: NaiveDate, days: i64) -> Self {
        let end = if days > 0 {
            start
                .checked_add_days(Days::new(days as u64))
                .unwrap_or(NaiveDate::MAX)
        } else {
            start
        };
        ActivityRange::Between { start, end }
    }

    /// Concrete span relative to `today`. `None` when the requested span is
    /// zero or negative, or falls off the calendar.
    pub fn resolve(&self, today: NaiveDate) -> Option<DateSpan> {
        let span = match *self {
            ActivityRange::Between { start, end } => DateSpan { start, end },
            ActivityRange::LastDays(n) => {
                if n <= 0 {
                    return None;
                }
                let end = today.succ_opt()?;
                let start = end.checked_sub_days(Days::new(n as u64))?;
                DateSpan { start, end }
            }
            ActivityRange::LastMonths(n) => {
                let months = u32::try_from(n).ok().filter(|m| *m > 0)?;
                let start = today.checked_sub_months(Months::new(months))?;
                DateSpan {
                    start,
                    end: today.succ_opt()?,
                }
            }
        };
        (span.end > span.start).then_some(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_days_ends_after_today() {
        let span = ActivityRange::LastDays(7).resolve(day(2024, 3, 10)).unwrap();
        assert_eq!(span.start, day(2024, 3, 4));
        assert_eq!(span.end, day(2024, 3, 11));
        assert_eq!(span.len_days(), 7);
    }

    #[test]
    fn last_months_clamps_to_month_end() {
        let span = ActivityRange::LastMonths(1).resolve(day(2024, 3, 31)).unwrap();
        assert_eq!(span.start, day(2024, 2, 29));
        assert_eq!(span.end, day(2024, 4, 1));
    }

    #[test]
    fn non_positive_spans_resolve_to_nothing() {
        let today = day(2024, 1, 1);
        assert_eq!(ActivityRange::LastDays(0).resolve(today), None);
        assert_eq!(ActivityRange::LastDays(-3).resolve(today), None);
        assert_eq!(ActivityRange::LastMonths(0).resolve(today), None);
        assert_eq!(ActivityRange::LastMonths(-1).resolve(today), None);
        assert_eq!(ActivityRange::days_from(today, 0).resolve(today), None);
        let backwards = ActivityRange::Between {
            start: day(2024, 2, 1),
            end: day(2024, 1, 1),
        };
        assert_eq!(backwards.resolve(today), None);
    }

    #[test]
    fn days_from_is_independent_of_today() {
        let range = ActivityRange::days_from(day(2023, 12, 30), 3);
        let span = range.resolve(day(2030, 1, 1)).unwrap();
        let days: Vec<_> = span.days().collect();
        assert_eq!(days, vec![day(2023, 12, 30), day(2023, 12, 31), day(2024, 1, 1)]);
        assert!(span.contains(day(2024, 1, 1)));
        assert!(!span.contains(day(2024, 1, 2)));
    }
}
