use chrono::{Datelike, Days, Duration, NaiveDate};
use std::collections::HashMap;

use crate::models::Dated;

/// Longest trailing window, about ten years.
pub const MAX_TRAILING_DAYS: usize = 3_660;

/// Inclusive range of wall-clock calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Monday..Sunday of the week containing `today`.
    pub fn current_week(today: NaiveDate) -> Self {
        let offset = today.weekday().num_days_from_monday() as i64;
        let start = today - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// The `days` days ending at `today`, inclusive. Zero days gives an empty
    /// range; windows are capped at [`MAX_TRAILING_DAYS`] and never reach
    /// before `NaiveDate::MIN`.
    pub fn trailing(today: NaiveDate, days: usize) -> Self {
        if days == 0 {
            return Self {
                start: NaiveDate::MAX,
                end: NaiveDate::MIN,
            };
        }
        let back = days.min(MAX_TRAILING_DAYS) as u64 - 1;
        Self {
            start: today
                .checked_sub_days(Days::new(back))
                .unwrap_or(NaiveDate::MIN),
            end: today,
        }
    }

    /// First..last day of a calendar month. `None` for an invalid month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start,
            end: next.pred_opt()?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Short weekday label, e.g. "Mon".
pub fn day_label(date: NaiveDate) -> String {
    date.weekday().to_string()
}

/// Records grouped by calendar day. Every day of the range has an entry,
/// empty days included.
#[derive(Debug, Clone)]
pub struct DateBuckets<'a, T> {
    pub days: Vec<NaiveDate>,
    buckets: HashMap<NaiveDate, Vec<&'a T>>,
}

impl<'a, T> DateBuckets<'a, T> {
    pub fn get(&self, date: NaiveDate) -> &[&'a T] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, date: NaiveDate) -> usize {
        self.get(date).len()
    }

    /// Days in ascending order with their records.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a T])> + '_ {
        self.days.iter().map(move |d| (*d, self.get(*d)))
    }
}

/// Group `records` into one bucket per day of `range`. Records without a date
/// or outside the range are dropped; insertion order is kept within a day.
pub fn bucket_by_date<T: Dated>(records: &[T], range: DateRange) -> DateBuckets<'_, T> {
    let days: Vec<NaiveDate> = range.days().collect();
    let mut buckets: HashMap<NaiveDate, Vec<&T>> =
        days.iter().map(|d| (*d, Vec::new())).collect();

    for record in records {
        let Some(date) = record.date() else { continue };
        if let Some(bucket) = buckets.get_mut(&date) {
            bucket.push(record);
        }
    }

    DateBuckets { days, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{d, trade};

    #[test]
    fn week_starts_monday() {
        // 2025-01-08 is a Wednesday
        let w = DateRange::current_week(d("2025-01-08"));
        assert_eq!(w.start, d("2025-01-06"));
        assert_eq!(w.end, d("2025-01-12"));
        assert_eq!(w.len(), 7);

        // Sunday belongs to the week that started six days earlier
        let w = DateRange::current_week(d("2025-01-12"));
        assert_eq!(w.start, d("2025-01-06"));

        let w = DateRange::current_week(d("2025-01-06"));
        assert_eq!(w.start, d("2025-01-06"));
    }

    #[test]
    fn trailing_includes_today() {
        let r = DateRange::trailing(d("2025-03-02"), 10);
        assert_eq!(r.start, d("2025-02-21"));
        assert_eq!(r.end, d("2025-03-02"));
        assert_eq!(r.days().count(), 10);
        assert!(DateRange::trailing(d("2025-03-02"), 0).is_empty());
        assert_eq!(DateRange::trailing(d("2025-03-02"), 0).days().count(), 0);
    }

    #[test]
    fn oversized_trailing_windows_are_clamped() {
        let r = DateRange::trailing(d("2025-03-02"), 200_000_000);
        assert_eq!(r.len(), MAX_TRAILING_DAYS);
        assert_eq!(r.end, d("2025-03-02"));

        let r = DateRange::trailing(d("2025-03-02"), usize::MAX);
        assert_eq!(r.len(), MAX_TRAILING_DAYS);

        let early = NaiveDate::MIN + Duration::days(5);
        let r = DateRange::trailing(early, 100);
        assert_eq!(r.start, NaiveDate::MIN);
        assert_eq!(r.len(), 6);
    }

    #[test]
    fn month_bounds() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.end, d("2024-02-29"));
        let dec = DateRange::month(2025, 12).unwrap();
        assert_eq!(dec.end, d("2025-12-31"));
        assert!(DateRange::month(2025, 13).is_none());
    }

    #[test]
    fn empty_input_still_yields_every_day() {
        let trades: Vec<crate::models::Trade> = Vec::new();
        let buckets = bucket_by_date(&trades, DateRange::current_week(d("2025-01-08")));
        assert_eq!(buckets.days.len(), 7);
        assert!(buckets.iter().all(|(_, recs)| recs.is_empty()));
    }

    #[test]
    fn groups_by_exact_day() {
        let trades = vec![
            trade("a", "2025-01-06", "EURUSD", 1.0),
            trade("b", "2025-01-06", "EURUSD", -1.0),
            trade("c", "2025-01-09", "GBPUSD", 2.0),
            trade("d", "2025-01-13", "GBPUSD", 2.0),
        ];
        let buckets = bucket_by_date(&trades, DateRange::current_week(d("2025-01-08")));
        assert_eq!(buckets.count(d("2025-01-06")), 2);
        assert_eq!(buckets.get(d("2025-01-06"))[0].id, "a");
        assert_eq!(buckets.count(d("2025-01-09")), 1);
        assert_eq!(buckets.count(d("2025-01-13")), 0);
    }

    #[test]
    fn labels() {
        assert_eq!(day_label(d("2025-01-06")), "Mon");
        assert_eq!(day_label(d("2025-01-12")), "Sun");
    }
}
