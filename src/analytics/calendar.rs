use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analytics::date_bucketer::{bucket_by_date, day_label, DateRange};
use crate::models::{DayDirection, EodRecord, MorningBiasSnapshot, Trade};

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub label: String,
    /// 0 = Monday, for laying out the grid's leading blanks.
    pub weekday_index: u32,
    pub trade_count: usize,
    pub net_r: f64,
    pub has_morning: bool,
    pub has_eod: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_direction: Option<DayDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub net_r: f64,
    pub trade_count: usize,
    pub trading_days: usize,
}

/// Join trades, morning snapshots and EOD reviews for every day of a month.
/// `None` for an invalid month.
pub fn month_view(
    trades: &[Trade],
    morning: &[MorningBiasSnapshot],
    eods: &[EodRecord],
    year: i32,
    month: u32,
) -> Option<MonthView> {
    let range = DateRange::month(year, month)?;
    let trades_by_day = bucket_by_date(trades, range);
    let morning_by_day = bucket_by_date(morning, range);
    let eod_by_day = bucket_by_date(eods, range);

    let days: Vec<CalendarDay> = range
        .days()
        .map(|date| {
            let day_trades = trades_by_day.get(date);
            CalendarDay {
                date,
                label: day_label(date),
                weekday_index: date.weekday().num_days_from_monday(),
                trade_count: day_trades.len(),
                net_r: day_trades.iter().filter_map(|t| t.result_r).sum(),
                has_morning: morning_by_day.count(date) > 0,
                has_eod: eod_by_day.count(date) > 0,
                day_direction: eod_by_day
                    .get(date)
                    .iter()
                    .rev()
                    .find_map(|e| e.day_direction),
            }
        })
        .collect();

    Some(MonthView {
        year,
        month,
        net_r: days.iter().map(|d| d.net_r).sum(),
        trade_count: days.iter().map(|d| d.trade_count).sum(),
        trading_days: days.iter().filter(|d| d.trade_count > 0).count(),
        days,
    })
}

/// Parse a `YYYY-MM` month key.
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}
