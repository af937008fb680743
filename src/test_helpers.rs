use chrono::NaiveDate;

use crate::config::Config;
use crate::models::{Bias, DayDirection, EodRecord, MorningBiasSnapshot, Trade};

/// Parse a `YYYY-MM-DD` literal.
pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn trade(id: &str, date: &str, symbol: &str, result_r: f64) -> Trade {
    Trade::new(id, d(date), symbol, result_r)
}

pub fn morning(date: &str, bias: Bias) -> MorningBiasSnapshot {
    MorningBiasSnapshot::new(d(date), bias)
}

pub fn eod(date: &str, direction: DayDirection) -> EodRecord {
    EodRecord::new(d(date), direction)
}

/// A Config with defaults and a pinned "today", independent of the environment.
pub fn default_test_config(today: &str) -> Config {
    Config {
        sim_date: Some(d(today)),
        ..Config::default()
    }
}
