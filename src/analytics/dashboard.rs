use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, warn};

use crate::analytics::bias_accuracy::{BiasHistoryEntry, BiasScorer};
use crate::analytics::date_bucketer::{bucket_by_date, day_label, DateRange};
use crate::config::Config;
use crate::models::{Bias, BiasStatus, DayDirection, EodRecord, MorningBiasSnapshot, Trade};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    pub label: String,
    pub total_r: f64,
    pub trade_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTrade {
    pub id: String,
    pub date: NaiveDate,
    pub symbol: String,
    #[serde(rename = "resultR")]
    pub result_r: f64,
}

/// Everything the dashboard renders. Rates are percentages; `None` fields
/// serialize as `null` and mean "not enough data", which is not the same as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub days: Vec<DayBucket>,
    pub total_r: f64,
    pub total_trades: usize,
    pub win_rate: Option<f64>,
    pub avg_r_per_trade: Option<f64>,
    pub bias_accuracy: Option<f64>,
    pub bias_history: Vec<BiasHistoryEntry>,
    pub recent_trades: Vec<RecentTrade>,
}

impl SummaryPayload {
    /// Shown when the journal could not be read.
    pub fn empty() -> Self {
        Self {
            days: Vec::new(),
            total_r: 0.0,
            total_trades: 0,
            win_rate: None,
            avg_r_per_trade: None,
            bias_accuracy: None,
            bias_history: Vec::new(),
            recent_trades: Vec::new(),
        }
    }

    /// Sample dashboard shown to a journal with too few trades to chart.
    pub fn placeholder() -> Self {
        let day = |m: u32, d: u32| NaiveDate::from_ymd_opt(2025, m, d).unwrap_or_default();
        let bucket = |d: u32, label: &str, total_r: f64, trade_count: usize| DayBucket {
            date: day(12, d),
            label: label.to_string(),
            total_r,
            trade_count,
        };
        let history = |d: u32,
                       status: BiasStatus,
                       morning_bias: Option<Bias>,
                       day_direction: Option<DayDirection>| BiasHistoryEntry {
            date: day(12, d),
            morning_bias,
            day_direction,
            status,
        };
        let recent = |id: &str, d: u32, symbol: &str, result_r: f64| RecentTrade {
            id: id.to_string(),
            date: day(12, d),
            symbol: symbol.to_string(),
            result_r,
        };

        use Bias::{Long, Neutral, Short};
        use BiasStatus::{Hit, Miss, NoData};
        use DayDirection::{Chop, Down, Up};

        Self {
            days: vec![
                bucket(8, "Mon", 2.5, 3),
                bucket(9, "Tue", -1.0, 2),
                bucket(10, "Wed", 4.2, 4),
                bucket(11, "Thu", 1.5, 2),
                bucket(12, "Fri", 0.0, 0),
                bucket(13, "Sat", 0.0, 0),
                bucket(14, "Sun", 0.0, 0),
            ],
            total_r: 7.2,
            total_trades: 11,
            win_rate: Some(63.6),
            avg_r_per_trade: Some(0.65),
            bias_accuracy: Some(80.0),
            bias_history: vec![
                history(1, Hit, Some(Long), Some(Up)),
                history(2, Miss, Some(Short), Some(Up)),
                history(3, Hit, Some(Long), Some(Up)),
                history(4, Hit, Some(Neutral), Some(Chop)),
                history(5, BiasStatus::Neutral, Some(Neutral), Some(Chop)),
                history(6, Hit, Some(Short), Some(Down)),
                history(7, NoData, None, None),
                history(8, Hit, Some(Long), Some(Up)),
                history(9, Miss, Some(Long), Some(Down)),
                history(10, Hit, Some(Short), Some(Down)),
            ],
            recent_trades: vec![
                recent("d1", 11, "XAUUSD", 1.5),
                recent("d2", 10, "EURUSD", 2.2),
                recent("d3", 10, "GBPUSD", 2.0),
                recent("d4", 9, "XAUUSD", -1.0),
                recent("d5", 8, "NQ1!", 3.5),
            ],
        }
    }
}

fn round_dp(x: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (x * factor).round() / factor
}

pub struct DashboardBuilder {
    pub min_trades: usize,
    pub recent_limit: usize,
    pub scorer: BiasScorer,
}

impl DashboardBuilder {
    pub fn new(cfg: &Config) -> Self {
        Self {
            min_trades: cfg.dashboard_min_trades,
            recent_limit: cfg.recent_trades_limit,
            scorer: BiasScorer::from_config(cfg),
        }
    }

    /// Build from collaborator results. Any failed load degrades the whole
    /// dashboard to [`SummaryPayload::empty`].
    pub fn build_from_results<E: Display>(
        &self,
        trades: Result<Vec<Trade>, E>,
        morning: Result<Vec<MorningBiasSnapshot>, E>,
        eods: Result<Vec<EodRecord>, E>,
        today: NaiveDate,
    ) -> SummaryPayload {
        match (trades, morning, eods) {
            (Ok(trades), Ok(morning), Ok(eods)) => self.build(&trades, &morning, &eods, today),
            (trades, morning, eods) => {
                let errors = [trades.err(), morning.err(), eods.err()];
                for e in errors.iter().flatten() {
                    warn!("Dashboard build failed: {}", e);
                }
                SummaryPayload::empty()
            }
        }
    }

    pub fn build(
        &self,
        trades: &[Trade],
        morning: &[MorningBiasSnapshot],
        eods: &[EodRecord],
        today: NaiveDate,
    ) -> SummaryPayload {
        if trades.len() < self.min_trades {
            debug!(
                "Only {} trade(s) recorded, showing placeholder dashboard",
                trades.len()
            );
            return SummaryPayload::placeholder();
        }

        // Current week
        let week = bucket_by_date(trades, DateRange::current_week(today));
        let mut days = Vec::with_capacity(week.days.len());
        let mut total_r = 0.0;
        let mut total_trades = 0;
        let mut wins = 0;

        for (date, day_trades) in week.iter() {
            let results: Vec<f64> = day_trades.iter().filter_map(|t| t.result_r).collect();
            let day_r: f64 = results.iter().sum();
            wins += results.iter().filter(|r| **r > 0.0).count();
            total_r += day_r;
            total_trades += results.len();
            days.push(DayBucket {
                date,
                label: day_label(date),
                total_r: day_r,
                trade_count: results.len(),
            });
        }

        let (win_rate, avg_r_per_trade) = if total_trades > 0 {
            (
                Some(round_dp(wins as f64 / total_trades as f64 * 100.0, 1)),
                Some(round_dp(total_r / total_trades as f64, 2)),
            )
        } else {
            (None, None)
        };

        // Trailing bias window
        let history = self.scorer.history(morning, eods, today);
        let bias_accuracy = history.accuracy.map(|a| round_dp(a * 100.0, 1));

        SummaryPayload {
            days,
            total_r,
            total_trades,
            win_rate,
            avg_r_per_trade,
            bias_accuracy,
            bias_history: history.entries,
            recent_trades: self.recent_trades(trades),
        }
    }

    /// Newest trades across all time. Same-day trades are ordered newest
    /// entry first since the journal keeps no time of day for sorting.
    fn recent_trades(&self, trades: &[Trade]) -> Vec<RecentTrade> {
        let mut candidates: Vec<(usize, NaiveDate, f64, &Trade)> = trades
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.id.is_empty())
            .filter_map(|(i, t)| Some((i, t.date?, t.result_r?, t)))
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        candidates
            .into_iter()
            .take(self.recent_limit)
            .map(|(_, date, result_r, t)| RecentTrade {
                id: t.id.clone(),
                date,
                symbol: if t.symbol.is_empty() {
                    "?".to_string()
                } else {
                    t.symbol.clone()
                },
                result_r,
            })
            .collect()
    }
}
