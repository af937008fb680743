use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::analytics::date_bucketer::{bucket_by_date, day_label, DateRange};
use crate::models::Trade;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPnlPoint {
    pub date: NaiveDate,
    pub total_r: f64,
    pub cumulative_r: f64,
}

/// Win/loss tallies for one bucket of trades. Breakeven trades count toward
/// `trades` only; trades without a result are left out of the R sums.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfStats {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub avg_r: f64,
    pub total_r: f64,
}

impl PerfStats {
    fn record(&mut self, trade: &Trade) {
        self.trades += 1;
        if let Some(r) = trade.result_r {
            self.total_r += r;
            if r > 0.0 {
                self.wins += 1;
            } else if r < 0.0 {
                self.losses += 1;
            }
        }
    }

    fn finish(mut self) -> Self {
        self.win_rate = ratio(self.wins as f64, self.trades);
        self.avg_r = ratio(self.total_r, self.trades);
        self
    }

    fn from_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut stats = PerfStats::default();
        for t in trades {
            stats.record(t);
        }
        stats.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolStats {
    pub symbol: String,
    #[serde(flatten)]
    pub stats: PerfStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayStats {
    /// 0 = Monday .. 6 = Sunday
    pub weekday_index: u32,
    pub weekday_label: String,
    #[serde(flatten)]
    pub stats: PerfStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub date: NaiveDate,
    pub label: String,
    #[serde(flatten)]
    pub stats: PerfStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_trades: usize,
    pub total_r: f64,
    pub avg_r: f64,
    pub win_rate: f64,
}

/// `numerator / count`, or 0 when there is nothing to divide by.
pub fn ratio(numerator: f64, count: usize) -> f64 {
    if count > 0 {
        numerator / count as f64
    } else {
        0.0
    }
}

/// Per-day R totals with a running cumulative sum, oldest day first.
pub fn daily_pnl(trades: &[Trade]) -> Vec<DailyPnlPoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in trades {
        let Some(date) = t.date else { continue };
        *by_date.entry(date).or_insert(0.0) += t.result_r.unwrap_or(0.0);
    }

    let mut cumulative = 0.0;
    by_date
        .into_iter()
        .map(|(date, total_r)| {
            cumulative += total_r;
            DailyPnlPoint {
                date,
                total_r,
                cumulative_r: cumulative,
            }
        })
        .collect()
}

/// Stats per upper-cased symbol, most traded first. Equal counts keep the
/// order in which symbols were first seen.
pub fn symbol_stats(trades: &[Trade]) -> Vec<SymbolStats> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, PerfStats> = HashMap::new();

    for t in trades {
        let Some(key) = t.symbol_key() else { continue };
        buckets
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                PerfStats::default()
            })
            .record(t);
    }

    let mut out: Vec<SymbolStats> = order
        .into_iter()
        .filter_map(|symbol| {
            let stats = buckets.remove(&symbol)?.finish();
            Some(SymbolStats { symbol, stats })
        })
        .collect();
    out.sort_by(|a, b| b.stats.trades.cmp(&a.stats.trades));
    out
}

/// Seven rows, Monday first, including weekdays without trades.
pub fn weekday_stats(trades: &[Trade]) -> Vec<WeekdayStats> {
    let mut buckets: [PerfStats; 7] = Default::default();
    for t in trades {
        let Some(date) = t.date else { continue };
        buckets[date.weekday().num_days_from_monday() as usize].record(t);
    }

    WEEK.iter()
        .zip(buckets)
        .map(|(day, stats)| WeekdayStats {
            weekday_index: day.num_days_from_monday(),
            weekday_label: day.to_string(),
            stats: stats.finish(),
        })
        .collect()
}

/// One row per day of `range`, empty days included.
pub fn day_stats(trades: &[Trade], range: DateRange) -> Vec<DayStats> {
    let buckets = bucket_by_date(trades, range);
    buckets
        .iter()
        .map(|(date, day_trades)| DayStats {
            date,
            label: day_label(date),
            stats: PerfStats::from_trades(day_trades.iter().copied()),
        })
        .collect()
}

pub fn summarize(trades: &[Trade]) -> PerformanceSummary {
    let stats = PerfStats::from_trades(trades);
    PerformanceSummary {
        total_trades: stats.trades,
        total_r: stats.total_r,
        avg_r: stats.avg_r,
        win_rate: stats.win_rate,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub summary: PerformanceSummary,
    pub daily_pnl: Vec<DailyPnlPoint>,
    pub symbols: Vec<SymbolStats>,
    pub weekdays: Vec<WeekdayStats>,
}

impl PerformanceReport {
    pub fn from_trades(trades: &[Trade]) -> Self {
        Self {
            summary: summarize(trades),
            daily_pnl: daily_pnl(trades),
            symbols: symbol_stats(trades),
            weekdays: weekday_stats(trades),
        }
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(70));
        println!("  PERFORMANCE REPORT");
        println!("{}", "=".repeat(70));
        println!("  Trades:      {}", self.summary.total_trades);
        println!("  Total R:     {:+.2}", self.summary.total_r);
        println!("  Avg R:       {:+.2}", self.summary.avg_r);
        println!("  Win Rate:    {:.1}%", self.summary.win_rate * 100.0);
        if let (Some(first), Some(last)) = (self.daily_pnl.first(), self.daily_pnl.last()) {
            println!(
                "  Period:      {} to {} ({} trading days)",
                first.date,
                last.date,
                self.daily_pnl.len()
            );
        }

        if !self.symbols.is_empty() {
            println!();
            println!("  BY SYMBOL");
            println!("  ───────────────────────────────────");
            for s in &self.symbols {
                println!(
                    "  {:>8}: {} trades | W/L {}/{} | WR {:.0}% | R {:+.2} | Avg {:+.2}",
                    s.symbol,
                    s.stats.trades,
                    s.stats.wins,
                    s.stats.losses,
                    s.stats.win_rate * 100.0,
                    s.stats.total_r,
                    s.stats.avg_r
                );
            }
        }

        println!();
        println!("  BY WEEKDAY");
        println!("  ───────────────────────────────────");
        for w in &self.weekdays {
            println!(
                "  {:>4}: {} trades | WR {:.0}% | R {:+.2}",
                w.weekday_label,
                w.stats.trades,
                w.stats.win_rate * 100.0,
                w.stats.total_r
            );
        }
        println!("{}", "=".repeat(70));
    }
}
