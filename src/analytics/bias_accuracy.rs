use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analytics::date_bucketer::DateRange;
use crate::config::Config;
use crate::models::{Bias, BiasStatus, DayDirection, Dated, EodRecord, MorningBiasSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasHistoryEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_bias: Option<Bias>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_direction: Option<DayDirection>,
    pub status: BiasStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiasHistory {
    /// Oldest day first, one entry per day of the window.
    pub entries: Vec<BiasHistoryEntry>,
    pub hits: usize,
    pub misses: usize,
    /// hits / (hits + misses); `None` when no day could be scored.
    pub accuracy: Option<f64>,
}

/// Score a day from its two journal entries, either of which may be missing.
pub fn classify(morning: Option<&MorningBiasSnapshot>, eod: Option<&EodRecord>) -> BiasStatus {
    match (morning, eod) {
        (None, None) => BiasStatus::NoData,
        (Some(m), Some(e)) => classify_call(m.main_bias, e.day_direction),
        _ => BiasStatus::Neutral,
    }
}

/// Score a bias against a direction when both records exist.
pub fn classify_call(bias: Option<Bias>, direction: Option<DayDirection>) -> BiasStatus {
    match (bias, direction) {
        (Some(Bias::Long), Some(DayDirection::Up))
        | (Some(Bias::Short), Some(DayDirection::Down)) => BiasStatus::Hit,
        (Some(Bias::Long | Bias::Short), Some(_)) => BiasStatus::Miss,
        _ => BiasStatus::Neutral,
    }
}

/// Index records by day; a later record for the same day replaces an earlier one.
fn index_by_date<T: Dated>(records: &[T]) -> HashMap<NaiveDate, &T> {
    let mut out = HashMap::new();
    for r in records {
        if let Some(date) = r.date() {
            out.insert(date, r);
        }
    }
    out
}

pub struct BiasScorer {
    pub history_days: usize,
}

impl BiasScorer {
    pub fn new(history_days: usize) -> Self {
        Self { history_days }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.bias_history_days)
    }

    pub fn window(&self, today: NaiveDate) -> DateRange {
        DateRange::trailing(today, self.history_days)
    }

    /// Score every day of the trailing window ending at `today`.
    pub fn history(
        &self,
        morning: &[MorningBiasSnapshot],
        eods: &[EodRecord],
        today: NaiveDate,
    ) -> BiasHistory {
        let morning_by_date = index_by_date(morning);
        let eod_by_date = index_by_date(eods);

        let mut hits = 0;
        let mut misses = 0;
        let entries: Vec<BiasHistoryEntry> = self
            .window(today)
            .days()
            .map(|date| {
                let m = morning_by_date.get(&date).copied();
                let e = eod_by_date.get(&date).copied();
                let status = classify(m, e);
                if status.is_scored() {
                    if status == BiasStatus::Hit {
                        hits += 1;
                    } else {
                        misses += 1;
                    }
                }
                BiasHistoryEntry {
                    date,
                    morning_bias: m.and_then(|m| m.main_bias),
                    day_direction: e.and_then(|e| e.day_direction),
                    status,
                }
            })
            .collect();

        let scored = hits + misses;
        let accuracy = if scored > 0 {
            Some(hits as f64 / scored as f64)
        } else {
            None
        };

        BiasHistory {
            entries,
            hits,
            misses,
            accuracy,
        }
    }
}
