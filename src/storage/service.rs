use tracing::info;

use crate::analytics::{DashboardBuilder, SummaryPayload};
use crate::config::Config;
use crate::storage::JournalSource;

/// Loads the journal collections and assembles the dashboard summary.
pub struct DashboardService<S: JournalSource> {
    source: S,
    builder: DashboardBuilder,
    cfg: Config,
}

impl<S: JournalSource> DashboardService<S> {
    pub fn new(source: S, cfg: Config) -> Self {
        Self {
            source,
            builder: DashboardBuilder::new(&cfg),
            cfg,
        }
    }

    /// Never fails: a load error is logged and yields an empty summary.
    pub async fn summary(&self) -> SummaryPayload {
        let today = self.cfg.today();
        let window = self.builder.scorer.window(today);

        let (trades, morning, eods) = tokio::join!(
            self.source.load_all_trades(),
            self.source.load_morning_bias(window),
            self.source.load_eod_records(window),
        );

        let payload = self.builder.build_from_results(trades, morning, eods, today);
        info!(
            "Dashboard for week of {}: {} trade(s), {:+.2}R",
            payload
                .days
                .first()
                .map(|d| d.date.to_string())
                .unwrap_or_else(|| "-".to_string()),
            payload.total_trades,
            payload.total_r
        );
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::DateRange;
    use crate::models::{Bias, DayDirection, EodRecord, MorningBiasSnapshot, Trade};
    use crate::storage::StoreError;
    use crate::test_helpers::{default_test_config, eod, morning, trade};
    use async_trait::async_trait;

    struct MemorySource {
        trades: Vec<Trade>,
        morning: Vec<MorningBiasSnapshot>,
        eods: Vec<EodRecord>,
        fail_eods: bool,
    }

    #[async_trait]
    impl JournalSource for MemorySource {
        async fn load_all_trades(&self) -> Result<Vec<Trade>, StoreError> {
            Ok(self.trades.clone())
        }

        async fn load_morning_bias(
            &self,
            range: DateRange,
        ) -> Result<Vec<MorningBiasSnapshot>, StoreError> {
            Ok(self
                .morning
                .iter()
                .filter(|m| m.date.is_some_and(|d| range.contains(d)))
                .cloned()
                .collect())
        }

        async fn load_eod_records(&self, range: DateRange) -> Result<Vec<EodRecord>, StoreError> {
            if self.fail_eods {
                return Err(StoreError::Invalid {
                    kind: "eod review",
                    reason: "disk unplugged".to_string(),
                });
            }
            Ok(self
                .eods
                .iter()
                .filter(|e| e.date.is_some_and(|d| range.contains(d)))
                .cloned()
                .collect())
        }
    }

    fn source(fail_eods: bool) -> MemorySource {
        MemorySource {
            trades: vec![
                trade("1", "2025-01-06", "EURUSD", 2.0),
                trade("2", "2025-01-07", "GBPUSD", -1.0),
                trade("3", "2024-12-30", "EURUSD", 1.0),
            ],
            morning: vec![morning("2025-01-06", Bias::Long), morning("2025-01-07", Bias::Long)],
            eods: vec![
                eod("2025-01-06", DayDirection::Up),
                eod("2025-01-07", DayDirection::Down),
            ],
            fail_eods,
        }
    }

    #[tokio::test]
    async fn builds_summary_from_source() {
        let svc = DashboardService::new(source(false), default_test_config("2025-01-08"));
        let p = svc.summary().await;
        assert_eq!(p.days.len(), 7);
        assert_eq!(p.total_trades, 2);
        assert_eq!(p.total_r, 1.0);
        assert_eq!(p.win_rate, Some(50.0));
        assert_eq!(p.bias_accuracy, Some(50.0));
        assert_eq!(p.recent_trades.len(), 3);
        assert_eq!(p.recent_trades[0].id, "2");
    }

    #[tokio::test]
    async fn failed_load_degrades_to_empty() {
        let svc = DashboardService::new(source(true), default_test_config("2025-01-08"));
        assert_eq!(svc.summary().await, SummaryPayload::empty());
    }
}
