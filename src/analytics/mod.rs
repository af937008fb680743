pub mod achievements;
pub mod backtest;
pub mod bias_accuracy;
pub mod calendar;
pub mod dashboard;
pub mod date_bucketer;
pub mod performance;

pub use achievements::{achievement_totals, AchievementTotals};
pub use backtest::SessionReport;
pub use bias_accuracy::{BiasHistory, BiasHistoryEntry, BiasScorer};
pub use calendar::{month_view, parse_month_key, CalendarDay, MonthView};
pub use dashboard::{DashboardBuilder, SummaryPayload};
pub use date_bucketer::{bucket_by_date, DateBuckets, DateRange};
pub use performance::PerformanceReport;
