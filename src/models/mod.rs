pub mod achievement;
pub mod backtest;
pub mod direction;
pub mod lenient;
pub mod records;

pub use achievement::{Achievement, AchievementKind};
pub use backtest::{BacktestSession, BacktestTrade, NewBacktestSession, SessionKind, SessionStatus};
pub use direction::*;
pub use records::{Dated, EodRecord, MorningBiasSnapshot, Trade};
