use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::models::lenient::parse_date;

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub data_dir: String,

    // Clock. `sim_date` pins "today" for replaying past weeks.
    pub timezone: Option<Tz>,
    pub sim_date: Option<NaiveDate>,

    // Dashboard windows
    pub bias_history_days: usize,
    pub recent_trades_limit: usize,
    pub dashboard_min_trades: usize,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: "data".to_string(),
            timezone: None,
            sim_date: None,
            bias_history_days: 10,
            recent_trades_limit: 10,
            dashboard_min_trades: 2,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };
        let defaults = Config::default();

        Config {
            data_dir: env("JOURNAL_DATA_DIR", &defaults.data_dir),
            timezone: std::env::var("JOURNAL_TZ")
                .ok()
                .and_then(|s| s.parse::<Tz>().ok()),
            sim_date: std::env::var("JOURNAL_SIM_DATE")
                .ok()
                .and_then(|s| parse_date(&s)),
            bias_history_days: env("BIAS_HISTORY_DAYS", "10")
                .parse()
                .unwrap_or(defaults.bias_history_days),
            recent_trades_limit: env("RECENT_TRADES_LIMIT", "10")
                .parse()
                .unwrap_or(defaults.recent_trades_limit),
            dashboard_min_trades: env("DASHBOARD_MIN_TRADES", "2")
                .parse()
                .unwrap_or(defaults.dashboard_min_trades),
            log_level: env("LOG_LEVEL", &defaults.log_level),
        }
    }

    /// The journal's "today": the simulated date if set, otherwise the
    /// wall-clock date in the configured zone (system local time by default).
    pub fn today(&self) -> NaiveDate {
        if let Some(date) = self.sim_date {
            return date;
        }
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.sim_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{d, default_test_config};

    #[test]
    fn sim_date_pins_today() {
        let cfg = default_test_config("2025-01-08");
        assert_eq!(cfg.today(), d("2025-01-08"));
        assert!(cfg.is_simulated());
    }

    #[test]
    fn timezone_today_is_a_real_date() {
        let cfg = Config {
            timezone: Some(chrono_tz::Europe::Istanbul),
            ..Config::default()
        };
        let utc_today = Utc::now().date_naive();
        let diff = (cfg.today() - utc_today).num_days().abs();
        assert!(diff <= 1);
    }

    #[test]
    fn defaults_match_dashboard_windows() {
        let cfg = Config::default();
        assert_eq!(cfg.bias_history_days, 10);
        assert_eq!(cfg.recent_trades_limit, 10);
        assert_eq!(cfg.dashboard_min_trades, 2);
    }
}
