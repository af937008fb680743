use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analytics::DateRange;
use crate::config::Config;
use crate::models::lenient::parse_date;
use crate::models::{
    Achievement, BacktestSession, BacktestTrade, EodRecord, MorningBiasSnapshot, NewBacktestSession,
    SessionStatus, Trade,
};
use crate::storage::{JournalSource, StoreError};

const TRADES_FILE: &str = "trades.json";
const MORNING_FILE: &str = "morning_bias.json";
const EOD_FILE: &str = "eod_reviews.json";
const SESSIONS_FILE: &str = "backtest_sessions.json";
const BACKTESTS_FILE: &str = "backtests.json";
const ACHIEVEMENTS_FILE: &str = "achievements.json";

/// EOD reviews are kept as an object keyed by date; older files hold a plain list.
#[derive(Deserialize)]
#[serde(untagged)]
enum EodFile {
    ByDate(BTreeMap<String, EodRecord>),
    List(Vec<EodRecord>),
}

impl Default for EodFile {
    fn default() -> Self {
        EodFile::List(Vec::new())
    }
}

impl EodFile {
    fn into_records(self) -> Vec<EodRecord> {
        match self {
            EodFile::List(records) => records,
            EodFile::ByDate(map) => map
                .into_iter()
                .map(|(key, mut record)| {
                    if record.date.is_none() {
                        record.date = parse_date(&key);
                    }
                    record
                })
                .collect(),
        }
    }
}

/// Journal persisted as one JSON document per collection under a data
/// directory. Every write rewrites the whole document; the last writer wins.
#[derive(Debug, Clone)]
pub struct JsonJournalStore {
    data_dir: PathBuf,
}

impl JsonJournalStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Missing or blank files read as an empty collection.
    async fn read_json<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StoreError> {
        let path = self.path(file);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, starting empty", path.display());
                return Ok(T::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: path.display().to_string(),
            source,
        })
    }

    async fn write_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let path = self.path(file);
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.display().to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(io_err)?;
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Corrupt {
            path: path.display().to_string(),
            source,
        })?;
        tokio::fs::write(&path, json).await.map_err(io_err)
    }

    // --- Trades ---

    pub async fn load_trades(&self) -> Result<Vec<Trade>, StoreError> {
        self.read_json(TRADES_FILE).await
    }

    async fn save_trades(&self, trades: &[Trade]) -> Result<(), StoreError> {
        self.write_json(TRADES_FILE, trades).await
    }

    /// Append a trade. A blank id is replaced with a fresh one; a taken id is rejected.
    pub async fn add_trade(&self, mut trade: Trade) -> Result<Trade, StoreError> {
        let mut trades = self.load_trades().await?;
        if trade.id.is_empty() {
            trade.id = Uuid::new_v4().to_string();
        } else if trades.iter().any(|t| t.id == trade.id) {
            return Err(StoreError::DuplicateId {
                kind: "trade",
                id: trade.id,
            });
        }
        trades.push(trade.clone());
        self.save_trades(&trades).await?;
        info!("Saved trade {} ({} total)", trade.id, trades.len());
        Ok(trade)
    }

    pub async fn update_trade(&self, trade: Trade) -> Result<(), StoreError> {
        let mut trades = self.load_trades().await?;
        let slot = trades
            .iter_mut()
            .find(|t| t.id == trade.id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "trade",
                id: trade.id.clone(),
            })?;
        *slot = trade;
        self.save_trades(&trades).await
    }

    /// Returns whether a trade was removed.
    pub async fn delete_trade(&self, id: &str) -> Result<bool, StoreError> {
        let mut trades = self.load_trades().await?;
        let before = trades.len();
        trades.retain(|t| t.id != id);
        if trades.len() == before {
            return Ok(false);
        }
        self.save_trades(&trades).await?;
        info!("Deleted trade {}", id);
        Ok(true)
    }

    pub async fn trades_for_month(&self, year: i32, month: u32) -> Result<Vec<Trade>, StoreError> {
        let range = month_range(year, month)?;
        let trades = self.load_trades().await?;
        Ok(trades
            .into_iter()
            .filter(|t| t.date.is_some_and(|d| range.contains(d)))
            .collect())
    }

    // --- Morning bias ---

    pub async fn load_morning(&self) -> Result<Vec<MorningBiasSnapshot>, StoreError> {
        self.read_json(MORNING_FILE).await
    }

    /// Insert or replace the snapshot for its date.
    pub async fn save_morning_bias(&self, snapshot: MorningBiasSnapshot) -> Result<(), StoreError> {
        let date = snapshot.date.ok_or_else(|| StoreError::Invalid {
            kind: "morning bias",
            reason: "missing date".to_string(),
        })?;
        let mut all = self.load_morning().await?;
        match all.iter_mut().find(|m| m.date == Some(date)) {
            Some(existing) => *existing = snapshot,
            None => all.push(snapshot),
        }
        self.write_json(MORNING_FILE, &all).await?;
        info!("Saved morning bias for {}", date);
        Ok(())
    }

    pub async fn morning_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<MorningBiasSnapshot>, StoreError> {
        let all = self.load_morning().await?;
        Ok(all.into_iter().rev().find(|m| m.date == Some(date)))
    }

    // --- End-of-day reviews ---

    pub async fn load_eods(&self) -> Result<Vec<EodRecord>, StoreError> {
        let file: EodFile = self.read_json(EOD_FILE).await?;
        Ok(file.into_records())
    }

    /// Insert or replace the review for its date. The file is always written
    /// keyed by date; undated records in an old list-shaped file are dropped.
    pub async fn save_eod_record(&self, record: EodRecord) -> Result<(), StoreError> {
        let date = record.date.ok_or_else(|| StoreError::Invalid {
            kind: "eod review",
            reason: "missing date".to_string(),
        })?;
        let existing = self.load_eods().await?;
        let total = existing.len();
        let mut by_date: BTreeMap<String, EodRecord> = existing
            .into_iter()
            .filter_map(|r| Some((r.date?.to_string(), r)))
            .collect();
        let dropped = total - by_date.len();
        if dropped > 0 {
            warn!(
                "Dropping {} undated or duplicate EOD review(s) while rewriting {}",
                dropped, EOD_FILE
            );
        }
        by_date.insert(date.to_string(), record);
        self.write_json(EOD_FILE, &by_date).await?;
        info!("Saved EOD review for {}", date);
        Ok(())
    }

    pub async fn eod_for_date(&self, date: NaiveDate) -> Result<Option<EodRecord>, StoreError> {
        let all = self.load_eods().await?;
        Ok(all.into_iter().rev().find(|e| e.date == Some(date)))
    }

    pub async fn eod_for_month(&self, year: i32, month: u32) -> Result<Vec<EodRecord>, StoreError> {
        let range = month_range(year, month)?;
        let all = self.load_eods().await?;
        Ok(all
            .into_iter()
            .filter(|e| e.date.is_some_and(|d| range.contains(d)))
            .collect())
    }

    // --- Backtest sessions ---

    pub async fn load_sessions(&self) -> Result<Vec<BacktestSession>, StoreError> {
        self.read_json(SESSIONS_FILE).await
    }

    pub async fn session(&self, id: &str) -> Result<BacktestSession, StoreError> {
        self.load_sessions()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "session",
                id: id.to_string(),
            })
    }

    pub async fn add_session(&self, new: NewBacktestSession) -> Result<BacktestSession, StoreError> {
        let mut sessions = self.load_sessions().await?;
        let session = BacktestSession {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            kind: new.kind,
            balance: new.balance,
            assets: new.assets,
            start_date: new.start_date,
            end_date: new.end_date,
            creation_date: Utc::now().to_rfc3339(),
            status: SessionStatus::Active,
            profit_target: new.profit_target,
            max_daily_loss: new.max_daily_loss,
            max_total_loss: new.max_total_loss,
            time_invested: None,
            extra: Default::default(),
        };
        sessions.push(session.clone());
        self.write_json(SESSIONS_FILE, &sessions).await?;
        info!("Created backtest session {} ({})", session.name, session.id);
        Ok(session)
    }

    pub async fn update_session(&self, session: BacktestSession) -> Result<(), StoreError> {
        let mut sessions = self.load_sessions().await?;
        let slot = sessions
            .iter_mut()
            .find(|s| s.id == session.id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "session",
                id: session.id.clone(),
            })?;
        *slot = session;
        self.write_json(SESSIONS_FILE, &sessions).await
    }

    /// Remove a session together with its trades. Returns whether it existed.
    pub async fn delete_session(&self, id: &str) -> Result<bool, StoreError> {
        let mut sessions = self.load_sessions().await?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.write_json(SESSIONS_FILE, &sessions).await?;

        let mut trades = self.load_backtests().await?;
        let trades_before = trades.len();
        trades.retain(|t| t.session_id != id);
        self.write_json(BACKTESTS_FILE, &trades).await?;
        info!(
            "Deleted session {} and {} backtest trade(s)",
            id,
            trades_before - trades.len()
        );
        Ok(true)
    }

    // --- Backtest trades ---

    pub async fn load_backtests(&self) -> Result<Vec<BacktestTrade>, StoreError> {
        self.read_json(BACKTESTS_FILE).await
    }

    pub async fn backtests_for_session(&self, session_id: &str) -> Result<Vec<BacktestTrade>, StoreError> {
        let trades = self.load_backtests().await?;
        Ok(trades
            .into_iter()
            .filter(|t| t.session_id == session_id)
            .collect())
    }

    pub async fn add_backtest(&self, mut trade: BacktestTrade) -> Result<BacktestTrade, StoreError> {
        self.session(&trade.session_id).await?;
        let mut trades = self.load_backtests().await?;
        if trade.id.is_empty() {
            trade.id = Uuid::new_v4().to_string();
        } else if trades.iter().any(|t| t.id == trade.id) {
            return Err(StoreError::DuplicateId {
                kind: "backtest trade",
                id: trade.id,
            });
        }
        trades.push(trade.clone());
        self.write_json(BACKTESTS_FILE, &trades).await?;
        Ok(trade)
    }

    pub async fn update_backtest(&self, trade: BacktestTrade) -> Result<(), StoreError> {
        let mut trades = self.load_backtests().await?;
        let slot = trades
            .iter_mut()
            .find(|t| t.id == trade.id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "backtest trade",
                id: trade.id.clone(),
            })?;
        *slot = trade;
        self.write_json(BACKTESTS_FILE, &trades).await
    }

    pub async fn delete_backtest(&self, id: &str) -> Result<bool, StoreError> {
        let mut trades = self.load_backtests().await?;
        let before = trades.len();
        trades.retain(|t| t.id != id);
        if trades.len() == before {
            return Ok(false);
        }
        self.write_json(BACKTESTS_FILE, &trades).await?;
        Ok(true)
    }

    // --- Achievements ---

    pub async fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError> {
        self.read_json(ACHIEVEMENTS_FILE).await
    }

    /// Append an achievement, assigning an id when blank.
    pub async fn add_achievement(&self, mut item: Achievement) -> Result<Achievement, StoreError> {
        let mut all = self.load_achievements().await?;
        if item.id.is_empty() {
            item.id = Uuid::new_v4().to_string();
        } else if all.iter().any(|a| a.id == item.id) {
            return Err(StoreError::DuplicateId {
                kind: "achievement",
                id: item.id,
            });
        }
        all.push(item.clone());
        self.write_json(ACHIEVEMENTS_FILE, &all).await?;
        info!("Saved achievement {} ({})", item.title, item.firm);
        Ok(item)
    }

    pub async fn remove_achievement(&self, id: &str) -> Result<bool, StoreError> {
        let mut all = self.load_achievements().await?;
        let before = all.len();
        all.retain(|a| a.id != id);
        if all.len() == before {
            return Ok(false);
        }
        self.write_json(ACHIEVEMENTS_FILE, &all).await?;
        info!("Removed achievement {}", id);
        Ok(true)
    }
}

fn month_range(year: i32, month: u32) -> Result<DateRange, StoreError> {
    DateRange::month(year, month).ok_or_else(|| StoreError::Invalid {
        kind: "month",
        reason: format!("{}-{:02}", year, month),
    })
}

#[async_trait]
impl JournalSource for JsonJournalStore {
    async fn load_all_trades(&self) -> Result<Vec<Trade>, StoreError> {
        self.load_trades().await
    }

    async fn load_morning_bias(
        &self,
        range: DateRange,
    ) -> Result<Vec<MorningBiasSnapshot>, StoreError> {
        let all = self.load_morning().await?;
        Ok(all
            .into_iter()
            .filter(|m| m.date.is_some_and(|d| range.contains(d)))
            .collect())
    }

    async fn load_eod_records(&self, range: DateRange) -> Result<Vec<EodRecord>, StoreError> {
        let all = self.load_eods().await?;
        Ok(all
            .into_iter()
            .filter(|e| e.date.is_some_and(|d| range.contains(d)))
            .collect())
    }
}
