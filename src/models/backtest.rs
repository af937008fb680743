use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::direction::{Direction, Outcome};
use crate::models::lenient;
use crate::models::records::Dated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Backtesting,
    #[serde(rename = "Prop Firm")]
    PropFirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestSession {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub balance: f64,
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub creation_date: String,
    pub status: SessionStatus,
    /// Percent of balance, e.g. `10.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_loss: Option<f64>,
    /// Minutes spent on the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_invested: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields supplied when creating a session; id, creation date and status are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBacktestSession {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub balance: f64,
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub profit_target: Option<f64>,
    #[serde(default)]
    pub max_daily_loss: Option<f64>,
    #[serde(default)]
    pub max_total_loss: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestTrade {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub session_id: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient::variant")]
    pub direction: Option<Direction>,
    #[serde(default, deserialize_with = "lenient::variant")]
    pub outcome: Option<Outcome>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    #[serde(
        rename = "resultR",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_r: Option<f64>,
    /// Chart links and other fields the report does not read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BacktestTrade {
    /// Recorded R, falling back to the outcome's nominal R.
    pub fn effective_r(&self) -> f64 {
        self.result_r
            .or_else(|| self.outcome.map(Outcome::default_r))
            .unwrap_or(0.0)
    }
}

impl Dated for BacktestTrade {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}
