use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::direction::{Bias, DayDirection, Direction, Outcome, ReviewStatus};
use crate::models::lenient;

/// Anything keyed by a calendar day.
pub trait Dated {
    fn date(&self) -> Option<NaiveDate>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub symbol: String,
    #[serde(
        rename = "dir",
        alias = "direction",
        default,
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub direction: Option<Direction>,
    #[serde(
        rename = "resultR",
        alias = "resultInR",
        default,
        deserialize_with = "lenient::number"
    )]
    pub result_r: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub outcome: Option<Outcome>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<ReviewStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Trade {
    pub fn new(id: &str, date: NaiveDate, symbol: &str, result_r: f64) -> Self {
        Self {
            id: id.to_string(),
            date: Some(date),
            symbol: symbol.to_string(),
            direction: None,
            result_r: Some(result_r),
            outcome: None,
            time: None,
            status: None,
            extra: Map::new(),
        }
    }

    /// Grouping key for per-symbol statistics: trimmed and upper-cased.
    /// `None` for trades without a symbol.
    pub fn symbol_key(&self) -> Option<String> {
        let key = self.symbol.trim().to_uppercase();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

impl Dated for Trade {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// The morning directional call. One per date; saving again replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorningBiasSnapshot {
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::variant")]
    pub main_bias: Option<Bias>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MorningBiasSnapshot {
    pub fn new(date: NaiveDate, main_bias: Bias) -> Self {
        Self {
            date: Some(date),
            main_bias: Some(main_bias),
            extra: Map::new(),
        }
    }
}

impl Dated for MorningBiasSnapshot {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// End-of-day review. One per date; saving again replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EodRecord {
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::variant")]
    pub day_direction: Option<DayDirection>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub real_day_bias: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub diary: Option<String>,
    /// Other review fields (trade summary, screenshots) are carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EodRecord {
    pub fn new(date: NaiveDate, day_direction: DayDirection) -> Self {
        Self {
            date: Some(date),
            day_direction: Some(day_direction),
            real_day_bias: None,
            diary: None,
            extra: Map::new(),
        }
    }
}

impl Dated for EodRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_hand_edited_trade() {
        let raw = r#"{
            "id": 42,
            "date": "2025-12-11T09:30:00Z",
            "symbol": "xauusd",
            "dir": "long",
            "resultR": 1.5,
            "outcome": "tp",
            "time": "09:30",
            "status": "Reviewed"
        }"#;
        let t: Trade = serde_json::from_str(raw).unwrap();
        assert_eq!(t.id, "42");
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 12, 11));
        assert_eq!(t.symbol_key().as_deref(), Some("XAUUSD"));
        assert_eq!(t.direction, Some(Direction::Long));
        assert_eq!(t.result_r, Some(1.5));
        assert_eq!(t.outcome, Some(Outcome::Tp));
    }

    #[test]
    fn malformed_fields_become_absent() {
        let raw = r#"{ "id": "a", "date": "not a date", "resultR": "1.5", "dir": 7 }"#;
        let t: Trade = serde_json::from_str(raw).unwrap();
        assert_eq!(t.date, None);
        assert_eq!(t.result_r, None);
        assert_eq!(t.direction, None);
        assert_eq!(t.symbol_key(), None);
    }

    #[test]
    fn accepts_result_in_r_alias() {
        let t: Trade = serde_json::from_str(r#"{ "resultInR": -0.5 }"#).unwrap();
        assert_eq!(t.result_r, Some(-0.5));
    }

    #[test]
    fn trade_dates_serialize_as_day_keys() {
        let t = Trade::new("x", NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), "EURUSD", 1.0);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["date"], "2025-01-06");
        assert_eq!(json["resultR"], 1.0);
    }

    #[test]
    fn eod_direction_is_case_insensitive() {
        let e: EodRecord =
            serde_json::from_str(r#"{ "date": "2025-01-06", "dayDirection": "up" }"#).unwrap();
        assert_eq!(e.day_direction, Some(DayDirection::Up));
        let e: EodRecord =
            serde_json::from_str(r#"{ "date": "2025-01-06", "dayDirection": null }"#).unwrap();
        assert_eq!(e.day_direction, None);
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let raw = r#"{
            "date": "2025-01-06",
            "dayDirection": "UP",
            "tradeSummary": { "longCount": 2, "shortCount": 1 }
        }"#;
        let e: EodRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(e.extra["tradeSummary"]["longCount"], 2);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["tradeSummary"]["shortCount"], 1);
        assert_eq!(json["dayDirection"], "UP");

        let t: Trade =
            serde_json::from_str(r#"{ "id": "a", "direction": "Short", "screenshot": "a.png" }"#).unwrap();
        assert_eq!(t.direction, Some(Direction::Short));
        assert!(!t.extra.contains_key("direction"));
        assert_eq!(serde_json::to_value(&t).unwrap()["screenshot"], "a.png");
    }
}
