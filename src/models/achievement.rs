use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::models::direction::UnknownVariant;
use crate::models::lenient;

/// What an achievement records. Entries written before the kind existed are accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    Account,
    Payout,
}

impl fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AchievementKind::Account => write!(f, "account"),
            AchievementKind::Payout => write!(f, "payout"),
        }
    }
}

impl FromStr for AchievementKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "account" => Ok(AchievementKind::Account),
            "payout" => Ok(AchievementKind::Payout),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// A funded prop-firm account or a payout received from one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub firm: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::variant",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<AchievementKind>,
    /// Account phase, e.g. "Funded". Absent on older entries.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub account_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub payout_amount: Option<f64>,
    /// Payout amount as stored by older versions.
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub payout: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Achievement {
    pub fn account(firm: &str, title: &str, account_size: f64) -> Self {
        Self {
            id: String::new(),
            firm: firm.to_string(),
            title: title.to_string(),
            kind: Some(AchievementKind::Account),
            status: Some("Funded".to_string()),
            account_size: Some(account_size),
            payout_amount: None,
            payout: None,
            currency: Some("USD".to_string()),
            date: None,
            image_url: None,
            notes: None,
            extra: Map::new(),
        }
    }

    pub fn payout(firm: &str, title: &str, amount: f64) -> Self {
        Self {
            kind: Some(AchievementKind::Payout),
            status: None,
            account_size: None,
            payout_amount: Some(amount),
            ..Self::account(firm, title, 0.0)
        }
    }

    pub fn is_payout(&self) -> bool {
        self.kind == Some(AchievementKind::Payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_legacy_entry_without_kind() {
        let raw = r#"{
            "id": "1733900000000",
            "firm": "FTMO",
            "title": "200k Challenge Passed",
            "accountSize": 200000,
            "payout": 3500,
            "currency": "USD",
            "date": "2025-12-11"
        }"#;
        let a: Achievement = serde_json::from_str(raw).unwrap();
        assert_eq!(a.kind, None);
        assert!(!a.is_payout());
        assert_eq!(a.account_size, Some(200_000.0));
        assert_eq!(a.payout, Some(3_500.0));
        assert_eq!(a.status, None);
    }

    #[test]
    fn kind_serializes_as_type() {
        let json = serde_json::to_value(Achievement::payout("Topstep", "First payout", 1_200.0)).unwrap();
        assert_eq!(json["type"], "payout");
        assert_eq!(json["payoutAmount"], 1_200.0);
        assert!(json.get("accountSize").is_none());
    }
}
