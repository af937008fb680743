use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

/// Trade direction as entered in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Direction::Long),
            "short" | "sell" => Ok(Direction::Short),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Morning directional call for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    Long,
    Short,
    Neutral,
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bias::Long => write!(f, "Long"),
            Bias::Short => write!(f, "Short"),
            Bias::Neutral => write!(f, "Neutral"),
        }
    }
}

impl FromStr for Bias {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "bullish" => Ok(Bias::Long),
            "short" | "bearish" => Ok(Bias::Short),
            "neutral" => Ok(Bias::Neutral),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// How the day actually moved, recorded in the end-of-day review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayDirection {
    Up,
    Down,
    Chop,
}

impl fmt::Display for DayDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayDirection::Up => write!(f, "UP"),
            DayDirection::Down => write!(f, "DOWN"),
            DayDirection::Chop => write!(f, "CHOP"),
        }
    }
}

impl FromStr for DayDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(DayDirection::Up),
            "down" => Ok(DayDirection::Down),
            "chop" => Ok(DayDirection::Chop),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Tp,
    Sl,
    Be,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Tp => write!(f, "TP"),
            Outcome::Sl => write!(f, "SL"),
            Outcome::Be => write!(f, "BE"),
        }
    }
}

impl Outcome {
    /// R credited to an outcome when the trade has no recorded result.
    pub fn default_r(self) -> f64 {
        match self {
            Outcome::Tp => 2.0,
            Outcome::Sl => -1.0,
            Outcome::Be => 0.0,
        }
    }
}

impl FromStr for Outcome {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tp" | "win" => Ok(Outcome::Tp),
            "sl" | "loss" => Ok(Outcome::Sl),
            "be" | "breakeven" => Ok(Outcome::Be),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewStatus {
    Reviewed,
    Pending,
}

impl FromStr for ReviewStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reviewed" => Ok(ReviewStatus::Reviewed),
            "pending" => Ok(ReviewStatus::Pending),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Result of scoring a morning bias against the day's realised direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BiasStatus {
    Hit,
    Miss,
    Neutral,
    NoData,
}

impl fmt::Display for BiasStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiasStatus::Hit => write!(f, "hit"),
            BiasStatus::Miss => write!(f, "miss"),
            BiasStatus::Neutral => write!(f, "neutral"),
            BiasStatus::NoData => write!(f, "no-data"),
        }
    }
}

impl BiasStatus {
    /// Only hits and misses count toward accuracy.
    pub fn is_scored(self) -> bool {
        matches!(self, BiasStatus::Hit | BiasStatus::Miss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("up".parse::<DayDirection>(), Ok(DayDirection::Up));
        assert_eq!("CHOP".parse::<DayDirection>(), Ok(DayDirection::Chop));
        assert_eq!("long".parse::<Bias>(), Ok(Bias::Long));
        assert_eq!(" Neutral ".parse::<Bias>(), Ok(Bias::Neutral));
        assert_eq!("tp".parse::<Outcome>(), Ok(Outcome::Tp));
        assert!("sideways".parse::<DayDirection>().is_err());
    }

    #[test]
    fn serializes_wire_names() {
        assert_eq!(serde_json::to_string(&DayDirection::Down).unwrap(), "\"DOWN\"");
        assert_eq!(serde_json::to_string(&BiasStatus::NoData).unwrap(), "\"no-data\"");
        assert_eq!(serde_json::to_string(&Bias::Neutral).unwrap(), "\"Neutral\"");
        assert_eq!(serde_json::to_string(&Outcome::Be).unwrap(), "\"BE\"");
    }
}
