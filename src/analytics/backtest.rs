use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analytics::performance::ratio;
use crate::models::{BacktestSession, BacktestTrade, Outcome, SessionKind};

/// Risked per trade, as a fraction of the session's starting balance.
const RISK_PER_TRADE: f64 = 0.01;
const DEFAULT_PROFIT_TARGET_PCT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: Option<NaiveDate>,
    pub pnl: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodR {
    pub period: String,
    pub r: f64,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropFirmStatus {
    pub profit_target_amount: f64,
    pub profit_target_reached: bool,
    /// Most negative single-day P&L, 0 if no day lost money.
    pub worst_daily_loss: f64,
    pub daily_loss_breached: bool,
    /// Deepest fall of the balance below the starting balance.
    pub max_loss_from_start: f64,
    pub total_loss_breached: bool,
}

impl PropFirmStatus {
    pub fn passed(&self) -> bool {
        self.profit_target_reached && !self.daily_loss_breached && !self.total_loss_breached
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    /// Percent, TP outcomes over all trades.
    pub win_rate: f64,
    pub total_r: f64,
    pub risk_per_r: f64,
    pub total_pnl: f64,
    pub start_balance: f64,
    pub final_balance: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub monthly_r: Vec<PeriodR>,
    pub weekday_r: Vec<PeriodR>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_firm: Option<PropFirmStatus>,
}

impl SessionReport {
    /// Trades belonging to other sessions are ignored.
    pub fn from_trades(session: &BacktestSession, trades: &[BacktestTrade]) -> Self {
        let mut own: Vec<&BacktestTrade> =
            trades.iter().filter(|t| t.session_id == session.id).collect();
        // Undated trades sort last; stable within a day.
        own.sort_by_key(|t| (t.date.is_none(), t.date));

        let count_outcome =
            |o: Outcome| own.iter().filter(|t| t.outcome == Some(o)).count();
        let wins = count_outcome(Outcome::Tp);
        let losses = count_outcome(Outcome::Sl);
        let breakevens = count_outcome(Outcome::Be);

        let start_balance = session.balance;
        let risk_per_r = start_balance * RISK_PER_TRADE;

        let mut balance = start_balance;
        let mut total_r = 0.0;
        let mut equity_curve = Vec::with_capacity(own.len());
        let mut monthly: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut weekday: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for t in &own {
            let r = t.effective_r();
            let pnl = r * risk_per_r;
            total_r += r;
            balance += pnl;
            equity_curve.push(EquityPoint {
                date: t.date,
                pnl,
                balance,
            });

            if let Some(date) = t.date {
                let m = monthly.entry(date.format("%Y-%m").to_string()).or_default();
                m.0 += r;
                m.1 += 1;
                let w = weekday.entry(date.weekday().num_days_from_monday()).or_default();
                w.0 += r;
                w.1 += 1;
                *daily.entry(date).or_default() += pnl;
            }
        }

        let total_pnl = balance - start_balance;
        let prop_firm = (session.kind == SessionKind::PropFirm).then(|| {
            prop_firm_status(session, total_pnl, &equity_curve, &daily)
        });

        Self {
            session_id: session.id.clone(),
            total_trades: own.len(),
            wins,
            losses,
            breakevens,
            win_rate: (ratio(wins as f64, own.len()) * 1000.0).round() / 10.0,
            total_r,
            risk_per_r,
            total_pnl,
            start_balance,
            final_balance: balance,
            equity_curve,
            monthly_r: monthly
                .into_iter()
                .map(|(period, (r, trades))| PeriodR { period, r, trades })
                .collect(),
            weekday_r: weekday
                .into_iter()
                .map(|(idx, (r, trades))| PeriodR {
                    period: weekday_name(idx).to_string(),
                    r,
                    trades,
                })
                .collect(),
            prop_firm,
        }
    }
}

fn weekday_name(idx: u32) -> &'static str {
    match idx {
        0 => "Mon",
        1 => "Tue",
        2 => "Wed",
        3 => "Thu",
        4 => "Fri",
        5 => "Sat",
        _ => "Sun",
    }
}

fn prop_firm_status(
    session: &BacktestSession,
    total_pnl: f64,
    equity_curve: &[EquityPoint],
    daily: &BTreeMap<NaiveDate, f64>,
) -> PropFirmStatus {
    let target_pct = session.profit_target.unwrap_or(DEFAULT_PROFIT_TARGET_PCT);
    let profit_target_amount = session.balance * target_pct / 100.0;

    let worst_daily_loss = daily.values().copied().fold(0.0_f64, f64::min);
    let lowest_balance = equity_curve
        .iter()
        .map(|p| p.balance)
        .fold(session.balance, f64::min);
    let max_loss_from_start = session.balance - lowest_balance;

    PropFirmStatus {
        profit_target_amount,
        profit_target_reached: total_pnl >= profit_target_amount,
        worst_daily_loss,
        daily_loss_breached: session
            .max_daily_loss
            .is_some_and(|limit| -worst_daily_loss >= limit),
        max_loss_from_start,
        total_loss_breached: session
            .max_total_loss
            .is_some_and(|limit| max_loss_from_start >= limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use crate::test_helpers::d;

    fn session(kind: SessionKind) -> BacktestSession {
        BacktestSession {
            id: "s1".to_string(),
            name: "London opens".to_string(),
            kind,
            balance: 100_000.0,
            assets: vec!["EURUSD".to_string()],
            start_date: None,
            end_date: None,
            creation_date: "2025-01-01T00:00:00Z".to_string(),
            status: SessionStatus::Active,
            profit_target: Some(2.0),
            max_daily_loss: Some(1_500.0),
            max_total_loss: Some(5_000.0),
            time_invested: None,
            extra: Default::default(),
        }
    }

    fn bt(id: &str, date: &str, outcome: Outcome, result_r: Option<f64>) -> BacktestTrade {
        BacktestTrade {
            id: id.to_string(),
            session_id: "s1".to_string(),
            date: Some(d(date)),
            symbol: "EURUSD".to_string(),
            direction: None,
            outcome: Some(outcome),
            entry_price: None,
            stop_loss: None,
            take_profit: None,
            notes: None,
            result_r,
            extra: Default::default(),
        }
    }

    #[test]
    fn tallies_outcomes_and_equity() {
        let mut other = bt("x", "2025-01-06", Outcome::Tp, Some(5.0));
        other.session_id = "s2".to_string();
        let trades = vec![
            bt("3", "2025-02-03", Outcome::Sl, None),
            bt("1", "2025-01-06", Outcome::Tp, Some(3.0)),
            bt("2", "2025-01-07", Outcome::Be, None),
            other,
        ];
        let r = SessionReport::from_trades(&session(SessionKind::Backtesting), &trades);
        assert_eq!(r.total_trades, 3);
        assert_eq!((r.wins, r.losses, r.breakevens), (1, 1, 1));
        assert_eq!(r.win_rate, 33.3);
        assert_eq!(r.total_r, 2.0);
        assert_eq!(r.risk_per_r, 1_000.0);
        assert_eq!(r.total_pnl, 2_000.0);
        assert_eq!(r.final_balance, 102_000.0);
        assert_eq!(r.equity_curve[0].date, Some(d("2025-01-06")));
        assert_eq!(r.equity_curve[0].balance, 103_000.0);
        assert_eq!(r.monthly_r[0], PeriodR { period: "2025-01".to_string(), r: 3.0, trades: 2 });
        assert_eq!(r.monthly_r[1].r, -1.0);
        assert_eq!(r.weekday_r[0].period, "Mon");
        assert_eq!(r.weekday_r[0].trades, 2);
        assert!(r.prop_firm.is_none());
    }

    #[test]
    fn prop_firm_rules() {
        let trades = vec![
            bt("1", "2025-01-06", Outcome::Sl, Some(-1.0)),
            bt("2", "2025-01-06", Outcome::Sl, Some(-1.0)),
            bt("3", "2025-01-07", Outcome::Tp, Some(4.0)),
        ];
        let r = SessionReport::from_trades(&session(SessionKind::PropFirm), &trades);
        let p = r.prop_firm.unwrap();
        assert_eq!(p.profit_target_amount, 2_000.0);
        assert!(p.profit_target_reached);
        assert_eq!(p.worst_daily_loss, -2_000.0);
        assert!(p.daily_loss_breached);
        assert_eq!(p.max_loss_from_start, 2_000.0);
        assert!(!p.total_loss_breached);
        assert!(!p.passed());
    }

    #[test]
    fn empty_session() {
        let r = SessionReport::from_trades(&session(SessionKind::PropFirm), &[]);
        assert_eq!(r.total_trades, 0);
        assert_eq!(r.win_rate, 0.0);
        assert_eq!(r.final_balance, 100_000.0);
        let p = r.prop_firm.unwrap();
        assert!(!p.profit_target_reached);
        assert_eq!(p.worst_daily_loss, 0.0);
        assert_eq!(p.max_loss_from_start, 0.0);
    }
}
