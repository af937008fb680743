use serde::{Deserialize, Serialize};

use crate::models::Achievement;

const FUNDED: &str = "Funded";

/// Header totals for the achievements page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementTotals {
    pub total_funded: f64,
    pub total_payout: f64,
    pub funded_accounts: usize,
    pub payouts: usize,
}

/// Sum funded account sizes and payouts.
///
/// Accounts count only while funded; entries without a status predate phases
/// and always count. A payout without `payoutAmount` falls back to the legacy
/// `payout` field. Zero or missing amounts add nothing.
pub fn achievement_totals(list: &[Achievement]) -> AchievementTotals {
    let mut totals = AchievementTotals::default();
    for a in list {
        if a.is_payout() {
            let amount = a
                .payout_amount
                .filter(|v| *v != 0.0)
                .or(a.payout.filter(|v| *v != 0.0));
            if let Some(amount) = amount {
                totals.total_payout += amount;
                totals.payouts += 1;
            }
            continue;
        }

        if a.status.as_deref().is_some_and(|s| s != FUNDED) {
            continue;
        }
        if let Some(size) = a.account_size.filter(|v| *v != 0.0) {
            totals.total_funded += size;
            totals.funded_accounts += 1;
        }
    }
    totals
}
