//! Portfolio-level figures derived from a user's investments: totals, allocation by asset type
//! and per-investment performance.
use crate::core::portfolio::Investment;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of investment types at which diversification scores 100.
const DIVERSIFICATION_TYPES: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAllocation {
    pub investment_type: String,
    pub value: Decimal,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performer {
    pub fund_name: String,
    pub investment_type: String,
    pub return_percentage: f64,
    pub absolute_return: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    fn from_return(return_percentage: f64) -> Self {
        if return_percentage > 15.0 {
            RiskLevel::High
        } else if return_percentage > 8.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub total_current: Decimal,
    pub total_returns: Decimal,
    pub return_percentage: f64,
    pub asset_allocation: Vec<AssetAllocation>,
    pub best: Option<Performer>,
    pub worst: Option<Performer>,
    pub top_gainers: Vec<Performer>,
    pub risk_level: RiskLevel,
    pub diversification_score: f64,
}

/// `part / whole` as a percentage, or 0 when `whole` is not positive.
fn percentage_of(part: Decimal, whole: Decimal) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

/// Return of a single investment. Investments without a positive invested amount have none.
pub fn performer(investment: &Investment) -> Option<Performer> {
    if investment.invested_amount <= Decimal::ZERO {
        return None;
    }
    let absolute_return = investment.current_value - investment.invested_amount;
    Some(Performer {
        fund_name: investment.fund_name.clone(),
        investment_type: investment.investment_type.clone(),
        return_percentage: percentage_of(absolute_return, investment.invested_amount),
        absolute_return,
    })
}

/// Summarises a set of investments.
///
/// Performers are ranked by return percentage, best first; investments with equal returns
/// keep their input order. Asset allocation is grouped by investment type, sorted by type name.
pub fn portfolio_summary(investments: &[Investment]) -> PortfolioSummary {
    let total_invested: Decimal = investments.iter().map(|i| i.invested_amount).sum();
    let total_current: Decimal = investments.iter().map(|i| i.current_value).sum();
    let total_returns = total_current - total_invested;
    let return_percentage = percentage_of(total_returns, total_invested);

    let mut by_type: BTreeMap<&str, Decimal> = BTreeMap::new();
    for investment in investments {
        *by_type
            .entry(investment.investment_type.as_str())
            .or_default() += investment.current_value;
    }
    let asset_allocation = by_type
        .into_iter()
        .map(|(investment_type, value)| AssetAllocation {
            investment_type: investment_type.to_string(),
            value,
            percentage: percentage_of(value, total_current),
        })
        .collect::<Vec<_>>();

    let mut performers: Vec<Performer> = investments.iter().filter_map(performer).collect();
    performers.sort_by(|a, b| b.return_percentage.total_cmp(&a.return_percentage));

    let diversification_score =
        (asset_allocation.len() as f64 / DIVERSIFICATION_TYPES * 100.0).min(100.0);

    PortfolioSummary {
        total_invested,
        total_current,
        total_returns,
        return_percentage,
        best: performers.first().cloned(),
        worst: performers.last().cloned(),
        top_gainers: performers.iter().take(3).cloned().collect(),
        asset_allocation,
        risk_level: RiskLevel::from_return(return_percentage),
        diversification_score,
    }
}
