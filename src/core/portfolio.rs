//! Portfolio records shared by the allocation engine, analytics and stores.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type GoalId = u64;
pub type InvestmentId = u64;

/// A holding owned by a user. `current_value` is what the allocation engine splits across goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: InvestmentId,
    pub owner_id: UserId,
    pub fund_name: String,
    pub investment_type: String,
    pub invested_amount: Decimal,
    pub current_value: Decimal,
}

/// A savings goal. A `target_amount` of zero (or less) means the goal is uncapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub owner_id: UserId,
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub monthly_sip_amount: Decimal,
}

impl Goal {
    pub fn is_capped(&self) -> bool {
        self.target_amount > Decimal::ZERO
    }
}

/// Portion of one investment's value attributed to one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInvestmentAllocation {
    pub goal_id: GoalId,
    pub investment_id: InvestmentId,
    pub allocated_amount: Decimal,
}
