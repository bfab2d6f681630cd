//! Attribution of held investments to competing savings goals.
//!
//! The engine is a pure greedy pass: candidates are visited in the order supplied and each
//! contributes whatever headroom other goals have not already claimed, until the goal's target
//! is met. Callers own the read of the snapshot and the write of the result, and must serialize
//! the two per investment (see [`crate::core::goals::GoalService`]).

use crate::core::portfolio::{Goal, GoalId, GoalInvestmentAllocation, Investment, InvestmentId};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Headroom at or below this amount is treated as fully claimed.
pub const HEADROOM_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Goal not found: {0}")]
    GoalNotFound(GoalId),

    #[error("Not enough permissions for goal {0}")]
    PermissionDenied(GoalId),

    #[error("Allocation store failed: {0}")]
    Store(#[from] anyhow::Error),
}

/// How candidates are ordered before the greedy pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrder {
    /// Caller order, unchanged.
    #[default]
    AsGiven,
    /// Most unclaimed value first; caller order breaks ties.
    LargestHeadroomFirst,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    pub allocations: Vec<GoalInvestmentAllocation>,
    pub total_allocated: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    pub current_amount: Decimal,
    pub progress: f64,
    pub linked_investments: Vec<InvestmentId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableInvestment {
    pub investment: Investment,
    pub remaining_amount: Decimal,
}

fn used_by_others(
    goal_id: GoalId,
    investment_id: InvestmentId,
    others: &[GoalInvestmentAllocation],
) -> Decimal {
    others
        .iter()
        .filter(|a| a.investment_id == investment_id && a.goal_id != goal_id)
        .map(|a| a.allocated_amount)
        .sum()
}

/// Computes the replacement allocation rows for `goal`.
///
/// `other_allocations` may contain rows of the goal itself; they are ignored, since the result
/// replaces them wholesale.
pub fn allocate(
    goal: &Goal,
    candidates: &[&Investment],
    other_allocations: &[GoalInvestmentAllocation],
) -> AllocationOutcome {
    let mut allocations = Vec::new();
    let mut running_total = Decimal::ZERO;

    for investment in candidates {
        let headroom =
            investment.current_value - used_by_others(goal.id, investment.id, other_allocations);
        if headroom <= HEADROOM_EPSILON {
            debug!(
                goal = goal.id,
                investment = investment.id,
                %headroom,
                "Skipping fully claimed investment"
            );
            continue;
        }

        let allocation = if goal.is_capped() {
            let needed = (goal.target_amount - running_total).max(Decimal::ZERO);
            if needed.is_zero() {
                break;
            }
            headroom.min(needed)
        } else {
            headroom
        };

        if allocation > Decimal::ZERO {
            allocations.push(GoalInvestmentAllocation {
                goal_id: goal.id,
                investment_id: investment.id,
                allocated_amount: allocation,
            });
            running_total += allocation;
        }
    }

    AllocationOutcome {
        allocations,
        total_allocated: running_total,
    }
}

/// Arranges the pool according to `order`. Ids missing from the pool are ignored and repeated
/// ids keep their first position.
pub fn order_candidates<'a>(
    goal_id: GoalId,
    requested: &[InvestmentId],
    pool: &'a [Investment],
    other_allocations: &[GoalInvestmentAllocation],
    order: CandidateOrder,
) -> Vec<&'a Investment> {
    let by_id: HashMap<InvestmentId, &Investment> = pool.iter().map(|i| (i.id, i)).collect();
    let mut seen = HashSet::new();
    let mut candidates: Vec<&Investment> = requested
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| {
            let found = by_id.get(id).copied();
            if found.is_none() {
                debug!(goal = goal_id, investment = *id, "Ignoring unknown investment");
            }
            found
        })
        .collect();

    if order == CandidateOrder::LargestHeadroomFirst {
        // sort_by is stable, so equal headroom keeps the requested order
        candidates.sort_by(|a, b| {
            let ha = a.current_value - used_by_others(goal_id, a.id, other_allocations);
            let hb = b.current_value - used_by_others(goal_id, b.id, other_allocations);
            hb.cmp(&ha)
        });
    }
    candidates
}

pub fn progress(goal: &Goal, allocations: &[GoalInvestmentAllocation]) -> GoalProgress {
    let own: Vec<&GoalInvestmentAllocation> =
        allocations.iter().filter(|a| a.goal_id == goal.id).collect();
    let current_amount: Decimal = own.iter().map(|a| a.allocated_amount).sum();
    let progress = if goal.is_capped() {
        current_amount
            .checked_div(goal.target_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|pct| pct.to_f64())
            .unwrap_or(0.0)
    } else {
        0.0
    };

    GoalProgress {
        goal: goal.clone(),
        current_amount,
        progress,
        linked_investments: own.iter().map(|a| a.investment_id).collect(),
    }
}

/// Unclaimed value of each investment across every goal, floored at zero.
pub fn available_investments(
    investments: &[Investment],
    allocations: &[GoalInvestmentAllocation],
) -> Vec<AvailableInvestment> {
    investments
        .iter()
        .map(|investment| {
            let used: Decimal = allocations
                .iter()
                .filter(|a| a.investment_id == investment.id)
                .map(|a| a.allocated_amount)
                .sum();
            AvailableInvestment {
                investment: investment.clone(),
                remaining_amount: (investment.current_value - used).max(Decimal::ZERO),
            }
        })
        .collect()
}
