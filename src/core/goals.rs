//! Goal/investment linking over a persistent store.
//!
//! [`GoalService::link_investments`] is the only writer of allocation rows. It holds a
//! process-wide lock from the read of other goals' allocations until the goal's rows have been
//! replaced, so two goals sharing an investment can never both claim the same headroom.

use crate::core::allocation::{
    self, AllocationError, AvailableInvestment, CandidateOrder, GoalProgress,
};
use crate::core::portfolio::{
    Goal, GoalId, GoalInvestmentAllocation, Investment, InvestmentId, UserId,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn goal(&self, goal_id: GoalId) -> Result<Option<Goal>>;

    async fn goals_by_owner(&self, owner_id: UserId) -> Result<Vec<Goal>>;

    async fn investments_by_owner(&self, owner_id: UserId) -> Result<Vec<Investment>>;

    /// Rows referencing any of `investment_ids` that belong to goals other than `excluding_goal`.
    async fn allocations_for_investments(
        &self,
        investment_ids: &[InvestmentId],
        excluding_goal: GoalId,
    ) -> Result<Vec<GoalInvestmentAllocation>>;

    async fn allocations(&self) -> Result<Vec<GoalInvestmentAllocation>>;

    /// Deletes every row of `goal_id` and inserts `rows`, atomically.
    async fn replace_allocations(
        &self,
        goal_id: GoalId,
        rows: Vec<GoalInvestmentAllocation>,
    ) -> Result<()>;
}

pub struct GoalService {
    store: Arc<dyn GoalStore>,
    order: CandidateOrder,
    allocation_lock: Mutex<()>,
}

impl GoalService {
    pub fn new(store: Arc<dyn GoalStore>, order: CandidateOrder) -> Self {
        Self {
            store,
            order,
            allocation_lock: Mutex::new(()),
        }
    }

    async fn owned_goal(&self, user: UserId, goal_id: GoalId) -> Result<Goal, AllocationError> {
        let goal = self
            .store
            .goal(goal_id)
            .await?
            .ok_or(AllocationError::GoalNotFound(goal_id))?;
        if goal.owner_id != user {
            return Err(AllocationError::PermissionDenied(goal_id));
        }
        Ok(goal)
    }

    /// Recomputes the goal's allocations from `investment_ids`, funded in that order.
    pub async fn link_investments(
        &self,
        user: UserId,
        goal_id: GoalId,
        investment_ids: &[InvestmentId],
    ) -> Result<GoalProgress, AllocationError> {
        let goal = self.owned_goal(user, goal_id).await?;

        let _guard = self.allocation_lock.lock().await;
        let pool = self.store.investments_by_owner(goal.owner_id).await?;
        let known: Vec<InvestmentId> = investment_ids
            .iter()
            .copied()
            .filter(|id| pool.iter().any(|i| i.id == *id))
            .collect();
        let others = self
            .store
            .allocations_for_investments(&known, goal.id)
            .await?;
        debug!(
            goal = goal.id,
            candidates = known.len(),
            other_rows = others.len(),
            "Read allocation snapshot"
        );

        let candidates =
            allocation::order_candidates(goal.id, investment_ids, &pool, &others, self.order);
        let outcome = allocation::allocate(&goal, &candidates, &others);
        self.store
            .replace_allocations(goal.id, outcome.allocations.clone())
            .await?;

        info!(
            goal = goal.id,
            rows = outcome.allocations.len(),
            total = %outcome.total_allocated,
            "Linked investments to goal"
        );
        Ok(allocation::progress(&goal, &outcome.allocations))
    }

    pub async fn goals_for(&self, user: UserId) -> Result<Vec<GoalProgress>, AllocationError> {
        let goals = self.store.goals_by_owner(user).await?;
        let rows = self.store.allocations().await?;
        Ok(goals
            .iter()
            .map(|goal| allocation::progress(goal, &rows))
            .collect())
    }

    pub async fn available_for(
        &self,
        user: UserId,
    ) -> Result<Vec<AvailableInvestment>, AllocationError> {
        let investments = self.store.investments_by_owner(user).await?;
        let rows = self.store.allocations().await?;
        Ok(allocation::available_investments(&investments, &rows))
    }
}
