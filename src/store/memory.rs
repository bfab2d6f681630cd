use crate::core::config::AppConfig;
use crate::core::goals::GoalStore;
use crate::core::portfolio::{
    Goal, GoalId, GoalInvestmentAllocation, Investment, InvestmentId, UserId,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct MemoryState {
    goals: Vec<Goal>,
    investments: Vec<Investment>,
    allocations: Vec<GoalInvestmentAllocation>,
}

/// In-memory goal store. Every operation runs under a single lock, so a replace is atomic.
pub struct MemoryGoalStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryGoalStore {
    pub fn new(goals: Vec<Goal>, investments: Vec<Investment>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                goals,
                investments,
                allocations: Vec::new(),
            })),
        }
    }

    /// Seeds the store with the configured goals and investments, all owned by `owner_id`.
    pub fn from_config(config: &AppConfig, owner_id: UserId) -> Self {
        Self::new(
            config.goals.iter().map(|g| g.to_goal(owner_id)).collect(),
            config
                .investments
                .iter()
                .map(|i| i.to_investment(owner_id))
                .collect(),
        )
    }
}

impl Default for MemoryGoalStore {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[async_trait]
impl GoalStore for MemoryGoalStore {
    async fn goal(&self, goal_id: GoalId) -> Result<Option<Goal>> {
        let state = self.inner.lock().await;
        Ok(state.goals.iter().find(|g| g.id == goal_id).cloned())
    }

    async fn goals_by_owner(&self, owner_id: UserId) -> Result<Vec<Goal>> {
        let state = self.inner.lock().await;
        Ok(state
            .goals
            .iter()
            .filter(|g| g.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn investments_by_owner(&self, owner_id: UserId) -> Result<Vec<Investment>> {
        let state = self.inner.lock().await;
        Ok(state
            .investments
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn allocations_for_investments(
        &self,
        investment_ids: &[InvestmentId],
        excluding_goal: GoalId,
    ) -> Result<Vec<GoalInvestmentAllocation>> {
        let state = self.inner.lock().await;
        Ok(state
            .allocations
            .iter()
            .filter(|a| a.goal_id != excluding_goal && investment_ids.contains(&a.investment_id))
            .cloned()
            .collect())
    }

    async fn allocations(&self) -> Result<Vec<GoalInvestmentAllocation>> {
        let state = self.inner.lock().await;
        Ok(state.allocations.clone())
    }

    async fn replace_allocations(
        &self,
        goal_id: GoalId,
        rows: Vec<GoalInvestmentAllocation>,
    ) -> Result<()> {
        let mut state = self.inner.lock().await;
        state.allocations.retain(|a| a.goal_id != goal_id);
        debug!(goal = goal_id, rows = rows.len(), "Replacing allocation rows");
        state.allocations.extend(rows);
        Ok(())
    }
}
