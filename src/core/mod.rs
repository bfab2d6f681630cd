//! Core business logic: allocation, returns, classification and market-data abstractions

pub mod aggregator;
pub mod allocation;
pub mod analytics;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod fund;
pub mod goals;
pub mod log;
pub mod nav;
pub mod portfolio;
pub mod returns;

// Re-export main types for cleaner imports
pub use aggregator::{FundAggregator, FundDetails, FundSummary};
pub use allocation::{AllocationError, CandidateOrder, GoalProgress};
pub use fund::{FetchError, FundDirectoryProvider, FundHistory, NavHistoryProvider};
pub use goals::{GoalService, GoalStore};
pub use returns::{TrailingPeriod, TrailingReturn};
