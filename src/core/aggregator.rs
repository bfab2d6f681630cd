//! Fan-out over the market-data provider: fund ranking, fund details and directory search.

use crate::core::cache::{DirectoryCache, MIN_QUERY_LEN, SearchPage};
use crate::core::classifier::{self, FundCategory};
use crate::core::config::{FetchConfig, UniverseEntry};
use crate::core::fund::{
    FetchError, FundDirectoryProvider, FundHistory, NavHistoryProvider, SchemeMeta,
};
use crate::core::returns::{self, TrailingPeriod, TrailingReturn};
use chrono::{Duration, NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Window, in years, of the rolling return funds are ranked by.
pub const RANKING_WINDOW_YEARS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundSummary {
    pub scheme_code: String,
    pub scheme_name: String,
    pub nav: f64,
    pub nav_date: Option<NaiveDate>,
    pub fund_house: String,
    pub category: FundCategory,
    pub sub_category: String,
    pub rolling_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundDetails {
    pub meta: SchemeMeta,
    pub nav: Option<f64>,
    pub nav_date: Option<NaiveDate>,
    pub category: FundCategory,
    pub sub_category: String,
    pub returns: BTreeMap<TrailingPeriod, TrailingReturn>,
}

pub struct FundAggregator {
    history_provider: Arc<dyn NavHistoryProvider>,
    directory_provider: Arc<dyn FundDirectoryProvider>,
    max_concurrency: usize,
    directory: Mutex<DirectoryCache>,
}

fn summarize(history: &FundHistory, universe: &[UniverseEntry]) -> FundSummary {
    let series = history.series();
    let (category, classified_sub) = classifier::classify(&history.meta.scheme_name);
    let sub_category = universe
        .iter()
        .find(|e| e.scheme_code == history.meta.scheme_code)
        .map_or_else(|| classified_sub.to_string(), |e| e.sub_category.clone());

    FundSummary {
        scheme_code: history.meta.scheme_code.clone(),
        scheme_name: history.meta.scheme_name.clone(),
        nav: series.latest().map_or(0.0, |p| p.nav),
        nav_date: series.latest().map(|p| p.date),
        fund_house: history.meta.fund_house.clone(),
        category,
        sub_category,
        rolling_return: returns::rolling_return(&series, RANKING_WINDOW_YEARS),
    }
}

/// Directory TTL from configured hours. Negative values expire immediately and values beyond
/// the representable range never expire.
pub fn directory_ttl(hours: i64) -> Duration {
    Duration::try_hours(hours.max(0)).unwrap_or(Duration::MAX)
}

impl FundAggregator {
    pub fn new(
        history_provider: Arc<dyn NavHistoryProvider>,
        directory_provider: Arc<dyn FundDirectoryProvider>,
        max_concurrency: usize,
        directory_ttl: Duration,
    ) -> Self {
        Self {
            history_provider,
            directory_provider,
            max_concurrency: max_concurrency.max(1),
            directory: Mutex::new(DirectoryCache::new(directory_ttl)),
        }
    }

    pub fn from_config(
        history_provider: Arc<dyn NavHistoryProvider>,
        directory_provider: Arc<dyn FundDirectoryProvider>,
        fetch: &FetchConfig,
        directory_ttl_hours: i64,
    ) -> Self {
        Self::new(
            history_provider,
            directory_provider,
            fetch.max_concurrency,
            directory_ttl(directory_ttl_hours),
        )
    }

    /// Fetches NAV histories with at most `max_concurrency` requests in flight, in completion
    /// order. Failed fetches are logged and left out.
    pub async fn fetch_histories(
        &self,
        scheme_codes: &[String],
        on_fetched: &(dyn Fn() + Send + Sync),
    ) -> Vec<FundHistory> {
        stream::iter(scheme_codes)
            .map(|code| async move {
                let result: Result<FundHistory, FetchError> =
                    self.history_provider.fetch_history(code).await;
                on_fetched();
                (code, result)
            })
            .buffer_unordered(self.max_concurrency)
            .filter_map(|(code, result)| async move {
                match result {
                    Ok(history) => Some(history),
                    Err(e) => {
                        warn!(scheme_code = %code, error = %e, "Dropping fund after failed fetch");
                        None
                    }
                }
            })
            .collect()
            .await
    }

    /// Ranks the universe by 3-year rolling return, best first. Equal returns keep the order
    /// in which their fetches completed.
    pub async fn rank(
        &self,
        universe: &[UniverseEntry],
        on_fetched: &(dyn Fn() + Send + Sync),
    ) -> Vec<FundSummary> {
        let codes: Vec<String> = universe.iter().map(|e| e.scheme_code.clone()).collect();
        let histories = self.fetch_histories(&codes, on_fetched).await;
        info!(
            requested = codes.len(),
            fetched = histories.len(),
            "Fetched NAV histories for ranking"
        );

        let mut summaries: Vec<FundSummary> = histories
            .iter()
            .map(|history| summarize(history, universe))
            .collect();
        summaries.sort_by(|a, b| b.rolling_return.total_cmp(&a.rolling_return));
        summaries
    }

    pub async fn fund_details(&self, scheme_code: &str) -> Result<FundDetails, FetchError> {
        let history = self.history_provider.fetch_history(scheme_code).await?;
        let series = history.series();
        let (category, sub_category) = classifier::classify(&history.meta.scheme_name);
        debug!(scheme_code, points = series.len(), "Computing trailing returns");

        Ok(FundDetails {
            nav: series.latest().map(|p| p.nav),
            nav_date: series.latest().map(|p| p.date),
            category,
            sub_category: sub_category.to_string(),
            returns: returns::trailing_returns(&series),
            meta: history.meta,
        })
    }

    /// Searches the fund directory, refreshing it first when stale. The lock is held across the
    /// refresh, so concurrent searches share one fetch. A failed refresh keeps the old entries.
    pub async fn search(&self, query: &str, limit: usize, offset: usize) -> SearchPage {
        if query.chars().count() < MIN_QUERY_LEN {
            return SearchPage::empty();
        }

        let mut directory = self.directory.lock().await;
        let now = Utc::now();
        if directory.is_stale(now) {
            match self.directory_provider.fetch_directory().await {
                Ok(entries) => {
                    info!(entries = entries.len(), "Refreshed fund directory");
                    directory.replace(entries, now);
                }
                Err(e) => warn!(error = %e, "Fund directory refresh failed, using cached entries"),
            }
        } else {
            debug!("Fund directory cache HIT");
        }
        directory.search(query, limit, offset)
    }
}
