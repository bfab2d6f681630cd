pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

pub use crate::core::config;

use crate::core::aggregator::FundAggregator;
use crate::core::goals::GoalService;
use crate::core::portfolio::{Investment, UserId};
use crate::providers::MfApiProvider;
use crate::store::MemoryGoalStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Owner of everything loaded from the local configuration file.
pub const LOCAL_USER: UserId = 1;

pub enum AppCommand {
    Recommend,
    Fund {
        scheme_code: String,
    },
    Search {
        query: String,
        limit: usize,
        offset: usize,
    },
    Goals,
    Available,
    Summary,
}

fn build_aggregator(config: &config::AppConfig) -> Result<FundAggregator> {
    let provider = Arc::new(MfApiProvider::new(
        config.mfapi_base_url(),
        Duration::from_secs(config.fetch.timeout_secs),
    )?);
    Ok(FundAggregator::from_config(
        provider.clone(),
        provider,
        &config.fetch,
        config.directory.ttl_hours,
    ))
}

fn build_goal_service(config: &config::AppConfig) -> GoalService {
    let store = Arc::new(MemoryGoalStore::from_config(config, LOCAL_USER));
    GoalService::new(store, config.allocation.candidate_order)
}

fn local_investments(config: &config::AppConfig) -> Vec<Investment> {
    config
        .investments
        .iter()
        .map(|i| i.to_investment(LOCAL_USER))
        .collect()
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("goalfolio starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Recommend => {
            let aggregator = build_aggregator(&config)?;
            cli::recommend::run(&aggregator, &config.universe).await
        }
        AppCommand::Fund { scheme_code } => {
            let aggregator = build_aggregator(&config)?;
            cli::fund::run(&aggregator, &scheme_code).await
        }
        AppCommand::Search {
            query,
            limit,
            offset,
        } => {
            let aggregator = build_aggregator(&config)?;
            cli::search::run(&aggregator, &query, limit, offset).await
        }
        AppCommand::Goals => {
            let service = build_goal_service(&config);
            cli::goals::run(
                &service,
                LOCAL_USER,
                &config.goals,
                &local_investments(&config),
            )
            .await
        }
        AppCommand::Available => {
            let service = build_goal_service(&config);
            cli::available::run(&service, LOCAL_USER, &config.goals).await
        }
        AppCommand::Summary => cli::summary::run(&local_investments(&config)),
    }
}
