use crate::core::allocation::CandidateOrder;
use crate::core::portfolio::{Goal, GoalId, Investment, InvestmentId, UserId};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_MFAPI_URL: &str = "https://api.mfapi.in";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvestmentConfig {
    pub id: InvestmentId,
    pub fund_name: String,
    #[serde(default = "default_investment_type")]
    pub investment_type: String,
    #[serde(default)]
    pub invested_amount: Decimal,
    pub current_value: Decimal,
}

fn default_investment_type() -> String {
    "Mutual Fund".to_string()
}

impl InvestmentConfig {
    pub fn to_investment(&self, owner_id: UserId) -> Investment {
        Investment {
            id: self.id,
            owner_id,
            fund_name: self.fund_name.clone(),
            investment_type: self.investment_type.clone(),
            invested_amount: self.invested_amount,
            current_value: self.current_value,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoalConfig {
    pub id: GoalId,
    pub name: String,
    #[serde(default)]
    pub target_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub monthly_sip_amount: Decimal,
    /// Investments to link, in funding order.
    #[serde(default)]
    pub investments: Vec<InvestmentId>,
}

impl GoalConfig {
    pub fn to_goal(&self, owner_id: UserId) -> Goal {
        Goal {
            id: self.id,
            owner_id,
            name: self.name.clone(),
            target_amount: self.target_amount,
            target_date: self.target_date,
            monthly_sip_amount: self.monthly_sip_amount,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MfApiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub mfapi: Option<MfApiProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            mfapi: Some(MfApiProviderConfig {
                base_url: DEFAULT_MFAPI_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_concurrency() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectoryConfig {
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,
}

fn default_ttl_hours() -> i64 {
    24
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AllocationConfig {
    #[serde(default)]
    pub candidate_order: CandidateOrder,
}

/// A fund in the ranking universe, with the label it is grouped under.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UniverseEntry {
    pub scheme_code: String,
    pub sub_category: String,
}

pub fn default_universe() -> Vec<UniverseEntry> {
    [
        ("122639", "Large Cap"),
        ("106235", "Large Cap"),
        ("140228", "Mid Cap"),
        ("127042", "Mid Cap"),
        ("147946", "Small Cap"),
        ("145137", "Small Cap"),
        ("120334", "Hybrid"),
        ("120754", "Debt"),
        ("119016", "Debt"),
    ]
    .into_iter()
    .map(|(code, label)| UniverseEntry {
        scheme_code: code.to_string(),
        sub_category: label.to_string(),
    })
    .collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub investments: Vec<InvestmentConfig>,
    #[serde(default)]
    pub goals: Vec<GoalConfig>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    #[serde(default = "default_universe")]
    pub universe: Vec<UniverseEntry>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "goalfolio", "goalfolio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn mfapi_base_url(&self) -> &str {
        self.providers
            .mfapi
            .as_ref()
            .map_or(DEFAULT_MFAPI_URL, |p| p.base_url.as_str())
    }
}
