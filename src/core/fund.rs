//! Market-data abstractions: NAV histories, the fund directory and fetch failures.

use crate::core::nav::{NavSeries, RawNavEntry};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request for {0} timed out")]
    Timeout(String),

    #[error("Provider returned status {status} for {identifier}")]
    Status { identifier: String, status: u16 },

    #[error("Request for {identifier} failed: {message}")]
    Transport { identifier: String, message: String },

    #[error("Malformed response for {identifier}: {message}")]
    Malformed { identifier: String, message: String },

    #[error("Received empty response for {0}")]
    Empty(String),
}

/// Scheme codes arrive as numbers from some endpoints and strings from others.
fn scheme_code_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(u64),
        Text(String),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Number(n) => n.to_string(),
        Code::Text(s) => s,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeMeta {
    #[serde(deserialize_with = "scheme_code_from_any")]
    pub scheme_code: String,
    pub scheme_name: String,
    #[serde(default)]
    pub fund_house: String,
    #[serde(default)]
    pub scheme_type: Option<String>,
    #[serde(default)]
    pub scheme_category: Option<String>,
}

/// A provider's NAV history payload for one scheme, newest entry first as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundHistory {
    pub meta: SchemeMeta,
    pub data: Vec<RawNavEntry>,
}

impl FundHistory {
    pub fn series(&self) -> NavSeries {
        NavSeries::from_raw(&self.data)
    }
}

/// One row of the all-funds directory used for search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    #[serde(deserialize_with = "scheme_code_from_any")]
    pub scheme_code: String,
    pub scheme_name: String,
}

#[async_trait]
pub trait NavHistoryProvider: Send + Sync {
    async fn fetch_history(&self, scheme_code: &str) -> Result<FundHistory, FetchError>;
}

#[async_trait]
pub trait FundDirectoryProvider: Send + Sync {
    async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_payload_deserialization() {
        let json = r#"{
            "meta": {
                "fund_house": "PPFAS Mutual Fund",
                "scheme_type": "Open Ended Schemes",
                "scheme_category": "Equity Scheme - Flexi Cap Fund",
                "scheme_code": 122639,
                "scheme_name": "Parag Parikh Flexi Cap Fund - Direct Plan - Growth"
            },
            "data": [
                {"date": "02-01-2024", "nav": "68.12340"},
                {"date": "01-01-2024", "nav": "67.90000"}
            ],
            "status": "SUCCESS"
        }"#;

        let history: FundHistory = serde_json::from_str(json).unwrap();

        assert_eq!(history.meta.scheme_code, "122639");
        assert_eq!(history.meta.fund_house, "PPFAS Mutual Fund");
        assert_eq!(history.data.len(), 2);
        let series = history.series();
        assert_eq!(series.first().unwrap().nav, 67.9);
        assert_eq!(series.latest().unwrap().nav, 68.1234);
    }

    #[test]
    fn test_directory_entry_deserialization() {
        let json = r#"[{"schemeCode": 100027, "schemeName": "Grindlays Super Saver Income Fund"},
                       {"schemeCode": "100028", "schemeName": "Another Fund"}]"#;

        let entries: Vec<DirectoryEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].scheme_code, "100027");
        assert_eq!(entries[1].scheme_code, "100028");
    }
}
