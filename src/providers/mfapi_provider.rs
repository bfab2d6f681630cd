use crate::core::fund::{
    DirectoryEntry, FetchError, FundDirectoryProvider, FundHistory, NavHistoryProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("goalfolio/", env!("CARGO_PKG_VERSION"));

fn request_error(identifier: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(identifier.to_string())
    } else {
        FetchError::Transport {
            identifier: identifier.to_string(),
            message: e.to_string(),
        }
    }
}

/// Client for mfapi.in-compatible NAV endpoints.
pub struct MfApiProvider {
    base_url: String,
    client: Client,
}

impl MfApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                identifier: base_url.to_string(),
                message: e.to_string(),
            })?;
        Ok(MfApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        identifier: &str,
    ) -> Result<T, FetchError> {
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(identifier, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                identifier: identifier.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| request_error(identifier, e))?;
        if body.trim().is_empty() {
            return Err(FetchError::Empty(identifier.to_string()));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            identifier: identifier.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl NavHistoryProvider for MfApiProvider {
    async fn fetch_history(&self, scheme_code: &str) -> Result<FundHistory, FetchError> {
        let url = format!("{}/mf/{}", self.base_url, scheme_code);
        let history: FundHistory = self.get_json(&url, scheme_code).await?;
        debug!(
            scheme_code,
            entries = history.data.len(),
            "Fetched NAV history"
        );
        Ok(history)
    }
}

#[async_trait]
impl FundDirectoryProvider for MfApiProvider {
    async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>, FetchError> {
        let url = format!("{}/mf", self.base_url);
        self.get_json(&url, "fund directory").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mfapi_mock_server(
        url_path: &str,
        mock_response: &str,
        status_code: u16,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider(server: &MockServer) -> MfApiProvider {
        MfApiProvider::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_history_fetch() {
        let mock_response = r#"{
            "meta": {
                "fund_house": "Axis Mutual Fund",
                "scheme_type": "Open Ended Schemes",
                "scheme_category": "Equity Scheme - Large Cap Fund",
                "scheme_code": 120465,
                "scheme_name": "Axis Bluechip Fund - Direct Plan - Growth"
            },
            "data": [
                {"date": "02-01-2024", "nav": "55.12000"},
                {"date": "01-01-2024", "nav": "54.90000"},
                {"date": "bad", "nav": "1.0"}
            ],
            "status": "SUCCESS"
        }"#;
        let server = create_mfapi_mock_server("/mf/120465", mock_response, 200).await;

        let history = provider(&server).fetch_history("120465").await.unwrap();

        assert_eq!(history.meta.scheme_code, "120465");
        assert_eq!(history.meta.fund_house, "Axis Mutual Fund");
        assert_eq!(history.data.len(), 3);
        let series = history.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().nav, 55.12);
    }

    #[tokio::test]
    async fn test_status_error() {
        let server = create_mfapi_mock_server("/mf/1", "Not Found", 404).await;

        let result = provider(&server).fetch_history("1").await;

        assert!(matches!(
            result,
            Err(FetchError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_and_malformed_bodies() {
        let server = create_mfapi_mock_server("/mf/1", "  ", 200).await;
        assert!(matches!(
            provider(&server).fetch_history("1").await,
            Err(FetchError::Empty(_))
        ));

        let server = create_mfapi_mock_server("/mf/2", "<html>oops</html>", 200).await;
        assert!(matches!(
            provider(&server).fetch_history("2").await,
            Err(FetchError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_a_fetch_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mf/1"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;
        let provider = MfApiProvider::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();

        let result = provider.fetch_history("1").await;

        assert!(matches!(result, Err(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_directory_fetch() {
        let mock_response = r#"[
            {"schemeCode": 100027, "schemeName": "Grindlays Super Saver Income Fund"},
            {"schemeCode": "100028",
             "schemeName": "Grindlays Super Saver Income Fund-GSSIF-Quaterly"}
        ]"#;
        let server = create_mfapi_mock_server("/mf", mock_response, 200).await;

        let entries = provider(&server).fetch_directory().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].scheme_code, "100027");
        assert_eq!(entries[1].scheme_code, "100028");
    }
}
