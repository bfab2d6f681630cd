use chrono::{Duration, NaiveDate};
use std::fs;
use tracing::info;

mod test_utils {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// NAV history with one entry per day for `days` days, growing at `rate` a year.
    pub fn history_json(scheme_code: &str, scheme_name: &str, rate: f64, days: i64) -> String {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let data: Vec<String> = (0..=days)
            .rev()
            .map(|d| {
                let date = (start + Duration::days(d)).format("%d-%m-%Y");
                let nav = 10.0 * (1.0 + rate).powf(d as f64 / 365.0);
                format!(r#"{{"date": "{date}", "nav": "{nav:.5}"}}"#)
            })
            .collect();
        format!(
            r#"{{"meta": {{"fund_house": "Test AMC", "scheme_type": "Open Ended Schemes",
                "scheme_category": "Equity Scheme", "scheme_code": {scheme_code},
                "scheme_name": "{scheme_name}"}},
              "data": [{}], "status": "SUCCESS"}}"#,
            data.join(",")
        )
    }

    pub async fn mount_history(server: &MockServer, scheme_code: &str, body: String, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/mf/{scheme_code}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub async fn create_mfapi_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        mount_history(
            &mock_server,
            "100001",
            history_json("100001", "Alpha Midcap Fund - Direct Growth", 0.15, 365 * 4),
            200,
        )
        .await;
        mount_history(
            &mock_server,
            "100002",
            history_json("100002", "Beta Liquid Fund - Direct Growth", 0.06, 365 * 4),
            200,
        )
        .await;
        mount_history(&mock_server, "100003", "Internal Server Error".to_string(), 500).await;

        Mock::given(method("GET"))
            .and(path("/mf"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"schemeCode": 100001, "schemeName": "Alpha Midcap Fund - Direct Growth"},
                    {"schemeCode": 100002, "schemeName": "Beta Liquid Fund - Direct Growth"}]"#,
            ))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
investments:
  - id: 1
    fund_name: "Alpha Midcap Fund"
    invested_amount: 40000
    current_value: 60000
  - id: 2
    fund_name: "Beta Liquid Fund"
    invested_amount: 50000
    current_value: 50000
goals:
  - id: 1
    name: "Car"
    target_amount: 10000
    investments: [2]
  - id: 2
    name: "House"
    target_amount: 100000
    investments: [1, 2]
providers:
  mfapi:
    base_url: "{base_url}"
fetch:
  max_concurrency: 2
  timeout_secs: 5
universe:
  - scheme_code: "100001"
    sub_category: "Mid Cap"
  - scheme_code: "100002"
    sub_category: "Debt"
  - scheme_code: "100003"
    sub_category: "Small Cap"
"#
        );
        fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mfapi_mock() {
    let mock_server = test_utils::create_mfapi_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str().unwrap();

    let commands = vec![
        goalfolio::AppCommand::Recommend,
        goalfolio::AppCommand::Fund {
            scheme_code: "100001".to_string(),
        },
        goalfolio::AppCommand::Search {
            query: "fund".to_string(),
            limit: 1,
            offset: 0,
        },
        goalfolio::AppCommand::Goals,
        goalfolio::AppCommand::Available,
        goalfolio::AppCommand::Summary,
    ];

    for command in commands {
        let result = goalfolio::run_command(command, Some(config_path)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
}

#[test_log::test(tokio::test)]
async fn test_fund_command_reports_fetch_failure() {
    let mock_server = test_utils::create_mfapi_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = goalfolio::run_command(
        goalfolio::AppCommand::Fund {
            scheme_code: "100003".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("500 from the provider should fail the command");
    info!(%err, "Fund command failed as expected");
    assert!(err.to_string().contains("100003"));
}

#[test_log::test(tokio::test)]
async fn test_ranking_drops_failed_funds() {
    use goalfolio::core::aggregator::FundAggregator;
    use goalfolio::core::config::AppConfig;
    use goalfolio::providers::MfApiProvider;
    use std::sync::Arc;

    let mock_server = test_utils::create_mfapi_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let provider = Arc::new(
        MfApiProvider::new(config.mfapi_base_url(), std::time::Duration::from_secs(5)).unwrap(),
    );
    let aggregator = FundAggregator::from_config(
        provider.clone(),
        provider,
        &config.fetch,
        config.directory.ttl_hours,
    );

    let ranked = aggregator.rank(&config.universe, &|| ()).await;

    let codes: Vec<&str> = ranked.iter().map(|f| f.scheme_code.as_str()).collect();
    assert_eq!(codes, vec!["100001", "100002"]);
    assert!((ranked[0].rolling_return - 15.0).abs() < 0.01);
    assert_eq!(ranked[1].sub_category, "Debt");
}

#[test_log::test(tokio::test)]
async fn test_goals_share_investment_headroom() {
    use goalfolio::core::allocation::CandidateOrder;
    use goalfolio::core::config::AppConfig;
    use goalfolio::core::goals::{GoalService, GoalStore};
    use goalfolio::store::MemoryGoalStore;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    let config_file = test_utils::write_config("http://127.0.0.1:9");
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let store = Arc::new(MemoryGoalStore::from_config(&config, goalfolio::LOCAL_USER));
    let service = GoalService::new(store.clone(), CandidateOrder::AsGiven);

    goalfolio::cli::goals::link_configured_goals(&service, goalfolio::LOCAL_USER, &config.goals)
        .await
        .unwrap();

    let goals = service.goals_for(goalfolio::LOCAL_USER).await.unwrap();
    assert_eq!(goals[0].current_amount, Decimal::from(10_000));
    assert_eq!(goals[1].current_amount, Decimal::from(100_000));

    let rows = store.allocations().await.unwrap();
    let used_liquid: Decimal = rows
        .iter()
        .filter(|r| r.investment_id == 2)
        .map(|r| r.allocated_amount)
        .sum();
    assert_eq!(used_liquid, Decimal::from(50_000));

    let available = service.available_for(goalfolio::LOCAL_USER).await.unwrap();
    assert!(available.iter().all(|a| a.remaining_amount == Decimal::ZERO));
}

#[test_log::test(tokio::test)]
async fn test_missing_config_is_an_error() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("config.yaml");

    let result =
        goalfolio::run_command(goalfolio::AppCommand::Summary, Some(missing.to_str().unwrap()))
            .await;

    assert!(result.is_err());
}
