use super::ui;
use crate::core::aggregator::{FundAggregator, FundSummary, RANKING_WINDOW_YEARS};
use crate::core::config::UniverseEntry;
use anyhow::Result;
use comfy_table::Cell;
use tracing::info;

pub fn render_rankings(funds: &[FundSummary]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Scheme"),
        ui::header_cell("Category"),
        ui::header_cell("NAV"),
        ui::header_cell("NAV Date"),
        ui::header_cell(&format!("{RANKING_WINDOW_YEARS}Y Rolling")),
    ]);

    for (rank, fund) in funds.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{}\n{}", fund.scheme_name, fund.fund_house)),
            Cell::new(format!("{} / {}", fund.category, fund.sub_category)),
            ui::format_optional_cell(fund.nav_date.map(|_| fund.nav), |n| format!("{n:.4}")),
            ui::format_optional_cell(fund.nav_date, |d| d.format("%d-%m-%Y").to_string()),
            ui::change_cell(fund.rolling_return),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Recommended Funds", ui::StyleType::Title),
        table
    )
}

pub async fn run(aggregator: &FundAggregator, universe: &[UniverseEntry]) -> Result<()> {
    let pb = ui::new_progress_bar(universe.len() as u64, true);
    pb.set_message("Fetching NAV histories...");
    let ranked = aggregator.rank(universe, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    info!(
        ranked = ranked.len(),
        universe = universe.len(),
        "Ranked fund universe"
    );
    if ranked.is_empty() {
        println!(
            "{}",
            ui::style_text("No fund data could be fetched", ui::StyleType::Error)
        );
        return Ok(());
    }
    println!("{}", render_rankings(&ranked));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::FundCategory;
    use chrono::NaiveDate;

    #[test]
    fn test_render_rankings() {
        let funds = vec![FundSummary {
            scheme_code: "122639".to_string(),
            scheme_name: "Parag Parikh Flexi Cap Fund".to_string(),
            nav: 80.1234,
            nav_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            fund_house: "PPFAS Mutual Fund".to_string(),
            category: FundCategory::Equity,
            sub_category: "Large Cap".to_string(),
            rolling_return: 18.456,
        }];

        let output = render_rankings(&funds);

        assert!(output.contains("Parag Parikh Flexi Cap Fund"));
        assert!(output.contains("Equity / Large Cap"));
        assert!(output.contains("01-03-2024"));
        assert!(output.contains("18.46%"));
    }
}
