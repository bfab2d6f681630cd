use super::ui;
use crate::core::analytics::{self, PortfolioSummary};
use crate::core::portfolio::Investment;
use anyhow::Result;
use comfy_table::Cell;

impl PortfolioSummary {
    pub fn display_as_table(&self) -> String {
        let mut output = format!(
            "{}\n\n",
            ui::style_text("Portfolio Summary", ui::StyleType::Title)
        );

        let mut totals = ui::new_styled_table();
        totals.set_header(vec![
            ui::header_cell("Invested"),
            ui::header_cell("Current"),
            ui::header_cell("Returns"),
            ui::header_cell("Return (%)"),
        ]);
        totals.add_row(vec![
            ui::money_cell(self.total_invested),
            ui::money_cell(self.total_current),
            ui::money_cell(self.total_returns),
            ui::change_cell(self.return_percentage),
        ]);
        output.push_str(&totals.to_string());

        if !self.asset_allocation.is_empty() {
            let mut allocation = ui::new_styled_table();
            allocation.set_header(vec![
                ui::header_cell("Asset Type"),
                ui::header_cell("Value"),
                ui::header_cell("Weight (%)"),
            ]);
            for asset in &self.asset_allocation {
                allocation.add_row(vec![
                    Cell::new(&asset.investment_type),
                    ui::money_cell(asset.value),
                    ui::format_optional_cell(Some(asset.percentage), |w| format!("{w:.2}%")),
                ]);
            }
            output.push_str("\n\n");
            output.push_str(&allocation.to_string());
        }

        if !self.top_gainers.is_empty() {
            let mut gainers = ui::new_styled_table();
            gainers.set_header(vec![
                ui::header_cell("Top Gainers"),
                ui::header_cell("Type"),
                ui::header_cell("Gain"),
                ui::header_cell("Return (%)"),
            ]);
            for performer in &self.top_gainers {
                gainers.add_row(vec![
                    Cell::new(&performer.fund_name),
                    Cell::new(&performer.investment_type),
                    ui::money_cell(performer.absolute_return),
                    ui::change_cell(performer.return_percentage),
                ]);
            }
            output.push_str("\n\n");
            output.push_str(&gainers.to_string());
        }

        if let (Some(best), Some(worst)) = (&self.best, &self.worst) {
            output.push_str(&format!(
                "\n\nBest: {} ({:.2}%)  Worst: {} ({:.2}%)",
                best.fund_name, best.return_percentage, worst.fund_name, worst.return_percentage
            ));
        }

        output.push_str(&format!(
            "\n{} {}  {} {:.0}/100",
            ui::style_text("Risk:", ui::StyleType::TotalLabel),
            self.risk_level,
            ui::style_text("Diversification:", ui::StyleType::TotalLabel),
            self.diversification_score
        ));
        output
    }
}

pub fn run(investments: &[Investment]) -> Result<()> {
    let summary = analytics::portfolio_summary(investments);
    println!("{}", summary.display_as_table());
    Ok(())
}
