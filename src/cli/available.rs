use super::ui;
use crate::core::allocation::AvailableInvestment;
use crate::core::config::GoalConfig;
use crate::core::goals::GoalService;
use crate::core::portfolio::UserId;
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

pub fn render_available(available: &[AvailableInvestment]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Investment"),
        ui::header_cell("Type"),
        ui::header_cell("Current Value"),
        ui::header_cell("Available"),
    ]);

    for entry in available {
        table.add_row(vec![
            Cell::new(&entry.investment.fund_name),
            Cell::new(&entry.investment.investment_type),
            ui::money_cell(entry.investment.current_value),
            ui::money_cell(entry.remaining_amount),
        ]);
    }

    let total: Decimal = available.iter().map(|a| a.remaining_amount).sum();
    format!(
        "{}\n\n{}\n\n{} {}",
        ui::style_text("Available Investments", ui::StyleType::Title),
        table,
        ui::style_text("Unallocated:", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.2}", total.round_dp(2)), ui::StyleType::TotalValue)
    )
}

pub async fn run(service: &GoalService, owner: UserId, goals: &[GoalConfig]) -> Result<()> {
    super::goals::link_configured_goals(service, owner, goals).await?;
    let available = service.available_for(owner).await?;
    println!("{}", render_available(&available));
    Ok(())
}
