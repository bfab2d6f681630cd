use super::ui;
use crate::core::aggregator::{FundAggregator, FundDetails};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn render_details(details: &FundDetails) -> String {
    let mut output = format!(
        "{}\n{}\n",
        ui::style_text(&details.meta.scheme_name, ui::StyleType::Title),
        ui::style_text(
            &format!(
                "{} | {} / {} | Code {}",
                details.meta.fund_house,
                details.category,
                details.sub_category,
                details.meta.scheme_code
            ),
            ui::StyleType::Subtle
        ),
    );

    if let (Some(nav), Some(date)) = (details.nav, details.nav_date) {
        output.push_str(&format!(
            "\n{} {nav:.4} ({})\n",
            ui::style_text("NAV:", ui::StyleType::TotalLabel),
            date.format("%d-%m-%Y")
        ));
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Period"), ui::header_cell("Return")]);
    for (period, value) in &details.returns {
        table.add_row(vec![Cell::new(period), ui::trailing_return_cell(*value)]);
    }
    output.push('\n');
    output.push_str(&table.to_string());
    output
}

pub async fn run(aggregator: &FundAggregator, scheme_code: &str) -> Result<()> {
    let details = aggregator
        .fund_details(scheme_code)
        .await
        .with_context(|| format!("Failed to fetch fund {scheme_code}"))?;
    println!("{}", render_details(&details));
    Ok(())
}
