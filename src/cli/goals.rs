use super::ui;
use crate::core::allocation::GoalProgress;
use crate::core::config::GoalConfig;
use crate::core::goals::GoalService;
use crate::core::portfolio::{Investment, UserId};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::info;

fn investment_name(investments: &[Investment], id: u64) -> String {
    investments
        .iter()
        .find(|i| i.id == id)
        .map_or_else(|| format!("#{id}"), |i| i.fund_name.clone())
}

pub fn render_goals(goals: &[GoalProgress], investments: &[Investment]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Goal"),
        ui::header_cell("Target"),
        ui::header_cell("Target Date"),
        ui::header_cell("Monthly SIP"),
        ui::header_cell("Allocated"),
        ui::header_cell("Progress"),
        ui::header_cell("Funded By"),
    ]);

    for goal in goals {
        let target = if goal.goal.is_capped() {
            ui::money_cell(goal.goal.target_amount)
        } else {
            Cell::new("No cap").fg(comfy_table::Color::DarkGrey)
        };
        let funded_by = goal
            .linked_investments
            .iter()
            .map(|id| investment_name(investments, *id))
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(&goal.goal.name),
            target,
            ui::format_optional_cell(goal.goal.target_date, |d| d.to_string()),
            ui::money_cell(goal.goal.monthly_sip_amount),
            ui::money_cell(goal.current_amount),
            ui::progress_cell(goal.progress),
            Cell::new(funded_by),
        ]);
    }

    format!("{}\n\n{}", ui::style_text("Goals", ui::StyleType::Title), table)
}

/// Links every configured goal to its investments, in configuration order.
pub async fn link_configured_goals(
    service: &GoalService,
    owner: UserId,
    goals: &[GoalConfig],
) -> Result<()> {
    for goal in goals {
        let progress = service
            .link_investments(owner, goal.id, &goal.investments)
            .await
            .with_context(|| format!("Failed to link investments to goal '{}'", goal.name))?;
        info!(
            goal = goal.id,
            progress = progress.progress,
            "Goal allocation updated"
        );
    }
    Ok(())
}

pub async fn run(
    service: &GoalService,
    owner: UserId,
    goals: &[GoalConfig],
    investments: &[Investment],
) -> Result<()> {
    link_configured_goals(service, owner, goals).await?;
    let progress = service.goals_for(owner).await?;
    if progress.is_empty() {
        println!(
            "{}",
            ui::style_text("No goals configured", ui::StyleType::Subtle)
        );
        return Ok(());
    }
    println!("{}", render_goals(&progress, investments));
    Ok(())
}
