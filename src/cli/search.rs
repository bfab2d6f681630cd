use super::ui;
use crate::core::aggregator::FundAggregator;
use crate::core::cache::{MIN_QUERY_LEN, SearchPage};
use anyhow::Result;
use comfy_table::Cell;

pub fn render_page(query: &str, page: &SearchPage, offset: usize) -> String {
    if page.results.is_empty() {
        return ui::style_text(&format!("No funds match '{query}'"), ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Scheme")]);
    for entry in &page.results {
        table.add_row(vec![
            Cell::new(&entry.scheme_code),
            Cell::new(&entry.scheme_name),
        ]);
    }

    let mut footer = format!(
        "Showing {}-{} of {}",
        offset + 1,
        offset + page.results.len(),
        page.total
    );
    if page.has_more {
        footer.push_str(&format!(" (next: --offset {})", offset + page.results.len()));
    }
    format!("{table}\n{}", ui::style_text(&footer, ui::StyleType::Subtle))
}

pub async fn run(
    aggregator: &FundAggregator,
    query: &str,
    limit: usize,
    offset: usize,
) -> Result<()> {
    if query.chars().count() < MIN_QUERY_LEN {
        println!(
            "{}",
            ui::style_text(
                &format!("Search needs at least {MIN_QUERY_LEN} characters"),
                ui::StyleType::Error
            )
        );
        return Ok(());
    }

    let page = aggregator.search(query, limit, offset).await;
    println!("{}", render_page(query, &page, offset));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fund::DirectoryEntry;

    #[test]
    fn test_render_page_with_more_results() {
        let page = SearchPage {
            results: vec![DirectoryEntry {
                scheme_code: "118989".to_string(),
                scheme_name: "HDFC Mid-Cap Opportunities Fund".to_string(),
            }],
            total: 4,
            has_more: true,
        };

        let output = render_page("hdfc", &page, 2);

        assert!(output.contains("118989"));
        assert!(output.contains("Showing 3-3 of 4"));
        assert!(output.contains("--offset 3"));
    }

    #[test]
    fn test_render_empty_page() {
        assert!(render_page("zzz", &SearchPage::empty(), 0).contains("No funds match 'zzz'"));
    }
}
