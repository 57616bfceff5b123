use super::ui;
use crate::history::UfHistory;
use crate::service::UfService;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

fn render_history(history: &UfHistory) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("UF (CLP)"),
        ui::header_cell("Source"),
    ]);

    for quote in &history.quotes {
        let source = if quote.succeeded {
            Cell::new(quote.source.to_string())
        } else {
            Cell::new(quote.source.to_string()).fg(comfy_table::Color::Red)
        };
        table.add_row(vec![
            Cell::new(quote.date.to_string()),
            ui::value_cell(format!("{:.2}", quote.value)),
            source,
        ]);
    }

    let mut output = format!(
        "{} ({} to {}, {} days)\n\n{}",
        ui::style_text("UF history", ui::StyleType::Title),
        history.start,
        history.end,
        history.quotes.len(),
        table
    );

    output.push_str(&format!(
        "\n\n{} avg {} | max {} | min {}",
        ui::style_text("Stats:", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.2}", history.stats.average), ui::StyleType::TotalValue),
        ui::style_text(&format!("{:.2}", history.stats.max), ui::StyleType::TotalValue),
        ui::style_text(&format!("{:.2}", history.stats.min), ui::StyleType::TotalValue),
    ));

    output
}

pub async fn run(service: &UfService, start: NaiveDate, end: NaiveDate) -> Result<()> {
    let days = (end - start).num_days().max(0) as u64 + 1;
    let pb = ui::new_progress_bar(days, true);
    pb.set_message("Fetching UF values...");

    let result = service
        .get_history_with_progress(start, end, &|| pb.inc(1))
        .await;
    pb.finish_and_clear();

    let history = result?;
    println!("{}", render_history(&history));
    Ok(())
}
