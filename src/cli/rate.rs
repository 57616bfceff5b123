use super::ui;
use crate::core::quote::UfQuote;
use crate::service::UfService;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

fn render_quote(quote: &UfQuote) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("UF (CLP)"),
        ui::header_cell("Source"),
    ]);
    table.add_row(vec![
        Cell::new(quote.date.to_string()),
        ui::value_cell(format!("{:.2}", quote.value)),
        Cell::new(quote.source.to_string()),
    ]);

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("UF value", ui::StyleType::Title),
        table
    );
    if !quote.succeeded {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                "Warning: no source reachable, showing the default value",
                ui::StyleType::Error
            )
        ));
    }
    output
}

pub async fn run(service: &UfService, date: Option<NaiveDate>) -> Result<()> {
    let quote = service.get_rate(date).await;
    println!("{}", render_quote(&quote));
    Ok(())
}
