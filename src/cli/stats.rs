use super::ui;
use crate::service::UfService;
use crate::stats::StatsReport;
use anyhow::Result;
use comfy_table::Cell;

fn render_stats(report: &StatsReport) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell("UF (CLP)"),
        ui::header_cell("Source"),
    ]);
    for (label, quote) in [("Today", &report.today), ("Yesterday", &report.yesterday)] {
        table.add_row(vec![
            Cell::new(format!("{} ({})", label, quote.date)),
            ui::value_cell(format!("{:.2}", quote.value)),
            Cell::new(quote.source.to_string()),
        ]);
    }

    let mut sources_table = ui::new_styled_table();
    sources_table.set_header(vec![ui::header_cell("Source"), ui::header_cell("Status")]);
    for status in &report.sources {
        sources_table.add_row(vec![
            Cell::new(status.id.to_string()),
            ui::availability_cell(status.available),
        ]);
    }

    let variation_line = format!(
        "Variation: {} CLP ({}%)",
        report.variation.absolute, report.variation.percentual
    );
    let variation_styled = if report.variation.absolute >= 0.0 {
        ui::style_text(&variation_line, ui::StyleType::TotalValue)
    } else {
        ui::style_text(&variation_line, ui::StyleType::Error)
    };

    let cache_line = ui::style_text(
        &format!(
            "Cache: today {} (TTL {}h)",
            if report.cache.today_cached {
                "cached"
            } else {
                "not cached"
            },
            report.cache.ttl.as_secs() / 3600
        ),
        ui::StyleType::Subtle,
    );

    format!(
        "{}\n\n{}\n\n{}\n{}\n\n{}\n\n{}",
        ui::style_text("UF statistics", ui::StyleType::Title),
        table,
        variation_styled,
        cache_line,
        ui::style_text("Sources", ui::StyleType::Title),
        sources_table
    )
}

pub async fn run(service: &UfService) -> Result<()> {
    let report = service.get_stats().await;
    println!("{}", render_stats(&report));
    Ok(())
}
