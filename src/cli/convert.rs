use super::ui;
use crate::core::CurrencyUnit;
use crate::core::convert::Conversion;
use crate::service::UfService;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

fn format_amount(amount: f64, unit: CurrencyUnit) -> String {
    match unit {
        // Whole pesos, fractional UF
        CurrencyUnit::Clp => format!("{amount:.0} CLP"),
        CurrencyUnit::Uf => format!("{amount:.4} UF"),
    }
}

fn render_conversion(conversion: &Conversion) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Input"),
        ui::header_cell("Output"),
        ui::header_cell("UF rate"),
        ui::header_cell("Rate date"),
        ui::header_cell("Rate source"),
    ]);
    table.add_row(vec![
        ui::value_cell(format_amount(conversion.input_amount, conversion.input_unit)),
        ui::value_cell(format_amount(
            conversion.output_amount,
            conversion.output_unit,
        )),
        ui::value_cell(format!("{:.2}", conversion.quote.value)),
        Cell::new(conversion.quote.date.to_string()),
        Cell::new(conversion.quote.source.to_string()),
    ]);

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("Conversion", ui::StyleType::Title),
        table
    );
    if !conversion.quote.succeeded {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                "Warning: conversion used the default UF value",
                ui::StyleType::Error
            )
        ));
    }
    output
}

pub async fn run(
    service: &UfService,
    amount: f64,
    unit: CurrencyUnit,
    date: Option<NaiveDate>,
) -> Result<()> {
    anyhow::ensure!(amount >= 0.0, "Amount must not be negative");

    let conversion = service.convert(amount, unit, date).await;
    println!("{}", render_conversion(&conversion));
    Ok(())
}
