//! CLP/UF conversion arithmetic

use crate::core::quote::UfQuote;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyUnit {
    Clp,
    Uf,
}

impl Display for CurrencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CurrencyUnit::Clp => "CLP",
                CurrencyUnit::Uf => "UF",
            }
        )
    }
}

impl FromStr for CurrencyUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CLP" => Ok(CurrencyUnit::Clp),
            "UF" => Ok(CurrencyUnit::Uf),
            _ => Err(anyhow::anyhow!("Invalid currency unit: {}", s)),
        }
    }
}

/// Result of converting an amount through a UF quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversion {
    pub input_amount: f64,
    pub input_unit: CurrencyUnit,
    pub output_amount: f64,
    pub output_unit: CurrencyUnit,
    pub quote: UfQuote,
}

pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Pesos to UF, rounded to 4 decimal places.
pub fn clp_to_uf(amount_clp: f64, quote: &UfQuote) -> f64 {
    round_to(amount_clp / quote.value, 4)
}

/// UF to pesos, rounded to whole currency units.
pub fn uf_to_clp(amount_uf: f64, quote: &UfQuote) -> f64 {
    round_to(amount_uf * quote.value, 0)
}

pub fn convert(amount: f64, unit: CurrencyUnit, quote: UfQuote) -> Conversion {
    let (output_amount, output_unit) = match unit {
        CurrencyUnit::Clp => (clp_to_uf(amount, &quote), CurrencyUnit::Uf),
        CurrencyUnit::Uf => (uf_to_clp(amount, &quote), CurrencyUnit::Clp),
    };

    Conversion {
        input_amount: amount,
        input_unit: unit,
        output_amount,
        output_unit,
        quote,
    }
}
