//! Fetched rate values and the per-run snapshot.

use std::fmt;

/// Placeholder rendered when a rate could not be fetched.
pub const UNAVAILABLE: &str = "unavailable";

/// A formatted rate, or the marker for a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Quote {
    /// Value already formatted for display
    Available(String),
    #[default]
    Unavailable,
}

impl Quote {
    /// Two decimals, no grouping (e.g. `90.12`).
    pub fn fixed(value: f64) -> Self {
        Quote::Available(format!("{:.2}", value))
    }

    /// Two decimals with thousands separators (e.g. `65,000.00`).
    pub fn grouped(value: f64) -> Self {
        Quote::Available(format_grouped(value))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Quote::Available(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Quote::Available(value) => value,
            Quote::Unavailable => UNAVAILABLE,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format with two decimals and comma-separated thousands.
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Rates collected for one report. Every field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RateSnapshot {
    /// RUB per 1 USD
    pub usd_rub: Quote,
    /// Bitcoin price in USD
    pub btc_usd: Quote,
    /// Ethereum price in USD
    pub eth_usd: Quote,
}

impl RateSnapshot {
    pub fn new(usd_rub: Quote, btc_usd: Quote, eth_usd: Quote) -> Self {
        Self {
            usd_rub,
            btc_usd,
            eth_usd,
        }
    }

    /// Number of values that were fetched successfully.
    pub fn available_count(&self) -> usize {
        [&self.usd_rub, &self.btc_usd, &self.eth_usd]
            .iter()
            .filter(|q| q.is_available())
            .count()
    }
}
