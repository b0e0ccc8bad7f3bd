//! Display-currency conversion.
//!
//! Every price is held in USD. At display time the amount is multiplied by
//! the rate for the requested code and rendered with a symbol prefix and a
//! grouped two-decimal value. Conversion never fails: an unknown code uses a
//! rate of 1 and the code itself as the prefix.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BASE_CURRENCY: &str = "USD";

/// USD-based multipliers, populated once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTable {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::identity()
    }
}

impl CurrencyTable {
    /// The fallback table: `{ USD: 1 }`.
    pub fn identity() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(BASE_CURRENCY.to_string(), 1.0);
        Self {
            base: BASE_CURRENCY.to_string(),
            rates,
        }
    }

    /// Build a table from fetched rates.
    ///
    /// Codes are upper-cased, non-finite or non-positive rates are dropped and
    /// USD is pinned to 1.
    pub fn from_rates(rates: BTreeMap<String, f64>) -> Self {
        let mut table = Self::identity();
        for (code, rate) in rates {
            let code = code.trim().to_uppercase();
            if code.is_empty() || code == BASE_CURRENCY || !rate.is_finite() || rate <= 0.0 {
                continue;
            }
            table.rates.insert(code, rate);
        }
        table
    }

    /// Multiplier for `code`; 1 when the code is unknown.
    pub fn rate(&self, code: &str) -> f64 {
        let code = code.trim().to_uppercase();
        if code == BASE_CURRENCY {
            return 1.0;
        }
        self.rates.get(&code).copied().unwrap_or(1.0)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(&code.trim().to_uppercase())
    }

    /// Codes in the table, sorted.
    pub fn codes(&self) -> Vec<&str> {
        self.rates.keys().map(|s| s.as_str()).collect()
    }

    pub fn convert(&self, amount_usd: f64, code: &str) -> f64 {
        amount_usd * self.rate(code)
    }
}

/// Display prefix for a currency code.
pub fn currency_prefix(code: &str) -> String {
    let code = code.trim().to_uppercase();
    let symbol = match code.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "CAD" => "C$",
        "AUD" => "A$",
        "CNY" => "CN¥",
        "CHF" => "CHF ",
        _ => return format!("{code} "),
    };
    symbol.to_string()
}

/// Format a USD amount in `code`, e.g. `"$1,234.50"` or `"-€12.00"`.
///
/// A missing or non-finite amount renders as `0.00` under the prefix.
pub fn format_amount(amount_usd: Option<f64>, code: &str, table: &CurrencyTable) -> String {
    let converted = amount_usd
        .filter(|a| a.is_finite())
        .map(|a| table.convert(a, code))
        .filter(|a| a.is_finite())
        .unwrap_or(0.0);
    let prefix = currency_prefix(code);
    let grouped = group_two_decimals(converted.abs());
    if converted < 0.0 && grouped != "0.00" {
        format!("-{prefix}{grouped}")
    } else {
        format!("{prefix}{grouped}")
    }
}

/// `1234567.891` → `"1,234,567.89"`. Input must be non-negative.
fn group_two_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}
