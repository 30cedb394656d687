//! Live purchase previews.
//!
//! A quote is what the player sees under the amount field while typing:
//! either a price or the reason the amount won't work. Quotes check input and
//! storage only; affordability is decided when the purchase is attempted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_INPUT_LEN;
use crate::material::Material;
use crate::pool::StoragePool;
use crate::quantity::QuantityInput;

/// Preview of a bulk purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PurchaseQuote {
    Invalid,
    InsufficientCapacity {
        required: f64,
        available: f64,
    },
    Priced {
        material: String,
        quantity: f64,
        cost: f64,
    },
}

impl PurchaseQuote {
    /// Returns true if the amount is valid and fits in storage.
    #[must_use]
    pub const fn is_priced(&self) -> bool {
        matches!(self, Self::Priced { .. })
    }
}

impl fmt::Display for PurchaseQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str("Invalid input for Bulk Purchase amount"),
            Self::InsufficientCapacity { .. } => {
                f.write_str("Not enough warehouse space to purchase this amount")
            }
            Self::Priced {
                material,
                quantity,
                cost,
            } => write!(
                f,
                "Purchasing {} of {material} will cost {}",
                format_quantity(*quantity),
                format_money(*cost)
            ),
        }
    }
}

/// Builds the preview for buying `input` units of `material`.
#[must_use]
pub fn quote(input: impl Into<QuantityInput>, material: &Material, storage: &StoragePool) -> PurchaseQuote {
    quote_with_limit(&input.into(), material, storage, DEFAULT_MAX_INPUT_LEN)
}

pub(crate) fn quote_with_limit(
    input: &QuantityInput,
    material: &Material,
    storage: &StoragePool,
    max_input_len: usize,
) -> PurchaseQuote {
    let Ok(quantity) = input.purchase_quantity(max_input_len) else {
        return PurchaseQuote::Invalid;
    };

    let required = quantity * material.unit_size;
    if !storage.fits(required) {
        return PurchaseQuote::InsufficientCapacity {
            required,
            available: storage.remaining(),
        };
    }

    PurchaseQuote::Priced {
        material: material.name().to_string(),
        quantity,
        cost: quantity * material.unit_cost,
    }
}

/// Formats a quantity with thousands separators and two decimals, e.g.
/// `1234.5` as `1,234.50`.
#[must_use]
pub fn format_quantity(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

const MONEY_SUFFIXES: [(f64, &str); 4] = [(1e12, "t"), (1e9, "b"), (1e6, "m"), (1e3, "k")];

/// Formats currency with three decimals and a magnitude suffix, e.g.
/// `1500.0` as `$1.500k`.
#[must_use]
pub fn format_money(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = MONEY_SUFFIXES
        .iter()
        .find(|(threshold, _)| abs >= *threshold)
        .map_or((abs, ""), |(threshold, suffix)| (abs / threshold, *suffix));

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${scaled:.3}{suffix}")
}
