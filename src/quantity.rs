//! Quantity input parsing.
//!
//! Amounts arrive either as raw text typed by the player or as numbers
//! computed elsewhere (which may still be NaN). Both funnel through the same
//! checks so that bulk purchases and buy rates agree on what a valid amount is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_INPUT_LEN;
use crate::error::PurchaseError;

/// A proposed amount, not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    /// An already-numeric amount.
    Number(f64),
    /// Raw text from an input field.
    Text(String),
}

impl QuantityInput {
    fn invalid(&self) -> PurchaseError {
        PurchaseError::InvalidInput {
            input: self.to_string(),
        }
    }

    /// Parses to a finite number, with no sign constraint.
    ///
    /// Text is trimmed and must be a complete decimal literal: trailing
    /// garbage such as `"12abc"` is rejected rather than truncated.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::InvalidInput` for empty, oversized, unparsable
    /// or non-finite input.
    pub fn parse_finite(&self, max_len: usize) -> Result<f64, PurchaseError> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.len() > max_len {
                    return Err(self.invalid());
                }
                trimmed.parse::<f64>().map_err(|_| self.invalid())?
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.invalid())
        }
    }

    /// Parses an amount to buy right now. Zero is a valid no-op purchase.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::InvalidInput` if the amount is negative or not
    /// a finite number.
    pub fn purchase_quantity(&self, max_len: usize) -> Result<f64, PurchaseError> {
        self.non_negative(max_len)
    }

    /// Parses a per-second buy rate. Zero is allowed and means "stop buying".
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::InvalidInput` if the rate is negative or not a
    /// finite number.
    pub fn buy_rate(&self, max_len: usize) -> Result<f64, PurchaseError> {
        self.non_negative(max_len)
    }

    fn non_negative(&self, max_len: usize) -> Result<f64, PurchaseError> {
        let value = self.parse_finite(max_len)?;
        if value >= 0.0 {
            // -0.0 parses fine; hand out a plain zero.
            Ok(value.abs())
        } else {
            Err(self.invalid())
        }
    }
}

impl Default for QuantityInput {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for QuantityInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for QuantityInput {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for QuantityInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for QuantityInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parses a purchase quantity using the default input length limit.
///
/// # Errors
///
/// See [`QuantityInput::purchase_quantity`].
pub fn parse_quantity(input: impl Into<QuantityInput>) -> Result<f64, PurchaseError> {
    input.into().purchase_quantity(DEFAULT_MAX_INPUT_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = DEFAULT_MAX_INPUT_LEN;

    #[test]
    fn test_parses_plain_numbers() {
        assert_eq!(parse_quantity("1").unwrap(), 1.0);
        assert_eq!(parse_quantity(" 2.5 ").unwrap(), 2.5);
        assert_eq!(parse_quantity("1e3").unwrap(), 1000.0);
        assert_eq!(parse_quantity(0.25).unwrap(), 0.25);
    }

    #[test]
    fn test_rejects_garbage() {
        for raw in ["abc", "", "   ", "12abc", "1,000", "--1"] {
            let err = parse_quantity(raw).unwrap_err();
            assert!(
                matches!(&err, PurchaseError::InvalidInput { input } if input == raw),
                "expected InvalidInput for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(parse_quantity(f64::NAN).is_err());
        assert!(parse_quantity(f64::INFINITY).is_err());
        assert!(parse_quantity("inf").is_err());
        assert!(parse_quantity("NaN").is_err());
    }

    #[test]
    fn test_purchase_allows_zero_rejects_negative() {
        assert_eq!(parse_quantity("0").unwrap(), 0.0);
        assert_eq!(parse_quantity(-0.0).unwrap().to_bits(), 0.0f64.to_bits());
        assert!(parse_quantity("-5").is_err());
        assert!(parse_quantity(-0.001).is_err());
    }

    #[test]
    fn test_buy_rate_allows_zero() {
        assert_eq!(QuantityInput::from("0").buy_rate(MAX).unwrap(), 0.0);
        assert_eq!(QuantityInput::from(-0.0).buy_rate(MAX).unwrap().to_bits(), 0.0f64.to_bits());
        assert_eq!(QuantityInput::from("12.5").buy_rate(MAX).unwrap(), 12.5);
        assert!(QuantityInput::from("-1").buy_rate(MAX).is_err());
    }

    #[test]
    fn test_rejects_oversized_text() {
        let long = "1".repeat(MAX + 1);
        assert!(QuantityInput::from(long.as_str()).parse_finite(MAX).is_err());
        let ok = "1".repeat(MAX);
        assert!(QuantityInput::from(ok.as_str()).parse_finite(MAX).is_ok());
    }

    #[test]
    fn test_untagged_serde() {
        let n: QuantityInput = serde_json::from_str("5.5").unwrap();
        assert_eq!(n, QuantityInput::Number(5.5));
        let t: QuantityInput = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(t, QuantityInput::Text("7".to_string()));
    }
}
