//! Market configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, ValidationError};

/// Longest raw amount text accepted from the player.
pub const DEFAULT_MAX_INPUT_LEN: usize = 64;

/// Research that unlocks instant bulk purchases.
pub const BULK_PURCHASING: &str = "Bulk Purchasing";

/// Tunables for a [`CorporationSession`](crate::CorporationSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Research name gating bulk purchases.
    pub bulk_purchase_research: String,
    /// Maximum length of raw amount input.
    pub max_input_len: usize,
    /// Number of purchase receipts kept; oldest are dropped first.
    pub receipt_history_limit: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            bulk_purchase_research: BULK_PURCHASING.to_string(),
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            receipt_history_limit: 256,
        }
    }
}

impl MarketConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Persistence` for malformed JSON and
    /// `MarketError::Validation` for out-of-range values.
    pub fn from_json(s: &str) -> Result<Self, MarketError> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| MarketError::persistence(format!("deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bulk_purchase_research.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "bulk_purchase_research".to_string(),
            });
        }
        if self.max_input_len == 0 {
            return Err(ValidationError::Empty {
                field: "max_input_len".to_string(),
            });
        }
        Ok(())
    }
}
