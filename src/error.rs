//! Error types for the corporation market.
//!
//! All errors are strongly typed using thiserror. Purchase rejections are
//! ordinary user-input outcomes: each one carries the numbers involved and a
//! short notification text via [`PurchaseError::user_message`].

use thiserror::Error;

use crate::material::MaterialKind;

/// Reasons a purchase request is rejected.
///
/// None of these are fatal. The pools are untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("Invalid purchase amount: '{input}'")]
    InvalidInput {
        input: String,
    },

    #[error("Not enough storage: purchase needs {required} but only {available} is free")]
    InsufficientCapacity {
        required: f64,
        available: f64,
    },

    #[error("Insufficient funds: purchase costs {cost} but balance is {balance}")]
    InsufficientFunds {
        cost: f64,
        balance: f64,
    },
}

impl PurchaseError {
    /// Text suitable for a notification dialog.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Invalid input amount",
            Self::InsufficientCapacity { .. } => {
                "You do not have enough warehouse size to fit this purchase"
            }
            Self::InsufficientFunds { .. } => "You cannot afford this purchase.",
        }
    }
}

/// Record invariant violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' must be a finite number, got {value}")]
    NonFinite {
        field: String,
        value: f64,
    },

    #[error("Unit size must be positive, got {value}")]
    NonPositiveUnitSize {
        value: f64,
    },

    #[error("Field '{field}' cannot be negative, got {value}")]
    Negative {
        field: String,
        value: f64,
    },

    #[error("Storage used ({used}) exceeds capacity ({capacity})")]
    StorageOverflow {
        used: f64,
        capacity: f64,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Field '{field}' cannot be empty")]
    Empty {
        field: String,
    },

    #[error("Unknown material: {name}")]
    UnknownMaterial {
        name: String,
    },
}

/// Reasons a Bladeburner action cannot be started.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("Unknown action: {name}")]
    UnknownAction {
        name: String,
    },

    #[error("No remaining count for action '{name}'")]
    NoneRemaining {
        name: String,
    },

    #[error("Action '{name}' needs communities in {city}")]
    NoCommunities {
        name: String,
        city: String,
    },

    #[error("Action '{name}' requires rank {required}, current rank is {rank}")]
    RankTooLow {
        name: String,
        required: f64,
        rank: f64,
    },
}

/// Top-level error type for the market.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Purchase rejected: {0}")]
    Purchase(#[from] PurchaseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Research '{research}' is required")]
    ResearchRequired {
        research: String,
    },

    #[error("Material not found in warehouse: {kind}")]
    MaterialNotFound {
        kind: MaterialKind,
    },

    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl MarketError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a persistence error.
    #[must_use]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Returns true if this is a purchase rejection.
    #[must_use]
    pub const fn is_purchase(&self) -> bool {
        matches!(self, Self::Purchase(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an action error.
    #[must_use]
    pub const fn is_action(&self) -> bool {
        matches!(self, Self::Action(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if the player caused this and can fix it by changing input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Purchase(_)
            | Self::Action(_)
            | Self::ResearchRequired { .. }
            | Self::MaterialNotFound { .. } => true,
            Self::Validation(_) | Self::Persistence { .. } | Self::Internal { .. } => false,
        }
    }

    /// Notification text for the player, if this error is meant to be shown.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Purchase(e) => Some(e.user_message().to_string()),
            Self::Action(e) => Some(e.to_string()),
            Self::ResearchRequired { research } => {
                Some(format!("You need the '{research}' research to do this."))
            }
            Self::MaterialNotFound { kind } => {
                Some(format!("This warehouse does not hold {kind}."))
            }
            _ => None,
        }
    }
}

/// Result type alias for market operations.
pub type MarketResult<T> = Result<T, MarketError>;
