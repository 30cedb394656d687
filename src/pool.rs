//! Capacity pools a purchase draws from.
//!
//! - [`StoragePool`]: warehouse space, `0 <= used <= capacity`
//! - [`FundsPool`]: currency, `balance >= 0`

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::material::{finite, non_negative};

/// Capacity/used accounting for a warehouse-like container.
///
/// # Examples
///
/// ```
/// use corp_market::StoragePool;
///
/// let pool = StoragePool::new(100.0, 90.0).unwrap();
/// assert_eq!(pool.remaining(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoragePool {
    /// Total space.
    pub capacity: f64,
    /// Space already taken.
    pub used: f64,
}

impl StoragePool {
    /// Creates a pool, checking `0 <= used <= capacity`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if either value is negative, not finite, or
    /// `used` exceeds `capacity`.
    pub fn new(capacity: f64, used: f64) -> Result<Self, ValidationError> {
        let pool = Self { capacity, used };
        pool.validate()?;
        Ok(pool)
    }

    /// An empty pool of the given capacity.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `capacity` is negative or not finite.
    pub fn empty(capacity: f64) -> Result<Self, ValidationError> {
        Self::new(capacity, 0.0)
    }

    /// Free space left.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.capacity - self.used).max(0.0)
    }

    /// Returns true if `space` more units of storage fit.
    ///
    /// Compares the post-purchase total `used + space` against capacity, the
    /// same sum the caller stores afterwards.
    #[must_use]
    pub fn fits(&self, space: f64) -> bool {
        self.used + space <= self.capacity
    }

    /// Checks the pool invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        finite("capacity", self.capacity)?;
        finite("used", self.used)?;
        non_negative("capacity", self.capacity)?;
        non_negative("used", self.used)?;
        if self.used > self.capacity {
            return Err(ValidationError::StorageOverflow {
                used: self.used,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// The player's available currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundsPool {
    /// Spendable currency.
    pub balance: f64,
}

impl FundsPool {
    /// Creates a funds pool.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `balance` is negative or not finite.
    pub fn new(balance: f64) -> Result<Self, ValidationError> {
        let pool = Self { balance };
        pool.validate()?;
        Ok(pool)
    }

    /// Returns true if `cost` can be paid without going negative.
    #[must_use]
    pub fn can_afford(&self, cost: f64) -> bool {
        cost <= self.balance
    }

    /// Adds income to the balance.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `amount` is negative or not finite, or
    /// the new balance overflows.
    pub fn deposit(&mut self, amount: f64) -> Result<(), ValidationError> {
        finite("amount", amount)?;
        non_negative("amount", amount)?;
        let balance = self.balance + amount;
        finite("balance", balance)?;
        self.balance = balance;
        Ok(())
    }

    /// Checks the pool invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        finite("balance", self.balance)?;
        non_negative("balance", self.balance)
    }
}
