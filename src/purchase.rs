//! Purchase transaction validation.
//!
//! A purchase runs in two steps. [`assess`] borrows the pools read-only and
//! either rejects the request or returns a [`PurchasePlan`]: the exact debit
//! and credit to perform. Applying the plan is the only step that writes.
//! Every check happens before any write, so a rejected request never leaves
//! partial state behind.
//!
//! ```
//! use corp_market::{attempt_purchase, FundsPool, Material, MaterialKind, StoragePool};
//!
//! let mut metal = Material::with_unit_size(MaterialKind::Metal, 5.0, 10.0).unwrap();
//! let storage = StoragePool::new(100.0, 90.0).unwrap();
//! let mut funds = FundsPool::new(1000.0).unwrap();
//!
//! let applied = attempt_purchase("1", &mut metal, &storage, &mut funds).unwrap();
//! assert_eq!(applied.cost, 10.0);
//! assert_eq!(funds.balance, 990.0);
//! assert_eq!(metal.quantity, 1.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_INPUT_LEN;
use crate::error::{MarketError, PurchaseError};
use crate::material::{Material, MaterialId};
use crate::pool::{FundsPool, StoragePool};
use crate::quantity::QuantityInput;

/// A proposed purchase of `quantity` units of `material`.
#[derive(Debug, Clone)]
pub struct PurchaseRequest<'a> {
    /// Stock being bought.
    pub material: &'a Material,
    /// Requested amount, unparsed.
    pub quantity: QuantityInput,
}

impl<'a> PurchaseRequest<'a> {
    /// Creates a request from any amount input.
    pub fn new(material: &'a Material, quantity: impl Into<QuantityInput>) -> Self {
        Self {
            material,
            quantity: quantity.into(),
        }
    }
}

/// The mutation a validated purchase performs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurchasePlan {
    /// Stock to credit.
    pub material_id: MaterialId,
    /// Units to credit.
    pub quantity: f64,
    /// Amount to debit.
    pub cost: f64,
    /// Storage the units occupy.
    pub required_space: f64,
}

/// Outcome of an applied purchase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Applied {
    /// Amount debited.
    pub cost: f64,
    /// Units credited.
    pub quantity: f64,
}

impl PurchasePlan {
    /// Applies the plan to the material and funds it was assessed against.
    ///
    /// Re-checks that the target material matches and the balance still
    /// covers the cost, so a stale plan cannot drive funds negative.
    ///
    /// # Errors
    ///
    /// - `MarketError::Internal` if `material` is not the one assessed
    /// - `MarketError::Purchase(InsufficientFunds)` if funds dropped since
    pub fn apply(
        &self,
        material: &mut Material,
        funds: &mut FundsPool,
    ) -> Result<Applied, MarketError> {
        if material.id != self.material_id {
            return Err(MarketError::internal(format!(
                "purchase plan for material {} applied to {}",
                self.material_id, material.id
            )));
        }
        if !funds.can_afford(self.cost) {
            return Err(PurchaseError::InsufficientFunds {
                cost: self.cost,
                balance: funds.balance,
            }
            .into());
        }
        Ok(self.commit(material, funds))
    }

    /// Writes the debit and credit. Callers must have just assessed the plan
    /// against these exact records.
    pub(crate) fn commit(&self, material: &mut Material, funds: &mut FundsPool) -> Applied {
        funds.balance -= self.cost;
        material.quantity += self.quantity;
        Applied {
            cost: self.cost,
            quantity: self.quantity,
        }
    }
}

/// Validates a request against the pools without mutating anything.
///
/// Checks run in order: input, storage capacity, funds.
///
/// # Errors
///
/// - `InvalidInput`: the quantity is negative or not a finite number
/// - `InsufficientCapacity`: `used + quantity * unit_size` exceeds capacity
/// - `InsufficientFunds`: `quantity * unit_cost` exceeds the balance
pub fn assess(
    request: &PurchaseRequest<'_>,
    storage: &StoragePool,
    funds: &FundsPool,
) -> Result<PurchasePlan, PurchaseError> {
    assess_with_limit(request, storage, funds, DEFAULT_MAX_INPUT_LEN)
}

/// [`assess`] with an explicit raw input length limit.
///
/// # Errors
///
/// See [`assess`].
pub fn assess_with_limit(
    request: &PurchaseRequest<'_>,
    storage: &StoragePool,
    funds: &FundsPool,
    max_input_len: usize,
) -> Result<PurchasePlan, PurchaseError> {
    let material = request.material;
    let result = plan(request, storage, funds, max_input_len);
    match &result {
        Ok(planned) => debug!(
            material = material.name(),
            quantity = planned.quantity,
            cost = planned.cost,
            "purchase assessed"
        ),
        Err(e) => warn!(material = material.name(), error = %e, "purchase rejected"),
    }
    result
}

fn plan(
    request: &PurchaseRequest<'_>,
    storage: &StoragePool,
    funds: &FundsPool,
    max_input_len: usize,
) -> Result<PurchasePlan, PurchaseError> {
    let material = request.material;
    let quantity = request.quantity.purchase_quantity(max_input_len)?;

    let required_space = quantity * material.unit_size;
    if !storage.fits(required_space) {
        return Err(PurchaseError::InsufficientCapacity {
            required: required_space,
            available: storage.remaining(),
        });
    }

    let cost = quantity * material.unit_cost;
    if !funds.can_afford(cost) {
        return Err(PurchaseError::InsufficientFunds {
            cost,
            balance: funds.balance,
        });
    }

    Ok(PurchasePlan {
        material_id: material.id,
        quantity,
        cost,
        required_space,
    })
}

/// Validates and applies a purchase in one step.
///
/// On success the balance drops by exactly `quantity * unit_cost` and the
/// material's held quantity grows by `quantity`. On failure nothing changes.
///
/// # Errors
///
/// See [`assess`].
pub fn attempt_purchase(
    quantity: impl Into<QuantityInput>,
    material: &mut Material,
    storage: &StoragePool,
    funds: &mut FundsPool,
) -> Result<Applied, PurchaseError> {
    let plan = {
        let request = PurchaseRequest::new(&*material, quantity);
        assess(&request, storage, funds)?
    };
    Ok(plan.commit(material, funds))
}
