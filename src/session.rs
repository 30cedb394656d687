//! Corporation session: the owner of funds, warehouse and research.
//!
//! The session is the single mutator of its pools. Each operation borrows the
//! pools read-only to validate, then applies the resulting plan, so there is
//! never a window where a failed request has written anything.

use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::error::{MarketError, MarketResult, PurchaseError, ValidationError};
use crate::material::{MaterialId, MaterialKind};
use crate::pool::FundsPool;
use crate::purchase::{assess_with_limit, PurchaseRequest};
use crate::quantity::QuantityInput;
use crate::quote::{quote_with_limit, PurchaseQuote};
use crate::warehouse::Warehouse;

/// Audit record of an applied bulk purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Unique receipt id.
    pub id: Uuid,
    /// When the purchase was applied.
    pub timestamp: DateTime<Utc>,
    /// Stock that was credited.
    pub material_id: MaterialId,
    /// Kind of the credited stock.
    pub material: MaterialKind,
    /// Units bought.
    pub quantity: f64,
    /// Amount debited.
    pub cost: f64,
    /// Balance left after the debit.
    pub balance_after: f64,
}

/// A player's corporation as seen by the materials market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporationSession {
    funds: FundsPool,
    warehouse: Warehouse,
    #[serde(default)]
    research: BTreeSet<String>,
    #[serde(default)]
    receipts: VecDeque<PurchaseReceipt>,
    #[serde(default)]
    config: MarketConfig,
}

impl CorporationSession {
    /// Creates a session with the default config.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `funds` is negative or the warehouse is
    /// inconsistent.
    pub fn new(funds: f64, warehouse: Warehouse) -> Result<Self, ValidationError> {
        Self::with_config(funds, warehouse, MarketConfig::default())
    }

    /// Creates a session with an explicit config.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if any part is invalid.
    pub fn with_config(
        funds: f64,
        warehouse: Warehouse,
        config: MarketConfig,
    ) -> Result<Self, ValidationError> {
        let session = Self {
            funds: FundsPool::new(funds)?,
            warehouse,
            research: BTreeSet::new(),
            receipts: VecDeque::new(),
            config,
        };
        session.validate()?;
        Ok(session)
    }

    /// Current funds.
    #[must_use]
    pub const fn funds(&self) -> &FundsPool {
        &self.funds
    }

    /// The warehouse purchases are stored in.
    #[must_use]
    pub const fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    /// Mutable warehouse access, for stocking and upgrades.
    pub fn warehouse_mut(&mut self) -> &mut Warehouse {
        &mut self.warehouse
    }

    /// Active market settings.
    #[must_use]
    pub const fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Adds income.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `amount` is negative or not finite.
    pub fn deposit(&mut self, amount: f64) -> Result<(), ValidationError> {
        self.funds.deposit(amount)
    }

    /// Marks a research as completed.
    pub fn grant_research(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(research = %name, "research granted");
        self.research.insert(name);
    }

    /// Returns true if `name` has been researched.
    #[must_use]
    pub fn has_research(&self, name: &str) -> bool {
        self.research.contains(name)
    }

    /// Returns true if bulk purchases are unlocked.
    #[must_use]
    pub fn can_bulk_purchase(&self) -> bool {
        self.has_research(&self.config.bulk_purchase_research)
    }

    /// Applied purchases, oldest first.
    pub fn receipts(&self) -> impl Iterator<Item = &PurchaseReceipt> {
        self.receipts.iter()
    }

    /// Buys `input` units of `kind` right now.
    ///
    /// A zero amount succeeds without touching funds, stock or history.
    ///
    /// # Errors
    ///
    /// - `ResearchRequired` if bulk purchasing is not unlocked
    /// - `MaterialNotFound` if the warehouse doesn't carry `kind`
    /// - `Purchase(..)` for invalid input, lack of space, or lack of funds
    pub fn bulk_purchase(
        &mut self,
        kind: MaterialKind,
        input: impl Into<QuantityInput>,
    ) -> MarketResult<PurchaseReceipt> {
        if !self.can_bulk_purchase() {
            return Err(MarketError::ResearchRequired {
                research: self.config.bulk_purchase_research.clone(),
            });
        }

        let storage = self.warehouse.storage_pool();
        let plan = {
            let request = PurchaseRequest::new(self.warehouse.require(kind)?, input);
            assess_with_limit(&request, &storage, &self.funds, self.config.max_input_len)?
        };
        if !self.warehouse.fits_after(kind, plan.quantity) {
            warn!(material = %kind, quantity = plan.quantity, "purchase rejected at capacity boundary");
            return Err(PurchaseError::InsufficientCapacity {
                required: plan.required_space,
                available: storage.remaining(),
            }
            .into());
        }

        let material = self
            .warehouse
            .material_mut(kind)
            .ok_or(MarketError::MaterialNotFound { kind })?;
        let applied = plan.apply(material, &mut self.funds)?;

        let receipt = PurchaseReceipt {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            material_id: plan.material_id,
            material: kind,
            quantity: applied.quantity,
            cost: applied.cost,
            balance_after: self.funds.balance,
        };
        info!(
            material = %kind,
            quantity = applied.quantity,
            cost = applied.cost,
            balance = self.funds.balance,
            "bulk purchase applied"
        );
        self.record(receipt.clone());
        Ok(receipt)
    }

    fn record(&mut self, receipt: PurchaseReceipt) {
        if self.config.receipt_history_limit == 0 || receipt.quantity <= 0.0 {
            return;
        }
        while self.receipts.len() >= self.config.receipt_history_limit {
            self.receipts.pop_front();
        }
        self.receipts.push_back(receipt);
    }

    /// Previews a bulk purchase of `input` units of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `MaterialNotFound` if the warehouse doesn't carry `kind`.
    pub fn quote(
        &self,
        kind: MaterialKind,
        input: impl Into<QuantityInput>,
    ) -> MarketResult<PurchaseQuote> {
        let material = self.warehouse.require(kind)?;
        let storage = self.warehouse.storage_pool();
        let quote = quote_with_limit(&input.into(), material, &storage, self.config.max_input_len);
        match quote {
            PurchaseQuote::Priced { quantity, .. } if !self.warehouse.fits_after(kind, quantity) => {
                Ok(PurchaseQuote::InsufficientCapacity {
                    required: quantity * material.unit_size,
                    available: storage.remaining(),
                })
            }
            other => Ok(other),
        }
    }

    /// Sets how many units of `kind` are bought every second.
    ///
    /// Funds and space are not checked here; the production tick charges
    /// for whatever it manages to buy.
    ///
    /// # Errors
    ///
    /// - `MaterialNotFound` if the warehouse doesn't carry `kind`
    /// - `Purchase(InvalidInput)` if the rate is negative or not a number
    pub fn set_buy_rate(
        &mut self,
        kind: MaterialKind,
        input: impl Into<QuantityInput>,
    ) -> MarketResult<f64> {
        let input = input.into();
        let material = self
            .warehouse
            .material_mut(kind)
            .ok_or(MarketError::MaterialNotFound { kind })?;
        let rate = input.buy_rate(self.config.max_input_len).map_err(|e| {
            warn!(material = %kind, error = %e, "buy rate rejected");
            e
        })?;
        material.buy_rate = rate;
        info!(material = %kind, rate, "buy rate set");
        Ok(rate)
    }

    /// Stops automatic buying of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `MaterialNotFound` if the warehouse doesn't carry `kind`.
    pub fn clear_buy_rate(&mut self, kind: MaterialKind) -> MarketResult<()> {
        let material = self
            .warehouse
            .material_mut(kind)
            .ok_or(MarketError::MaterialNotFound { kind })?;
        material.buy_rate = 0.0;
        info!(material = %kind, "buy rate cleared");
        Ok(())
    }

    /// Checks all invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.funds.validate()?;
        self.warehouse.validate()?;
        self.config.validate()
    }

    /// Serializes the session to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Persistence` if serialization fails.
    pub fn to_json_pretty(&self) -> MarketResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MarketError::persistence(format!("serialize session: {e}")))
    }

    /// Deserializes and validates a session.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Persistence` for malformed JSON and
    /// `MarketError::Validation` if the decoded state breaks an invariant.
    pub fn from_json(s: &str) -> MarketResult<Self> {
        let session: Self = serde_json::from_str(s)
            .map_err(|e| MarketError::persistence(format!("deserialize session: {e}")))?;
        session.validate()?;
        Ok(session)
    }

    /// Writes the session snapshot to `path`.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Persistence` on serialization or I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> MarketResult<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json)
            .map_err(|e| MarketError::persistence(format!("write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Reads a session snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::Persistence` on I/O or decode failure and
    /// `MarketError::Validation` for inconsistent state.
    pub fn load(path: impl AsRef<Path>) -> MarketResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| MarketError::persistence(format!("read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}
