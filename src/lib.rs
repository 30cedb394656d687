//! # corp-market - Typed game-state transactions for an incremental game
//!
//! This crate holds the rules behind two in-game controls, with no UI attached:
//! buying materials for a corporation's warehouse, and starting Bladeburner
//! actions.
//!
//! ## Core Concepts
//!
//! - **Material**: a stock in a warehouse, with a unit size and unit cost
//! - **StoragePool / FundsPool**: the capacity a purchase draws from
//! - **PurchasePlan**: the debit and credit a validated purchase performs
//! - **CorporationSession**: owner of funds, warehouse and research
//! - **BladeburnerState**: rank, city and actions for the start gate
//!
//! ## Usage
//!
//! ```rust
//! use corp_market::{CorporationSession, Material, MaterialKind, Warehouse};
//!
//! let mut warehouse = Warehouse::new(100.0)?;
//! warehouse.stock(Material::new(MaterialKind::Water, 2.0)?)?;
//!
//! let mut session = CorporationSession::new(1_000.0, warehouse)?;
//! session.grant_research("Bulk Purchasing");
//!
//! let receipt = session.bulk_purchase(MaterialKind::Water, "50")?;
//! assert_eq!(receipt.cost, 100.0);
//! assert_eq!(session.funds().balance, 900.0);
//! # Ok::<(), corp_market::MarketError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Corporation market
pub mod config;
pub mod error;
pub mod material;
pub mod pool;
pub mod purchase;
pub mod quantity;
pub mod quote;
pub mod session;
pub mod warehouse;

// Bladeburner
pub mod action;

// Re-export primary types at crate root for convenience
pub use action::{check_start, Action, ActionKind, ActionRef, BladeburnerState, City, StartOutcome};
pub use config::{MarketConfig, BULK_PURCHASING};
pub use error::{ActionError, MarketError, MarketResult, PurchaseError, ValidationError};
pub use material::{Material, MaterialId, MaterialKind};
pub use pool::{FundsPool, StoragePool};
pub use purchase::{assess, assess_with_limit, attempt_purchase, Applied, PurchasePlan, PurchaseRequest};
pub use quantity::{parse_quantity, QuantityInput};
pub use quote::{format_money, format_quantity, quote, PurchaseQuote};
pub use session::{CorporationSession, PurchaseReceipt};
pub use warehouse::Warehouse;
