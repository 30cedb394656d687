//! Warehouses: material stocks plus the space they share.
//!
//! Used space is never stored. It is recomputed from the held quantities, so
//! crediting a material after a purchase automatically consumes storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult, ValidationError};
use crate::material::{finite, non_negative, Material, MaterialKind};
use crate::pool::StoragePool;

/// A warehouse holding at most one stock per material kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    capacity: f64,
    materials: BTreeMap<MaterialKind, Material>,
}

impl Warehouse {
    /// Creates an empty warehouse.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `capacity` is negative or not finite.
    pub fn new(capacity: f64) -> Result<Self, ValidationError> {
        finite("capacity", capacity)?;
        non_negative("capacity", capacity)?;
        Ok(Self {
            capacity,
            materials: BTreeMap::new(),
        })
    }

    /// Total storage space.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Space occupied by all held materials.
    #[must_use]
    pub fn size_used(&self) -> f64 {
        self.materials.values().map(Material::occupied_space).sum()
    }

    /// Space that would be occupied after `extra` more units of `kind`.
    ///
    /// Summed in the same order and with the same products as
    /// [`size_used`](Self::size_used) will compute once the units are
    /// credited, so `used_after(kind, q) <= capacity` holds exactly after the
    /// purchase.
    #[must_use]
    pub fn used_after(&self, kind: MaterialKind, extra: f64) -> f64 {
        self.materials
            .values()
            .map(|m| {
                if m.kind == kind {
                    (m.quantity + extra) * m.unit_size
                } else {
                    m.occupied_space()
                }
            })
            .sum()
    }

    /// Returns true if `extra` more units of a carried `kind` fit.
    #[must_use]
    pub fn fits_after(&self, kind: MaterialKind, extra: f64) -> bool {
        self.used_after(kind, extra) <= self.capacity
    }

    /// Snapshot of the warehouse as a storage pool.
    #[must_use]
    pub fn storage_pool(&self) -> StoragePool {
        StoragePool {
            capacity: self.capacity,
            used: self.size_used(),
        }
    }

    /// Expands the warehouse by `extra` units of space.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `extra` is negative or not finite, or
    /// the new capacity overflows.
    pub fn upgrade(&mut self, extra: f64) -> Result<(), ValidationError> {
        finite("extra", extra)?;
        non_negative("extra", extra)?;
        let capacity = self.capacity + extra;
        finite("capacity", capacity)?;
        self.capacity = capacity;
        Ok(())
    }

    /// Adds a material stock, replacing any previous stock of the same kind.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the material is malformed or the stock
    /// would not fit.
    pub fn stock(&mut self, material: Material) -> Result<Option<Material>, ValidationError> {
        material.validate()?;
        let kind = material.kind;
        let previous = self.materials.insert(kind, material);
        let used = self.size_used();
        if used > self.capacity {
            match previous {
                Some(old) => self.materials.insert(kind, old),
                None => self.materials.remove(&kind),
            };
            return Err(ValidationError::StorageOverflow {
                used,
                capacity: self.capacity,
            });
        }
        Ok(previous)
    }

    /// Looks up a stock.
    #[must_use]
    pub fn material(&self, kind: MaterialKind) -> Option<&Material> {
        self.materials.get(&kind)
    }

    /// Looks up a stock mutably.
    pub fn material_mut(&mut self, kind: MaterialKind) -> Option<&mut Material> {
        self.materials.get_mut(&kind)
    }

    /// Looks up a stock, failing if the warehouse doesn't carry it.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::MaterialNotFound`.
    pub fn require(&self, kind: MaterialKind) -> MarketResult<&Material> {
        self.material(kind)
            .ok_or(MarketError::MaterialNotFound { kind })
    }

    /// Iterates stocks in catalog order.
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Checks the warehouse invariants after deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (kind, material) in &self.materials {
            material.validate()?;
            if *kind != material.kind {
                return Err(ValidationError::UnknownMaterial {
                    name: format!("{} stored under {kind}", material.kind),
                });
            }
        }
        self.storage_pool().validate()
    }
}
