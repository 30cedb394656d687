//! Material types and the unit-size catalog.
//!
//! A material is the resource a warehouse stores and the market sells. Every
//! unit held occupies `unit_size` of warehouse space and costs `unit_cost`
//! to buy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Globally unique, stable material identifier.
///
/// # Examples
///
/// ```
/// use corp_market::MaterialId;
///
/// let id = MaterialId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(Uuid);

impl MaterialId {
    /// Creates a new random material ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a material ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The materials traded on the corporation market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Water,
    Energy,
    Food,
    Plants,
    Metal,
    Hardware,
    Chemicals,
    Drugs,
    Robots,
    AiCores,
    RealEstate,
}

impl MaterialKind {
    /// Every material, in catalog order.
    pub const ALL: [Self; 11] = [
        Self::Water,
        Self::Energy,
        Self::Food,
        Self::Plants,
        Self::Metal,
        Self::Hardware,
        Self::Chemicals,
        Self::Drugs,
        Self::Robots,
        Self::AiCores,
        Self::RealEstate,
    ];

    /// Warehouse space occupied by one unit.
    #[must_use]
    pub const fn unit_size(self) -> f64 {
        match self {
            Self::Water | Self::Plants | Self::Chemicals => 0.05,
            Self::Energy => 0.01,
            Self::Food => 0.03,
            Self::Metal | Self::AiCores => 0.1,
            Self::Hardware => 0.06,
            Self::Drugs => 0.02,
            Self::Robots => 0.5,
            Self::RealEstate => 0.005,
        }
    }

    /// Display name as shown in game.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Energy => "Energy",
            Self::Food => "Food",
            Self::Plants => "Plants",
            Self::Metal => "Metal",
            Self::Hardware => "Hardware",
            Self::Chemicals => "Chemicals",
            Self::Drugs => "Drugs",
            Self::Robots => "Robots",
            Self::AiCores => "AI Cores",
            Self::RealEstate => "Real Estate",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MaterialKind {
    type Err = ValidationError;

    /// Accepts display names with or without spaces, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.display_name()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(key.chars())
            })
            .ok_or_else(|| ValidationError::UnknownMaterial {
                name: s.trim().to_string(),
            })
    }
}

/// A material stock held in a warehouse.
///
/// # Examples
///
/// ```
/// use corp_market::{Material, MaterialKind};
///
/// let water = Material::new(MaterialKind::Water, 2.5).unwrap();
/// assert_eq!(water.unit_size, 0.05);
/// assert_eq!(water.quantity, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Globally unique identifier
    pub id: MaterialId,

    /// Catalog entry this stock holds.
    pub kind: MaterialKind,

    /// Storage units consumed per unit held.
    pub unit_size: f64,

    /// Currency per unit purchased.
    pub unit_cost: f64,

    /// Units currently held.
    #[serde(default)]
    pub quantity: f64,

    /// Units bought automatically per second.
    #[serde(default)]
    pub buy_rate: f64,
}

impl Material {
    /// Creates an empty stock of `kind` using the catalog unit size.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `unit_cost` is negative or not finite.
    pub fn new(kind: MaterialKind, unit_cost: f64) -> Result<Self, ValidationError> {
        Self::with_unit_size(kind, kind.unit_size(), unit_cost)
    }

    /// Creates an empty stock with an explicit unit size.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `unit_size` is not positive or
    /// `unit_cost` is negative, or either is not finite.
    pub fn with_unit_size(
        kind: MaterialKind,
        unit_size: f64,
        unit_cost: f64,
    ) -> Result<Self, ValidationError> {
        let material = Self {
            id: MaterialId::new(),
            kind,
            unit_size,
            unit_cost,
            quantity: 0.0,
            buy_rate: 0.0,
        };
        material.validate()?;
        Ok(material)
    }

    /// Display name of this material.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    /// Warehouse space this stock currently occupies.
    #[must_use]
    pub fn occupied_space(&self) -> f64 {
        self.quantity * self.unit_size
    }

    /// Checks the record invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        finite("unit_size", self.unit_size)?;
        finite("unit_cost", self.unit_cost)?;
        finite("quantity", self.quantity)?;
        finite("buy_rate", self.buy_rate)?;
        if self.unit_size <= 0.0 {
            return Err(ValidationError::NonPositiveUnitSize {
                value: self.unit_size,
            });
        }
        non_negative("unit_cost", self.unit_cost)?;
        non_negative("quantity", self.quantity)?;
        non_negative("buy_rate", self.buy_rate)?;
        Ok(())
    }
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
