//! Weapon record definitions.
//!
//! A weapon defines damage per shot and ammo consumption; the unit
//! that carries it defines the fire rate. Projectile attributes are
//! carried opaquely and handed to the weapon collaborator unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::math::{fixed_serde, Fixed};

/// Weapon type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeaponKind {
    /// Medium range, balanced.
    #[default]
    Rifle,
    /// Long range, high damage.
    Sniper,
    /// Short range, spread.
    Shotgun,
    /// High fire rate, low damage.
    MachineGun,
    /// AOE, slow fire rate.
    Launcher,
    /// Continuous damage.
    Beam,
}

/// Damage type for a future armor/resistance system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DamageKind {
    /// Standard damage.
    #[default]
    Normal,
    /// Ignores some armor.
    Piercing,
    /// AOE damage.
    Explosive,
    /// Energy-based.
    Energy,
}

/// Projectile attributes passed through to the weapon collaborator
/// without interpretation by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Projectile travel speed.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Projectile lifetime in seconds.
    #[serde(with = "fixed_serde")]
    pub lifetime: Fixed,
    /// Maximum effective range.
    #[serde(with = "fixed_serde")]
    pub max_range: Fixed,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            speed: Fixed::from_num(20),
            lifetime: Fixed::from_num(3),
            max_range: Fixed::from_num(25),
        }
    }
}

/// Data-driven weapon definition.
///
/// # Example RON
///
/// ```ron
/// WeaponData(
///     name: "Trusty Rifle",
///     kind: Rifle,
///     description: "A reliable weapon.",
///     damage_per_shot: 10,
///     damage_kind: Normal,
///     ammo_per_shot: 1,
///     projectile: ProjectileSpec(
///         speed: 85899345920,     // Fixed-point for 20.0
///         lifetime: 12884901888,  // Fixed-point for 3.0
///         max_range: 107374182400, // Fixed-point for 25.0
///     ),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponData {
    /// Display name of this weapon.
    pub name: String,

    /// Weapon category.
    #[serde(default)]
    pub kind: WeaponKind,

    /// Weapon description for UI.
    #[serde(default)]
    pub description: String,

    /// Damage dealt per shot.
    pub damage_per_shot: u32,

    /// Damage type carried by each shot.
    #[serde(default)]
    pub damage_kind: DamageKind,

    /// How much ammo one shot consumes.
    pub ammo_per_shot: u32,

    /// Opaque projectile configuration for the collaborator.
    #[serde(default)]
    pub projectile: ProjectileSpec,
}

impl WeaponData {
    /// Check the record's hard constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataValidation`] if damage or ammo
    /// consumption are below one.
    pub fn validate(&self) -> Result<()> {
        if self.damage_per_shot < 1 {
            return Err(CoreError::DataValidation {
                record: "weapon",
                message: format!("'{}': damage_per_shot must be >= 1", self.name),
            });
        }
        if self.ammo_per_shot < 1 {
            return Err(CoreError::DataValidation {
                record: "weapon",
                message: format!("'{}': ammo_per_shot must be >= 1", self.name),
            });
        }
        Ok(())
    }
}
