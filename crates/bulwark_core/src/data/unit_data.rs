//! Unit record definitions.
//!
//! A unit record carries everything a deployable unit needs: health,
//! the ammo pool, detection/fire pacing, target filters and the weapon
//! it spawns with. Records are validated once on load; game code never
//! sees an invalid record.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collaborators::LayerMask;
use crate::error::{CoreError, Result};
use crate::math::{fixed_serde, Fixed};

use super::WeaponData;

/// Unit class/archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitClass {
    /// Standard ranged attacker.
    #[default]
    Ranged,
    /// Close-quarters attacker.
    Melee,
    /// Buffs or repairs allies.
    Support,
    /// Long-range area damage.
    Artillery,
}

/// Data-driven unit definition.
///
/// # Example RON
///
/// ```ron
/// UnitData(
///     name: "Vanguard",
///     class: Ranged,
///     description: "A brave unit ready for battle.",
///     max_health: 100,
///     start_health: 100,
///     unlimited_ammo: false,
///     start_ammo: 100,
///     low_ammo_threshold: 20,
///     detection_range: 85899345920,       // Fixed-point for 20.0
///     target_search_interval: 2147483648, // Fixed-point for 0.5
///     fire_rate: 8589934592,              // Fixed-point for 2.0
///     target_layer_mask: 1,
///     obstacle_layer_mask: 0,
///     weapon: WeaponData(
///         name: "Trusty Rifle",
///         damage_per_shot: 10,
///         ammo_per_shot: 1,
///     ),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitData {
    /// Display name of this unit.
    pub name: String,

    /// Unit archetype.
    #[serde(default)]
    pub class: UnitClass,

    /// Icon asset path for UI display.
    #[serde(default)]
    pub icon: String,

    /// Unit description for UI.
    #[serde(default)]
    pub description: String,

    /// Maximum health points.
    pub max_health: u32,

    /// Starting health (clamped to `max_health` on load).
    pub start_health: u32,

    /// Does this unit have unlimited ammo?
    #[serde(default)]
    pub unlimited_ammo: bool,

    /// Starting ammo count (ignored if unlimited).
    pub start_ammo: i32,

    /// Warn when ammo reaches this threshold.
    pub low_ammo_threshold: i32,

    /// How far this unit can detect enemies, in meters.
    #[serde(with = "fixed_serde")]
    pub detection_range: Fixed,

    /// How often to search for new targets, in seconds.
    #[serde(with = "fixed_serde")]
    pub target_search_interval: Fixed,

    /// Fire rate in shots per second.
    #[serde(with = "fixed_serde")]
    pub fire_rate: Fixed,

    /// What layers this unit can target.
    #[serde(default)]
    pub target_layer_mask: LayerMask,

    /// What layers block line of sight.
    #[serde(default)]
    pub obstacle_layer_mask: LayerMask,

    /// The weapon this unit spawns with.
    pub weapon: WeaponData,
}

impl UnitData {
    /// Validate the record, clamping what the original tooling clamps
    /// and refusing everything else.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataValidation`] when a stat falls outside
    /// its allowed range.
    pub fn validated(mut self) -> Result<Self> {
        if self.max_health < 1 {
            return Err(self.invalid("max_health must be >= 1"));
        }
        // Starting health is clamped rather than refused.
        if self.start_health > self.max_health {
            self.start_health = self.max_health;
        }
        if self.start_health < 1 {
            return Err(self.invalid("start_health must be >= 1"));
        }
        if self.start_ammo < 1 {
            return Err(self.invalid("start_ammo must be >= 1"));
        }
        if self.low_ammo_threshold < 1 {
            return Err(self.invalid("low_ammo_threshold must be >= 1"));
        }
        if self.low_ammo_threshold >= self.start_ammo {
            return Err(self.invalid("low_ammo_threshold must be < start_ammo"));
        }
        if self.detection_range < Fixed::from_num(5) || self.detection_range > Fixed::from_num(50) {
            return Err(self.invalid("detection_range must be within [5, 50]"));
        }
        if self.target_search_interval < Fixed::from_num(0.1)
            || self.target_search_interval > Fixed::from_num(2)
        {
            return Err(self.invalid("target_search_interval must be within [0.1, 2]"));
        }
        if self.fire_rate < Fixed::from_num(0.1) || self.fire_rate > Fixed::from_num(10) {
            return Err(self.invalid("fire_rate must be within [0.1, 10]"));
        }
        self.weapon.validate()?;
        Ok(self)
    }

    fn invalid(&self, message: &str) -> CoreError {
        CoreError::DataValidation {
            record: "unit",
            message: format!("'{}': {}", self.name, message),
        }
    }

    /// Load and validate a unit record from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataParse`] on IO/parse failure and
    /// [`CoreError::DataValidation`] on a bad record.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| CoreError::DataParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let record: UnitData = ron::from_str(&contents).map_err(|e| CoreError::DataParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        record.validated()
    }

    /// Parse and validate a unit record from a RON string.
    ///
    /// # Errors
    ///
    /// Same as [`UnitData::load`].
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let record: UnitData = ron::from_str(ron).map_err(|e| CoreError::DataParse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        record.validated()
    }

    /// Damage per second: fire rate × weapon damage per shot.
    #[must_use]
    pub fn dps(&self) -> Fixed {
        self.fire_rate * Fixed::from_num(self.weapon.damage_per_shot)
    }

    /// Seconds of continuous fire before the ammo pool empties, or
    /// `None` when the pool is unlimited.
    #[must_use]
    pub fn ammo_lifetime(&self) -> Option<Fixed> {
        if self.unlimited_ammo {
            return None;
        }
        let ammo_per_second = self.fire_rate * Fixed::from_num(self.weapon.ammo_per_shot);
        if ammo_per_second == Fixed::ZERO {
            return Some(Fixed::ZERO);
        }
        Some(Fixed::from_num(self.start_ammo) / ammo_per_second)
    }
}
