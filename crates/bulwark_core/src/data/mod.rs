//! Data structures for unit and weapon records.
//!
//! This module contains pure data structures that define deployable
//! units and their weapons. All structs are designed to be deserialized
//! from RON files and validated once on load.
//!
//! **Note:** This module contains no IO beyond the explicit `load`
//! helpers - game code receives already-validated records.

mod unit_data;
mod weapon_data;

pub use unit_data::{UnitClass, UnitData};
pub use weapon_data::{DamageKind, ProjectileSpec, WeaponData, WeaponKind};
