//! Test fixtures and helpers.
//!
//! Pre-built data records and fixed-point shorthand for consistent
//! test setup.

use fixed::types::I32F32;

use bulwark_core::collaborators::LayerMask;
use bulwark_core::data::{
    DamageKind, ProjectileSpec, UnitClass, UnitData, WeaponData, WeaponKind,
};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// A plain rifle weapon record.
#[must_use]
pub fn sample_weapon_data() -> WeaponData {
    WeaponData {
        name: "Test Rifle".to_string(),
        kind: WeaponKind::Rifle,
        description: "A reliable weapon.".to_string(),
        damage_per_shot: 10,
        damage_kind: DamageKind::Normal,
        ammo_per_shot: 1,
        projectile: ProjectileSpec::default(),
    }
}

/// A standard ranged unit record: 100 HP, 100 rounds, low-ammo
/// threshold 20, detection range 20 m, scans every 0.5 s, fires
/// 2 shots per second, targets layer 1.
#[must_use]
pub fn sample_unit_data() -> UnitData {
    UnitData {
        name: "Test Unit".to_string(),
        class: UnitClass::Ranged,
        icon: String::new(),
        description: "A brave unit ready for battle.".to_string(),
        max_health: 100,
        start_health: 100,
        unlimited_ammo: false,
        start_ammo: 100,
        low_ammo_threshold: 20,
        detection_range: fixed(20),
        target_search_interval: fixed_f(0.5),
        fire_rate: fixed(2),
        target_layer_mask: LayerMask::new(1),
        obstacle_layer_mask: LayerMask::new(2),
        weapon: sample_weapon_data(),
    }
}

/// Same unit with an explicit ammo pool, for depletion scenarios.
#[must_use]
pub fn sample_unit_with_ammo(start_ammo: i32, low_threshold: i32) -> UnitData {
    let mut data = sample_unit_data();
    data.start_ammo = start_ammo;
    data.low_ammo_threshold = low_threshold;
    data
}
