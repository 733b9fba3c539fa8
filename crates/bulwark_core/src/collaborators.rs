//! Collaborator interfaces the core consumes.
//!
//! The core owns grid, queue and combat pacing; everything engine-flavored
//! (projectile spawning, physics overlap queries, AI state machines) sits
//! behind the traits below. When a collaborator is absent the core runs
//! with an inert stand-in and combat degrades to a no-op.

use serde::{Deserialize, Serialize};

use crate::data::WeaponData;
use crate::math::{Fixed, Vec3Fixed};
use crate::unit::UnitId;

/// Opaque physics-layer filter, passed through to the target-discovery
/// collaborator without interpretation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Mask that matches nothing.
    pub const NONE: Self = Self(0);

    /// Create a mask from raw bits.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the two masks share any layer.
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Identifier for an enemy target owned by the discovery collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Snapshot of a discovered target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    /// Stable identifier of the target.
    pub id: TargetId,
    /// Target position at scan time.
    pub position: Vec3Fixed,
}

/// Spatial query surface for finding hostile targets.
pub trait TargetDiscovery {
    /// Every live hostile within `radius` of `center`, filtered by
    /// `mask`. Order is collaborator-defined but must be stable for
    /// identical world state (ties in target selection break on it).
    fn overlap_sphere(&self, center: Vec3Fixed, radius: Fixed, mask: LayerMask) -> Vec<TargetInfo>;

    /// Current position of a target, or `None` once it is destroyed.
    fn position_of(&self, target: TargetId) -> Option<Vec3Fixed>;

    /// Whether the straight line between two points is free of
    /// obstacles on `obstacle_mask`. Collaborators without occlusion
    /// data keep the default (always clear).
    fn line_of_sight(
        &self,
        _from: Vec3Fixed,
        _to: Vec3Fixed,
        _obstacle_mask: LayerMask,
    ) -> bool {
        true
    }
}

/// Discovery stand-in that never finds anything.
#[derive(Debug, Default)]
pub struct InertTargets;

impl TargetDiscovery for InertTargets {
    fn overlap_sphere(
        &self,
        _center: Vec3Fixed,
        _radius: Fixed,
        _mask: LayerMask,
    ) -> Vec<TargetInfo> {
        Vec::new()
    }

    fn position_of(&self, _target: TargetId) -> Option<Vec3Fixed> {
        None
    }
}

/// Weapon collaborator state, as reported per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponState {
    /// Weapon attached and idle.
    #[default]
    Idle,
    /// Weapon currently executing a shot.
    InUse,
}

/// Weapon collaborator: instantiates weapon instances and executes
/// shots. Damage application and projectiles live entirely on this
/// side of the seam.
pub trait WeaponRig {
    /// Instantiate a weapon for the unit from its record.
    fn attach(&mut self, unit: UnitId, weapon: &WeaponData);

    /// Destroy the unit's weapon instance.
    fn detach(&mut self, unit: UnitId);

    /// Begin a single shot at the given target.
    fn shoot_start(&mut self, unit: UnitId, target: TargetId);

    /// End the shot started one frame earlier.
    fn shoot_stop(&mut self, unit: UnitId);

    /// Current weapon state for the unit.
    fn state(&self, unit: UnitId) -> WeaponState;

    /// Swap the unit's weapon for a differently named instance.
    ///
    /// Default implementation re-attaches; collaborators with richer
    /// instance management override it.
    fn change_weapon(&mut self, unit: UnitId, weapon: &WeaponData, _name: &str) {
        self.attach(unit, weapon);
    }
}

/// Weapon stand-in used when no collaborator is wired up.
#[derive(Debug, Default)]
pub struct InertRig;

impl WeaponRig for InertRig {
    fn attach(&mut self, _unit: UnitId, _weapon: &WeaponData) {}

    fn detach(&mut self, _unit: UnitId) {}

    fn shoot_start(&mut self, _unit: UnitId, _target: TargetId) {}

    fn shoot_stop(&mut self, _unit: UnitId) {}

    fn state(&self, _unit: UnitId) -> WeaponState {
        WeaponState::Idle
    }
}

/// Optional AI brain collaborator.
///
/// The combat controller always runs in the core; a brain, when
/// supplied, is only switched on and off as units enter and leave the
/// Firing zone.
pub trait AiBrain {
    /// Enable the brain for a unit entering combat.
    fn activate(&mut self, unit: UnitId);

    /// Disable the brain for a unit leaving combat.
    fn deactivate(&mut self, unit: UnitId);
}

/// Brain stand-in used when no collaborator is wired up.
#[derive(Debug, Default)]
pub struct InertBrain;

impl AiBrain for InertBrain {
    fn activate(&mut self, _unit: UnitId) {}

    fn deactivate(&mut self, _unit: UnitId) {}
}
