//! Scripted collaborator doubles.
//!
//! The core's collaborator seams (`TargetDiscovery`, `WeaponRig`) are
//! implemented here over shared interior state so tests can mutate the
//! scripted world mid-run while the simulation holds the trait object.
//! Everything is single-threaded; `Rc<RefCell<_>>` is deliberate.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use bulwark_core::collaborators::{
    LayerMask, TargetDiscovery, TargetId, TargetInfo, WeaponRig, WeaponState,
};
use bulwark_core::data::WeaponData;
use bulwark_core::math::{Fixed, Vec3Fixed};
use bulwark_core::unit::UnitId;

#[derive(Debug, Clone, Copy)]
struct TargetRecord {
    position: Vec3Fixed,
    mask: LayerMask,
    occluded: bool,
}

#[derive(Debug, Default)]
struct TargetWorld {
    targets: BTreeMap<u64, TargetRecord>,
}

/// Scripted target field: tests spawn, move and kill enemies while a
/// unit under test scans the same world through `TargetDiscovery`.
///
/// Results iterate in target-id order, giving deterministic tie-breaks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTargets {
    world: Rc<RefCell<TargetWorld>>,
}

impl ScriptedTargets {
    /// Create an empty target field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a target on layer 1 (the default hostile layer of the
    /// sample records).
    pub fn spawn(&self, id: u64, position: Vec3Fixed) {
        self.spawn_masked(id, position, LayerMask::new(1));
    }

    /// Spawn a target on specific layers.
    pub fn spawn_masked(&self, id: u64, position: Vec3Fixed, mask: LayerMask) {
        self.world.borrow_mut().targets.insert(
            id,
            TargetRecord {
                position,
                mask,
                occluded: false,
            },
        );
    }

    /// Destroy a target; later queries no longer see it.
    pub fn kill(&self, id: u64) {
        self.world.borrow_mut().targets.remove(&id);
    }

    /// Move a live target.
    pub fn relocate(&self, id: u64, position: Vec3Fixed) {
        if let Some(record) = self.world.borrow_mut().targets.get_mut(&id) {
            record.position = position;
        }
    }

    /// Put an obstacle between everyone and this target.
    pub fn block_sight_to(&self, id: u64) {
        if let Some(record) = self.world.borrow_mut().targets.get_mut(&id) {
            record.occluded = true;
        }
    }

    /// Number of live targets.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.world.borrow().targets.len()
    }
}

impl TargetDiscovery for ScriptedTargets {
    fn overlap_sphere(
        &self,
        center: Vec3Fixed,
        radius: Fixed,
        mask: LayerMask,
    ) -> Vec<TargetInfo> {
        let radius_sq = radius * radius;
        self.world
            .borrow()
            .targets
            .iter()
            .filter(|(_, record)| record.mask.overlaps(mask))
            .filter(|(_, record)| center.distance_squared(record.position) <= radius_sq)
            .map(|(&id, record)| TargetInfo {
                id: TargetId(id),
                position: record.position,
            })
            .collect()
    }

    fn position_of(&self, target: TargetId) -> Option<Vec3Fixed> {
        self.world
            .borrow()
            .targets
            .get(&target.0)
            .map(|record| record.position)
    }

    fn line_of_sight(&self, _from: Vec3Fixed, to: Vec3Fixed, _obstacle_mask: LayerMask) -> bool {
        // Coarse stand-in: a target marked occluded blocks the ray to
        // its own position.
        !self
            .world
            .borrow()
            .targets
            .values()
            .any(|record| record.occluded && record.position == to)
    }
}

/// One call observed by the [`RecordingRig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigCall {
    /// A weapon instance was attached for the unit.
    Attach(UnitId, String),
    /// The unit's weapon instance was destroyed.
    Detach(UnitId),
    /// A single shot was started at the target.
    ShootStart(UnitId, TargetId),
    /// The in-flight shot was stopped.
    ShootStop(UnitId),
}

#[derive(Debug, Default)]
struct RigLog {
    calls: Vec<RigCall>,
    in_use: BTreeMap<u64, bool>,
}

/// Weapon rig double that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingRig {
    log: Rc<RefCell<RigLog>>,
}

impl RecordingRig {
    /// Create a rig with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RigCall> {
        self.log.borrow().calls.clone()
    }

    /// Just the shots, as (shooter, target) pairs in order.
    #[must_use]
    pub fn shots(&self) -> Vec<(UnitId, TargetId)> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                RigCall::ShootStart(unit, target) => Some((*unit, *target)),
                _ => None,
            })
            .collect()
    }

    /// Shots fired by one specific unit.
    #[must_use]
    pub fn shots_by(&self, unit: UnitId) -> usize {
        self.shots().iter().filter(|(u, _)| *u == unit).count()
    }
}

impl WeaponRig for RecordingRig {
    fn attach(&mut self, unit: UnitId, weapon: &WeaponData) {
        self.log
            .borrow_mut()
            .calls
            .push(RigCall::Attach(unit, weapon.name.clone()));
    }

    fn detach(&mut self, unit: UnitId) {
        let mut log = self.log.borrow_mut();
        log.calls.push(RigCall::Detach(unit));
        log.in_use.remove(&unit.0);
    }

    fn shoot_start(&mut self, unit: UnitId, target: TargetId) {
        let mut log = self.log.borrow_mut();
        log.calls.push(RigCall::ShootStart(unit, target));
        log.in_use.insert(unit.0, true);
    }

    fn shoot_stop(&mut self, unit: UnitId) {
        let mut log = self.log.borrow_mut();
        log.calls.push(RigCall::ShootStop(unit));
        log.in_use.insert(unit.0, false);
    }

    fn state(&self, unit: UnitId) -> WeaponState {
        if self.log.borrow().in_use.get(&unit.0).copied().unwrap_or(false) {
            WeaponState::InUse
        } else {
            WeaponState::Idle
        }
    }
}
